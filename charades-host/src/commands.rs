use anyhow::{Result, anyhow, bail};
use charades_types::{SessionEvent, SessionSnapshot};

use crate::host::HostCommand;

pub const HELP: &str = "\
Commands:
  player <name>        register a solo player
  teams [a] [b]        create two teams (blank names get defaults)
  category <name>      select a category
  categories           list categories
  start                draw a word and start the round countdown
  draw [category]      draw a word without touching the countdown
  hit                  record a correct guess
  pass                 pass the turn to the next team
  timer [seconds]      restart the countdown
  stop                 cancel the countdown
  reset                zero all scores and go back to round one
  status               show the session state
  help                 show this message
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleInput {
    Command(HostCommand),
    ListCategories,
    Status,
    Help,
    Quit,
}

/// Parse one line of console input. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let input = match verb.to_lowercase().as_str() {
        "player" => {
            if rest.is_empty() {
                bail!("Usage: player <name>");
            }
            ConsoleInput::Command(HostCommand::RegisterPlayer {
                name: rest.to_string(),
            })
        }
        "teams" => {
            let mut names = rest.split_whitespace();
            ConsoleInput::Command(HostCommand::CreateTeams {
                name_a: names.next().unwrap_or_default().to_string(),
                name_b: names.next().unwrap_or_default().to_string(),
            })
        }
        "category" => {
            if rest.is_empty() {
                bail!("Usage: category <name>");
            }
            ConsoleInput::Command(HostCommand::SelectCategory {
                name: rest.to_string(),
            })
        }
        "categories" => ConsoleInput::ListCategories,
        "start" | "reshuffle" => ConsoleInput::Command(HostCommand::RestartRound),
        "draw" => ConsoleInput::Command(HostCommand::DrawWord {
            category: (!rest.is_empty()).then(|| rest.to_string()),
        }),
        "hit" => ConsoleInput::Command(HostCommand::CorrectGuess),
        "pass" => ConsoleInput::Command(HostCommand::PassTurn),
        "timer" => {
            let seconds = if rest.is_empty() {
                None
            } else {
                Some(
                    rest.parse()
                        .map_err(|_| anyhow!("Invalid number of seconds: {rest}"))?,
                )
            };
            ConsoleInput::Command(HostCommand::StartCountdown { seconds })
        }
        "stop" => ConsoleInput::Command(HostCommand::CancelCountdown),
        "reset" => ConsoleInput::Command(HostCommand::Reset),
        "status" => ConsoleInput::Status,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "exit" => ConsoleInput::Quit,
        other => bail!("Unknown command: {other} (try 'help')"),
    };

    Ok(Some(input))
}

pub fn render_event(event: &SessionEvent) -> String {
    match event {
        SessionEvent::WordChanged { word } => format!("Word: {word}"),
        SessionEvent::Tick { seconds_remaining } => format!("{seconds_remaining}s left"),
        SessionEvent::TimeExpired => "Time's up!".to_string(),
        SessionEvent::ScoreChanged { score } => format!("Score: {score}"),
        SessionEvent::TurnChanged { team } => format!("Turn: {}", team.name),
        SessionEvent::PlayerRegistered { player } => format!("Welcome, {}", player.name),
        SessionEvent::SessionEnded { winner: Some(team) } => {
            format!("Game over! {} wins with {} points", team.name, team.points)
        }
        SessionEvent::SessionEnded { winner: None } => "Game over!".to_string(),
    }
}

pub fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut lines = vec![format!(
        "Round {}/{} ({:?})",
        snapshot.current_round, snapshot.total_rounds, snapshot.phase
    )];

    if let Some(category) = &snapshot.selected_category {
        lines.push(format!("Category: {category}"));
    }

    let active = snapshot.active_team().map(|team| team.id);
    for team in &snapshot.teams {
        let marker = if Some(team.id) == active { "*" } else { " " };
        lines.push(format!("{marker} {}: {}", team.name, team.points));
    }
    for standing in &snapshot.players {
        lines.push(format!("  {}: {}", standing.player.name, standing.points));
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use charades_types::{SessionPhase, Team};

    fn command(line: &str) -> HostCommand {
        match parse_line(line).unwrap() {
            Some(ConsoleInput::Command(command)) => command,
            other => panic!("expected a command, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   \t").unwrap(), None);
    }

    #[test]
    fn test_parse_registration_commands() {
        assert_eq!(
            command("player  Ana María "),
            HostCommand::RegisterPlayer {
                name: "Ana María".to_string()
            }
        );
        assert_eq!(
            command("teams Red"),
            HostCommand::CreateTeams {
                name_a: "Red".to_string(),
                name_b: String::new(),
            }
        );
        assert_eq!(
            command("TEAMS"),
            HostCommand::CreateTeams {
                name_a: String::new(),
                name_b: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_round_commands() {
        assert_eq!(command("hit"), HostCommand::CorrectGuess);
        assert_eq!(command("pass"), HostCommand::PassTurn);
        assert_eq!(command("reshuffle"), HostCommand::RestartRound);
        assert_eq!(command("timer"), HostCommand::StartCountdown { seconds: None });
        assert_eq!(
            command("timer 30"),
            HostCommand::StartCountdown { seconds: Some(30) }
        );
        assert_eq!(
            command("draw movies"),
            HostCommand::DrawWord {
                category: Some("movies".to_string())
            }
        );
        assert_eq!(command("draw"), HostCommand::DrawWord { category: None });
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("player").is_err());
        assert!(parse_line("category   ").is_err());
        assert!(parse_line("timer soon").is_err());
        assert!(parse_line("dance").unwrap_err().to_string().contains("Unknown command"));
    }

    #[test]
    fn test_parse_console_inputs() {
        assert_eq!(parse_line("quit").unwrap(), Some(ConsoleInput::Quit));
        assert_eq!(parse_line("status").unwrap(), Some(ConsoleInput::Status));
        assert_eq!(parse_line("?").unwrap(), Some(ConsoleInput::Help));
        assert_eq!(parse_line("categories").unwrap(), Some(ConsoleInput::ListCategories));
    }

    #[test]
    fn test_render_events() {
        let mut team = Team::new("Red");
        team.points = 4;
        assert_eq!(
            render_event(&SessionEvent::SessionEnded { winner: Some(team.clone()) }),
            "Game over! Red wins with 4 points"
        );
        assert_eq!(render_event(&SessionEvent::TurnChanged { team }), "Turn: Red");
        assert_eq!(
            render_event(&SessionEvent::Tick { seconds_remaining: 9 }),
            "9s left"
        );
    }

    #[test]
    fn test_render_snapshot_marks_active_team() {
        let red = Team::new("Red");
        let blue = Team::new("Blue");
        let snapshot = SessionSnapshot {
            phase: SessionPhase::RoundActive,
            current_round: 2,
            total_rounds: 5,
            active_team: Some(blue.id),
            teams: vec![red, blue],
            players: Vec::new(),
            categories: vec!["Colors".to_string()],
            selected_category: Some("Colors".to_string()),
            current_word: Some("Red".to_string()),
            countdown_active: true,
            created_at: String::new(),
        };

        assert_eq!(
            render_snapshot(&snapshot),
            "Round 2/5 (RoundActive)\nCategory: Colors\n  Red: 0\n* Blue: 0"
        );
    }
}
