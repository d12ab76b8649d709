use charades_types::{
    Category, Player, PlayerId, PlayerStanding, SessionError, SessionEvent, SessionPhase,
    SessionSnapshot, Team, TeamId,
};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    CategorySet, Countdown, CountdownFactory, PlayerScores, SessionConfig, SessionObserver,
    TimerId, TimerSignal, leading_team,
};

const DEFAULT_TEAM_NAMES: [&str; 2] = ["Team A", "Team B"];

struct LiveCountdown {
    id: TimerId,
    countdown: Box<dyn Countdown>,
}

enum Scorer {
    Team(usize),
    Player(PlayerId),
}

/// Game-session controller: owns all state of one local charades session.
///
/// Every operation is synchronous and either applies fully or returns an
/// error before touching state. Countdown ticks arrive as [`TimerSignal`]s
/// on the receiver returned by [`Session::new`]; whoever drives the session
/// must feed them back through [`Session::handle_timer_signal`] on the same
/// task that calls the other operations.
pub struct Session {
    categories: CategorySet,
    players: Vec<Player>,
    player_scores: PlayerScores,
    teams: Vec<Team>,
    selected_category: Option<usize>,
    active_team: Option<TeamId>,
    current_word: Option<String>,
    current_round: u32,
    total_rounds: u32,
    tick_interval: Duration,
    round_duration_seconds: u32,
    phase: SessionPhase,
    countdown: Option<LiveCountdown>,
    last_timer: u64,
    countdowns: Box<dyn CountdownFactory>,
    timer_tx: mpsc::UnboundedSender<TimerSignal>,
    observer: Option<Box<dyn SessionObserver>>,
    rng: ChaCha8Rng,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new<F>(
        config: SessionConfig,
        countdowns: F,
    ) -> Result<(Self, mpsc::UnboundedReceiver<TimerSignal>), SessionError>
    where
        F: CountdownFactory + 'static,
    {
        if config.total_rounds == 0 {
            return Err(SessionError::invalid_input("total rounds must be at least 1"));
        }

        let categories = CategorySet::new(config.categories)?;
        let rng = match config.rng_seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();

        info!(
            "Created session with {} categories, {} rounds",
            categories.len(),
            config.total_rounds
        );

        let session = Self {
            categories,
            players: Vec::new(),
            player_scores: PlayerScores::new(),
            teams: Vec::new(),
            selected_category: None,
            active_team: None,
            current_word: None,
            current_round: 1,
            total_rounds: config.total_rounds,
            tick_interval: config.tick_interval,
            round_duration_seconds: config.round_duration_seconds,
            phase: SessionPhase::Idle,
            countdown: None,
            last_timer: 0,
            countdowns: Box::new(countdowns),
            timer_tx,
            observer: None,
            rng,
            created_at: Utc::now(),
        };

        Ok((session, timer_rx))
    }

    /// Register, replace or (with `None`) remove the observer. Removing it
    /// also cancels the running countdown.
    pub fn set_observer(&mut self, observer: Option<Box<dyn SessionObserver>>) {
        if observer.is_none() {
            self.cancel_countdown();
        }
        self.observer = observer;
    }

    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    // -----------------------
    // Players (solo mode)
    // -----------------------

    pub fn register_player(&mut self, name: &str) -> Result<Player, SessionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::invalid_input("player name must not be blank"));
        }

        let player = Player::new(name);
        self.players.push(player.clone());
        self.player_scores.track(player.id);
        debug!("Registered player {} ({})", player.name, player.id);

        self.notify(SessionEvent::PlayerRegistered {
            player: player.clone(),
        });
        self.notify(SessionEvent::ScoreChanged {
            score: self.player_scores.get(&player.id),
        });

        Ok(player)
    }

    pub fn player_score(&self, player_id: &PlayerId) -> i32 {
        self.player_scores.get(player_id)
    }

    // -----------------------
    // Teams
    // -----------------------

    /// Replace the team list with two fresh teams; blank names get defaults.
    pub fn create_teams(&mut self, name_a: &str, name_b: &str) -> &[Team] {
        let teams: Vec<Team> = [name_a, name_b]
            .iter()
            .zip(DEFAULT_TEAM_NAMES)
            .map(|(name, default)| {
                let name = name.trim();
                Team::new(if name.is_empty() { default } else { name })
            })
            .collect();

        self.active_team = teams.first().map(|team| team.id);
        self.teams = teams;
        info!(
            "Created teams {}",
            self.teams
                .iter()
                .map(|team| team.name.as_str())
                .collect::<Vec<_>>()
                .join(" vs ")
        );

        self.announce_standing();
        &self.teams
    }

    /// Add a registered player to a team's roster. Adding twice is a no-op.
    pub fn assign_to_team(&mut self, team_id: TeamId, player_id: PlayerId) -> Result<(), SessionError> {
        if !self.players.iter().any(|player| player.id == player_id) {
            return Err(SessionError::not_found(player_id.to_string()));
        }

        let team = self
            .teams
            .iter_mut()
            .find(|team| team.id == team_id)
            .ok_or_else(|| SessionError::not_found(team_id.to_string()))?;

        if !team.roster.contains(&player_id) {
            team.roster.push(player_id);
        }
        Ok(())
    }

    /// Pass the turn to the next team. Wrapping back to the first team
    /// starts a new round; going past the last round ends the session.
    /// Without teams this does nothing.
    pub fn advance_turn(&mut self) -> Result<(), SessionError> {
        if self.teams.is_empty() {
            return Ok(());
        }
        self.ensure_in_play()?;

        let index = self.active_team_index().unwrap_or(0);
        let next = (index + 1) % self.teams.len();
        let next_round = if next == 0 {
            self.current_round + 1
        } else {
            self.current_round
        };
        if next_round > self.total_rounds {
            self.active_team = Some(self.teams[next].id);
            self.current_round = next_round;
            self.finish();
            return Ok(());
        }

        // Draw before mutating so an empty category leaves the turn untouched
        let word = self.next_word()?;

        self.active_team = Some(self.teams[next].id);
        self.current_round = next_round;

        let team = self.teams[next].clone();
        debug!("Turn passed to {} (round {})", team.name, self.current_round);
        let score = team.points;
        self.notify(SessionEvent::TurnChanged { team });
        self.notify(SessionEvent::ScoreChanged { score });
        self.begin_round(word);

        Ok(())
    }

    // -----------------------
    // Categories and words
    // -----------------------

    /// Select a category by name, ignoring case. The current word is kept.
    pub fn select_category(&mut self, name: &str) -> Result<&Category, SessionError> {
        let index = self
            .categories
            .position(name)
            .ok_or_else(|| SessionError::not_found(name))?;
        self.selected_category = Some(index);

        let category = self
            .categories
            .get(index)
            .ok_or_else(|| SessionError::not_found(name))?;
        debug!("Selected category {}", category.name());
        Ok(category)
    }

    /// Draw a random word from `category`, or from the selected category when
    /// `None`. Repeats are possible: nothing remembers earlier draws.
    pub fn draw_word(&mut self, category: Option<&str>) -> Result<String, SessionError> {
        self.ensure_in_play()?;
        let word = self.pick_word(category)?;
        self.apply_word(word.clone());
        Ok(word)
    }

    fn pick_word(&mut self, category: Option<&str>) -> Result<String, SessionError> {
        let category = match category {
            Some(name) => self
                .categories
                .find(name)
                .ok_or_else(|| SessionError::not_found(name))?,
            None => self
                .selected_category
                .and_then(|index| self.categories.get(index))
                .ok_or_else(|| SessionError::invalid_state("no category selected"))?,
        };

        category
            .words()
            .choose(&mut self.rng)
            .cloned()
            .ok_or_else(|| SessionError::EmptyCategory {
                name: category.name().to_string(),
            })
    }

    /// Next word from the selected category, or `None` when none is selected.
    fn next_word(&mut self) -> Result<Option<String>, SessionError> {
        if self.selected_category.is_none() {
            return Ok(None);
        }
        self.pick_word(None).map(Some)
    }

    fn apply_word(&mut self, word: String) {
        debug!("Drew word for round {}", self.current_round);
        self.current_word = Some(word.clone());
        self.phase = SessionPhase::RoundActive;
        self.notify(SessionEvent::WordChanged { word });
    }

    // -----------------------
    // Scoring
    // -----------------------

    /// Credit a correct guess to the active team, or in solo mode to the
    /// first registered player, then draw the next word from the selected
    /// category, if any. With neither teams nor players this does nothing.
    pub fn record_correct_guess(&mut self) -> Result<(), SessionError> {
        let scorer = match (self.active_team_index(), self.players.first()) {
            (Some(index), _) => Scorer::Team(index),
            (None, Some(player)) => Scorer::Player(player.id),
            (None, None) => return Ok(()),
        };
        self.ensure_in_play()?;

        let word = self.next_word()?;
        let score = match scorer {
            Scorer::Team(index) => {
                self.teams[index].points += 1;
                self.teams[index].points
            }
            Scorer::Player(player_id) => self.player_scores.increment(player_id),
        };

        self.notify(SessionEvent::ScoreChanged { score });
        if let Some(word) = word {
            self.apply_word(word);
        }
        Ok(())
    }

    // -----------------------
    // Countdown
    // -----------------------

    pub fn start_countdown(&mut self, duration_seconds: u32) -> Result<TimerId, SessionError> {
        self.start_countdown_with_interval(duration_seconds, self.tick_interval)
    }

    /// Cancel any running countdown and start a new one.
    pub fn start_countdown_with_interval(
        &mut self,
        duration_seconds: u32,
        tick_interval: Duration,
    ) -> Result<TimerId, SessionError> {
        self.ensure_in_play()?;
        Ok(self.launch_countdown(duration_seconds, tick_interval))
    }

    fn launch_countdown(&mut self, duration_seconds: u32, tick_interval: Duration) -> TimerId {
        self.cancel_countdown();

        self.last_timer += 1;
        let id = TimerId(self.last_timer);
        let tick_tx = self.timer_tx.clone();
        let expire_tx = self.timer_tx.clone();

        let mut countdown = self.countdowns.create(duration_seconds);
        countdown.start(
            tick_interval,
            Box::new(move |seconds_remaining| {
                let _ = tick_tx.send(TimerSignal::Tick {
                    timer: id,
                    seconds_remaining,
                });
            }),
            Box::new(move || {
                let _ = expire_tx.send(TimerSignal::Expired { timer: id });
            }),
        );

        debug!("Started {} for {}s", id, duration_seconds);
        self.countdown = Some(LiveCountdown { id, countdown });
        id
    }

    pub fn cancel_countdown(&mut self) {
        if let Some(mut live) = self.countdown.take() {
            live.countdown.cancel();
            debug!("Cancelled {}", live.id);
        }
    }

    /// Deliver a countdown signal on the session's task. Signals from a
    /// countdown that has since been cancelled or replaced are dropped.
    pub fn handle_timer_signal(&mut self, signal: TimerSignal) {
        if self.live_timer() != Some(signal.timer()) {
            debug!("Dropping signal from stale {}", signal.timer());
            return;
        }

        match signal {
            TimerSignal::Tick {
                seconds_remaining, ..
            } => self.notify(SessionEvent::Tick { seconds_remaining }),
            TimerSignal::Expired { .. } => {
                self.countdown = None;
                if self.phase == SessionPhase::RoundActive {
                    self.phase = SessionPhase::RoundEnded;
                }
                self.notify(SessionEvent::TimeExpired);
            }
        }
    }

    pub fn live_timer(&self) -> Option<TimerId> {
        self.countdown.as_ref().map(|live| live.id)
    }

    pub fn countdown_active(&self) -> bool {
        self.countdown.is_some()
    }

    // -----------------------
    // Rounds and reset
    // -----------------------

    /// New word from the selected category, fresh full-length countdown, and
    /// the current score and team re-announced.
    pub fn restart_round(&mut self) -> Result<(), SessionError> {
        self.ensure_in_play()?;
        let word = self.pick_word(None)?;
        self.begin_round(Some(word));
        self.announce_standing();
        Ok(())
    }

    fn begin_round(&mut self, word: Option<String>) {
        if let Some(word) = word {
            self.apply_word(word);
        }
        self.launch_countdown(self.round_duration_seconds, self.tick_interval);
    }

    /// Zero every score, go back to round one and the first team. Teams,
    /// players and the category selection are kept.
    pub fn reset_session(&mut self) {
        self.cancel_countdown();
        for team in &mut self.teams {
            team.points = 0;
        }
        self.player_scores.reset_all();
        self.current_round = 1;
        self.current_word = None;
        self.active_team = self.teams.first().map(|team| team.id);
        self.phase = SessionPhase::Idle;

        info!("Session reset");
        self.announce_standing();
    }

    fn finish(&mut self) {
        self.cancel_countdown();
        self.phase = SessionPhase::SessionEnded;

        let winner = leading_team(&self.teams).cloned();
        match &winner {
            Some(team) => info!("Session ended, {} wins with {} points", team.name, team.points),
            None => info!("Session ended without a winner"),
        }
        self.notify(SessionEvent::SessionEnded { winner });
    }

    fn announce_standing(&mut self) {
        let score = match self.active_team() {
            Some(team) => team.points,
            None => self
                .players
                .first()
                .map(|player| self.player_scores.get(&player.id))
                .unwrap_or(0),
        };
        self.notify(SessionEvent::ScoreChanged { score });

        if let Some(team) = self.active_team().cloned() {
            self.notify(SessionEvent::TurnChanged { team });
        }
    }

    fn ensure_in_play(&self) -> Result<(), SessionError> {
        if self.phase == SessionPhase::SessionEnded {
            return Err(SessionError::invalid_state(
                "session has ended; reset it to play again",
            ));
        }
        Ok(())
    }

    fn notify(&mut self, event: SessionEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.handle_event(event);
        }
    }

    // -----------------------
    // Accessors
    // -----------------------

    fn active_team_index(&self) -> Option<usize> {
        let id = self.active_team?;
        self.teams.iter().position(|team| team.id == id)
    }

    pub fn active_team(&self) -> Option<&Team> {
        self.active_team_index().map(|index| &self.teams[index])
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category
            .and_then(|index| self.categories.get(index))
    }

    pub fn current_word(&self) -> Option<&str> {
        self.current_word.as_deref()
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn round_duration_seconds(&self) -> u32 {
        self.round_duration_seconds
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            teams: self.teams.clone(),
            active_team: self.active_team,
            players: self
                .players
                .iter()
                .map(|player| PlayerStanding {
                    player: player.clone(),
                    points: self.player_scores.get(&player.id),
                })
                .collect(),
            categories: self.categories.names(),
            selected_category: self.selected_category().map(|c| c.name().to_string()),
            current_word: self.current_word.clone(),
            countdown_active: self.countdown_active(),
            created_at: self.created_at.to_rfc3339(),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_countdown();
    }
}
