use charades_types::{PlayerId, Team};
use std::collections::HashMap;

/// Per-player scores for solo play, keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct PlayerScores {
    scores: HashMap<PlayerId, i32>,
}

impl PlayerScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a player at zero without touching an existing score.
    pub fn track(&mut self, player_id: PlayerId) {
        self.scores.entry(player_id).or_insert(0);
    }

    /// Untracked players read as zero.
    pub fn get(&self, player_id: &PlayerId) -> i32 {
        self.scores.get(player_id).copied().unwrap_or(0)
    }

    pub fn increment(&mut self, player_id: PlayerId) -> i32 {
        let score = self.scores.entry(player_id).or_insert(0);
        *score += 1;
        *score
    }

    pub fn reset_all(&mut self) {
        for score in self.scores.values_mut() {
            *score = 0;
        }
    }

    pub fn tracked(&self) -> usize {
        self.scores.len()
    }
}

/// Team with the most points; ties go to the team listed first.
pub fn leading_team(teams: &[Team]) -> Option<&Team> {
    teams.iter().fold(None, |best: Option<&Team>, team| match best {
        Some(current) if current.points >= team.points => Some(current),
        _ => Some(team),
    })
}
