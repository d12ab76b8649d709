use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::players::{PlayerStanding, Team, TeamId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionPhase {
    Idle,         // No word in play
    RoundActive,  // Word drawn, players guessing
    RoundEnded,   // Countdown expired, waiting for the caller
    SessionEnded, // Final round finished in team mode
}

/// Point-in-time view of a session for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub phase: SessionPhase,
    pub current_round: u32,
    pub total_rounds: u32,
    pub teams: Vec<Team>,
    pub active_team: Option<TeamId>,
    pub players: Vec<PlayerStanding>,
    pub categories: Vec<String>,
    pub selected_category: Option<String>,
    pub current_word: Option<String>,
    pub countdown_active: bool,
    pub created_at: String, // ISO 8601 string
}

impl SessionSnapshot {
    pub fn active_team(&self) -> Option<&Team> {
        let id = self.active_team?;
        self.teams.iter().find(|team| team.id == id)
    }
}
