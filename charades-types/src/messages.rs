use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::players::{Player, Team};

/// Notifications pushed from a session to its observer, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionEvent {
    WordChanged { word: String },
    Tick { seconds_remaining: u32 },
    TimeExpired,
    ScoreChanged { score: i32 },
    TurnChanged { team: Team },
    PlayerRegistered { player: Player },
    SessionEnded { winner: Option<Team> },
}

impl SessionEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            SessionEvent::WordChanged { .. } => "word_changed",
            SessionEvent::Tick { .. } => "tick",
            SessionEvent::TimeExpired => "time_expired",
            SessionEvent::ScoreChanged { .. } => "score_changed",
            SessionEvent::TurnChanged { .. } => "turn_changed",
            SessionEvent::PlayerRegistered { .. } => "player_registered",
            SessionEvent::SessionEnded { .. } => "session_ended",
        }
    }
}
