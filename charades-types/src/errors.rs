use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Recoverable failures reported synchronously by session operations.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
    #[error("not found: {name}")]
    NotFound { name: String },
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },
    #[error("category '{name}' has no words")]
    EmptyCategory { name: String },
}

impl SessionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        SessionError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        SessionError::NotFound { name: name.into() }
    }

    pub fn invalid_state(reason: impl Into<String>) -> Self {
        SessionError::InvalidState {
            reason: reason.into(),
        }
    }
}
