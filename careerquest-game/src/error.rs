//! Failure taxonomy for the progression engine.
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::stage::CareerStage;

/// Coarse failure classes that outer layers map to their own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input: bad index, unknown enum tag, invalid name, bad content.
    Validation,
    /// The player's stage does not grant access to the requested challenge.
    Permission,
    /// The aggregate is in a state that forbids the operation.
    StateConflict,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Permission => "permission",
            Self::StateConflict => "state_conflict",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by guards, constructors, and player transitions.
///
/// Every operation that returns this error leaves the player untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid option index {index}: challenge has {option_count} options")]
    InvalidOptionIndex { index: i64, option_count: usize },
    #[error("unknown {field} value '{value}'")]
    UnknownValue { field: &'static str, value: String },
    #[error("invalid player name: {reason}")]
    InvalidName { reason: String },
    #[error("invalid challenge '{challenge_id}': {reason}")]
    InvalidChallenge { challenge_id: String, reason: String },
    #[error("invalid player snapshot: {reason}")]
    InvalidSnapshot { reason: String },
    #[error("stage '{required}' is required for this challenge (current stage: '{current}')")]
    StageLocked {
        required: CareerStage,
        current: CareerStage,
    },
    #[error("game over: recover before answering more challenges")]
    GameOver,
    #[error("career already completed")]
    CareerCompleted,
    #[error("challenge '{challenge_id}' has already been completed")]
    AlreadyCompleted { challenge_id: String },
}

impl GameError {
    /// Failure class used for transport-level mapping.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOptionIndex { .. }
            | Self::UnknownValue { .. }
            | Self::InvalidName { .. }
            | Self::InvalidChallenge { .. }
            | Self::InvalidSnapshot { .. } => ErrorKind::Validation,
            Self::StageLocked { .. } => ErrorKind::Permission,
            Self::GameOver | Self::CareerCompleted | Self::AlreadyCompleted { .. } => {
                ErrorKind::StateConflict
            }
        }
    }

    pub(crate) fn unknown(field: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            field,
            value: value.into(),
        }
    }

    pub(crate) fn invalid_challenge(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidChallenge {
            challenge_id: id.into(),
            reason: reason.into(),
        }
    }
}
