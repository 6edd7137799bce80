use thiserror::Error;

use crate::model::RoundPhase;

/// Reasons a command was rejected. None of these end the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("guess is empty")]
    EmptyInput,

    #[error("a hint costs {cost} points but the score is {score}")]
    InsufficientScore { score: u32, cost: u32 },

    #[error("all hints have already been revealed")]
    NoHintsRemaining,

    #[error("creature provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("{command} is not allowed while {phase:?}")]
    InvalidTransition {
        command: &'static str,
        phase: RoundPhase,
    },
}

/// Errors returned by a [`crate::game::provider::CreatureProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("no creature with id {0}")]
    NotFound(u32),

    #[error("provider request failed: {0}")]
    Request(String),

    #[error("malformed creature data: {0}")]
    Malformed(String),

    #[error("could not read roster: {0}")]
    Unreadable(String),
}

impl From<ProviderError> for GameError {
    fn from(error: ProviderError) -> Self {
        GameError::ProviderUnavailable(error.to_string())
    }
}

/// Errors raised by a [`crate::game::persistence::PersistenceStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
