use chess_core::{GameStatus, Side};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uci_engine::EngineError;

/// Failures of game operations.
#[derive(Debug, Error)]
pub enum GameError {
    /// The caller asked for something the rules do not allow.
    #[error("{0}")]
    Validation(String),

    #[error("game {0} not found")]
    NotFound(String),

    #[error("game already concluded ({status})")]
    Conflict {
        status: GameStatus,
        winner: Option<Side>,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Broken invariant between store and engine.
    #[error("{0}")]
    Internal(String),
}

/// Stable category of a [`GameError`] for clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    NotFound,
    Conflict,
    BadRequest,
    EngineFault,
}

impl GameError {
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::Validation(_) => ErrorCode::BadRequest,
            GameError::NotFound(_) => ErrorCode::NotFound,
            GameError::Conflict { .. } => ErrorCode::Conflict,
            GameError::Engine(_) | GameError::Internal(_) => ErrorCode::EngineFault,
        }
    }
}
