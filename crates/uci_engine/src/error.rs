use std::time::Duration;

use thiserror::Error;

/// Faults raised by an engine. None of them are user errors: each one aborts
/// the request that hit it.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("engine handshake failed: {0}")]
    Handshake(String),

    #[error("engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("engine did not answer within {0:?}")]
    Timeout(Duration),

    #[error("engine process terminated unexpectedly")]
    Terminated,

    #[error("engine returned no move")]
    NoMove,

    #[error("engine returned illegal move `{mv}` in position {fen}")]
    IllegalMove { mv: String, fen: String },

    #[error("engine is not available")]
    Unavailable,
}
