//! Engine seam for the play service.
//!
//! [`Engine`] is what the orchestrator talks to. [`UciEngine`] implements it
//! on top of an external UCI process (Stockfish or compatible); other
//! implementations, like the random mover, plug in behind the same trait.

mod adapter;
pub mod discovery;
mod error;
mod process;
pub mod protocol;
pub mod strength;
pub mod time_control;

use std::time::Duration;

use async_trait::async_trait;
use chess_core::{Position, UciMove};

pub use adapter::{DEFAULT_STARTUP_TIMEOUT, UciEngine};
pub use discovery::locate_engine;
pub use error::EngineError;
pub use process::{EngineCommand, SearchReply, UciProcess};
pub use protocol::Score;
pub use strength::{Strength, StrengthInput, StrengthSettings};
pub use time_control::{DEFAULT_MOVE_TIME, MoveBudget};

/// A move chosen by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineMove {
    pub mv: UciMove,
    /// Centipawns from white's point of view, if the engine reported one.
    pub evaluation: Option<i32>,
}

/// Something that can pick moves and judge positions.
///
/// Implementations must be safe to call from many games at once; the
/// process-backed engine serializes requests internally.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Choose a legal move for the side to move in `position`.
    ///
    /// `base_budget` is the thinking time at the lowest strength; stronger
    /// settings get more.
    async fn request_move(
        &self,
        position: &Position,
        strength: Strength,
        base_budget: Duration,
    ) -> Result<EngineMove, EngineError>;

    /// Full-strength evaluation to `depth`, in centipawns from white's point
    /// of view. `None` when the engine only reports a mate score.
    async fn evaluate(&self, position: &Position, depth: u8) -> Result<Option<i32>, EngineError>;

    /// Release engine resources. Safe to call more than once.
    async fn shutdown(&self) {}

    /// Whether requests can still be served.
    fn is_ready(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}
