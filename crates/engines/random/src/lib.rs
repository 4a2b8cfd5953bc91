//! Random Move Engine
//!
//! Picks moves uniformly at random from all legal moves. Useful for:
//! - Running the service on a host without an engine binary
//! - Tests that need a deterministic opponent (seeded)

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chess_core::Position;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::trace;
use uci_engine::{Engine, EngineError, EngineMove, Strength};

#[cfg(test)]
mod lib_tests;

/// An engine that plays random legal moves and has no opinion on positions.
#[derive(Debug)]
pub struct RandomEngine {
    rng: Mutex<StdRng>,
}

impl RandomEngine {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible move sequence.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for RandomEngine {
    async fn request_move(
        &self,
        position: &Position,
        _strength: Strength,
        _base_budget: Duration,
    ) -> Result<EngineMove, EngineError> {
        let moves = position.legal_moves();
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        let mv = *moves.choose(&mut *rng).ok_or(EngineError::NoMove)?;
        trace!(%mv, candidates = moves.len(), "Random move");
        Ok(EngineMove {
            mv,
            evaluation: None,
        })
    }

    async fn evaluate(&self, _position: &Position, _depth: u8) -> Result<Option<i32>, EngineError> {
        Ok(None)
    }

    fn name(&self) -> &str {
        "Random v1.0"
    }
}
