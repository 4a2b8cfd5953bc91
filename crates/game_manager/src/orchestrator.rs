//! Sequencing of one game turn: human move, terminal check, engine reply.

use std::sync::Arc;
use std::time::Duration;

use chess_core::{GameStatus, Side};
use tracing::{error, info, instrument, warn};
use uci_engine::{DEFAULT_MOVE_TIME, Engine, Strength};

use crate::error::GameError;
use crate::session::Session;
use crate::store::SessionStore;

/// Result of starting a game.
#[derive(Debug, Clone)]
pub struct GameStart {
    /// State after the engine's opening move, if it had one.
    pub session: Session,
    pub engine_move: Option<String>,
}

/// Result of a human turn.
#[derive(Debug, Clone)]
pub struct MoveOutcome {
    pub session: Session,
    /// `None` when the human move ended the game.
    pub engine_move: Option<String>,
    /// Centipawns, white-positive.
    pub evaluation: Option<i32>,
}

impl MoveOutcome {
    pub fn status(&self) -> GameStatus {
        self.session.status()
    }

    pub fn winner(&self) -> Option<Side> {
        self.session.winner()
    }
}

/// Drives games against one shared engine.
///
/// Session locks are never held while the engine thinks; every change goes
/// back through the store, which rechecks turn and legality at commit.
pub struct MoveOrchestrator {
    store: Arc<dyn SessionStore>,
    engine: Arc<dyn Engine>,
    base_budget: Duration,
}

impl MoveOrchestrator {
    pub fn new(store: Arc<dyn SessionStore>, engine: Arc<dyn Engine>) -> Self {
        Self {
            store,
            engine,
            base_budget: DEFAULT_MOVE_TIME,
        }
    }

    pub fn with_base_budget(mut self, base_budget: Duration) -> Self {
        self.base_budget = base_budget;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Create a game. When the human plays black, the engine opens.
    #[instrument(skip(self), fields(rating = strength.rating()))]
    pub async fn start_game(
        &self,
        human_side: Side,
        strength: Strength,
    ) -> Result<GameStart, GameError> {
        let session = self.store.create(human_side, strength).await;
        if session.turn() == human_side {
            return Ok(GameStart {
                session,
                engine_move: None,
            });
        }

        let id = session.id().to_string();
        let (session, engine_move, _) = match self.engine_turn(session).await {
            Ok(turn) => turn,
            Err(e) => {
                // The caller never learns the id, so nobody could resume it
                self.store.delete(&id).await;
                warn!(session_id = %id, "Discarded game the engine could not open");
                return Err(e);
            }
        };
        info!(session_id = %session.id(), ?engine_move, "Engine opened the game");
        Ok(GameStart {
            session,
            engine_move,
        })
    }

    /// Play the human's move and, if the game goes on, the engine's reply.
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn play_human_move(&self, id: &str, mv: &str) -> Result<MoveOutcome, GameError> {
        let session = self.load(id).await?;
        if !session.is_ongoing() {
            return Err(GameError::Conflict {
                status: session.status(),
                winner: session.winner(),
            });
        }
        let human = session.human_side();
        if session.turn() != human {
            return Err(GameError::Validation("not your turn".into()));
        }

        if !self.store.apply_move_as(id, human, mv).await {
            return Err(self.explain_rejection(id, human).await);
        }

        let session = self.load(id).await?;
        if !session.is_ongoing() {
            info!(status = %session.status(), "Game ended on the human move");
            return Ok(MoveOutcome {
                session,
                engine_move: None,
                evaluation: None,
            });
        }

        let (session, engine_move, evaluation) = self.engine_turn(session).await?;
        Ok(MoveOutcome {
            session,
            engine_move,
            evaluation,
        })
    }

    /// Retry the engine's reply after a failed engine turn.
    ///
    /// A fault leaves the human move applied and the engine to move; the game
    /// stays stuck until the client asks for the owed move again.
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn resume_engine_turn(&self, id: &str) -> Result<MoveOutcome, GameError> {
        let session = self.load(id).await?;
        if !session.is_ongoing() {
            return Err(GameError::Conflict {
                status: session.status(),
                winner: session.winner(),
            });
        }
        if session.turn() != session.engine_side() {
            return Err(GameError::Validation("no engine move pending".into()));
        }

        let (session, engine_move, evaluation) = self.engine_turn(session).await?;
        Ok(MoveOutcome {
            session,
            engine_move,
            evaluation,
        })
    }

    /// Full-strength evaluation of the game's current position.
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn evaluate(&self, id: &str, depth: u8) -> Result<Option<i32>, GameError> {
        let session = self.load(id).await?;
        self.engine
            .evaluate(session.position(), depth)
            .await
            .map_err(|e| {
                error!(error = %e, "Evaluation failed");
                GameError::from(e)
            })
    }

    async fn load(&self, id: &str) -> Result<Session, GameError> {
        self.store
            .get(id)
            .await
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    /// The store only answers yes or no. Re-read to tell a lost race (the game
    /// ended, or the turn moved on) apart from a bad move.
    async fn explain_rejection(&self, id: &str, human: Side) -> GameError {
        match self.store.get(id).await {
            None => GameError::NotFound(id.to_string()),
            Some(s) if !s.is_ongoing() => GameError::Conflict {
                status: s.status(),
                winner: s.winner(),
            },
            Some(s) if s.turn() != human => GameError::Validation("not your turn".into()),
            Some(_) => GameError::Validation("invalid move".into()),
        }
    }

    /// Ask the engine for a move in `session` and commit it.
    async fn engine_turn(
        &self,
        session: Session,
    ) -> Result<(Session, Option<String>, Option<i32>), GameError> {
        let id = session.id().to_string();
        let side = session.engine_side();

        let reply = self
            .engine
            .request_move(session.position(), session.engine_strength(), self.base_budget)
            .await
            .map_err(|e| {
                error!(session_id = %id, error = %e, "Engine failed to move");
                GameError::from(e)
            })?;

        let mv = reply.mv.to_string();
        if !self.store.apply_move_as(&id, side, &mv).await {
            error!(session_id = %id, %mv, "Store refused the engine move");
            return Err(GameError::Internal(format!(
                "engine move {mv} could not be applied to game {id}"
            )));
        }

        let session = self.load(&id).await?;
        info!(
            session_id = %id,
            %mv,
            evaluation = ?reply.evaluation,
            status = %session.status(),
            "Engine moved"
        );
        Ok((session, Some(mv), reply.evaluation))
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod orchestrator_tests;
