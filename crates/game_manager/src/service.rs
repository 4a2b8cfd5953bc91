//! Transport-independent game service.
//!
//! Turns request payloads into orchestrator calls and snapshots into response
//! payloads. Any transport (the HTTP host, tests) sits on top of this.

use chess_core::Side;
use tracing::{debug, info, instrument};

use crate::api::{
    CreateSessionRequest, EvaluationResponse, GameStateResponse, GameSummary, PlayerMoveRequest,
    PlayerMoveResponse, SessionListResponse, StartGameResponse,
};
use crate::error::GameError;
use crate::orchestrator::{MoveOrchestrator, MoveOutcome};

/// Default search depth for position evaluation.
pub const DEFAULT_EVAL_DEPTH: u8 = 15;

pub struct GameService {
    orchestrator: MoveOrchestrator,
    eval_depth: u8,
}

impl GameService {
    pub fn new(orchestrator: MoveOrchestrator) -> Self {
        Self {
            orchestrator,
            eval_depth: DEFAULT_EVAL_DEPTH,
        }
    }

    pub fn with_eval_depth(mut self, depth: u8) -> Self {
        self.eval_depth = depth.max(1);
        self
    }

    pub fn orchestrator(&self) -> &MoveOrchestrator {
        &self.orchestrator
    }

    pub fn engine_name(&self) -> &str {
        self.orchestrator.engine().name()
    }

    pub fn engine_ready(&self) -> bool {
        self.orchestrator.engine().is_ready()
    }

    pub async fn session_count(&self) -> usize {
        self.orchestrator.store().count().await
    }

    #[instrument(skip(self))]
    pub async fn create_session(
        &self,
        request: CreateSessionRequest,
    ) -> Result<StartGameResponse, GameError> {
        let side: Side = request
            .player_color
            .parse()
            .map_err(|e: chess_core::ParseSideError| GameError::Validation(e.to_string()))?;
        let strength = request.strength();

        let start = self.orchestrator.start_game(side, strength).await?;
        let session = &start.session;
        info!(session_id = %session.id(), player = %side, %strength, "Started game");

        Ok(StartGameResponse {
            game_id: session.id().to_string(),
            board_fen: session.fen(),
            current_turn: session.turn(),
            player_color: side,
            bot_level: strength.level(),
            bot_elo: strength.rating(),
            bot_move: start.engine_move,
        })
    }

    #[instrument(skip(self), fields(session_id = %request.game_id, mv = %request.mv))]
    pub async fn play_move(
        &self,
        request: PlayerMoveRequest,
    ) -> Result<PlayerMoveResponse, GameError> {
        let outcome = self
            .orchestrator
            .play_human_move(&request.game_id, &request.mv)
            .await?;
        Ok(move_response(outcome))
    }

    /// Ask the engine again for a reply it failed to deliver.
    #[instrument(skip(self))]
    pub async fn resume_game(&self, id: &str) -> Result<PlayerMoveResponse, GameError> {
        let outcome = self.orchestrator.resume_engine_turn(id).await?;
        Ok(move_response(outcome))
    }

    pub async fn get_state(&self, id: &str) -> Result<GameStateResponse, GameError> {
        self.orchestrator
            .store()
            .get(id)
            .await
            .map(|session| GameStateResponse::from(&session))
            .ok_or_else(|| GameError::NotFound(id.to_string()))
    }

    pub async fn delete_session(&self, id: &str) -> bool {
        self.orchestrator.store().delete(id).await
    }

    pub async fn list_sessions(&self) -> SessionListResponse {
        let games: Vec<GameSummary> = self
            .orchestrator
            .store()
            .list()
            .await
            .iter()
            .map(GameSummary::from)
            .collect();
        debug!(count = games.len(), "Listed sessions");
        SessionListResponse {
            count: games.len(),
            games,
        }
    }

    pub async fn evaluate(
        &self,
        id: &str,
        depth: Option<u8>,
    ) -> Result<EvaluationResponse, GameError> {
        let depth = depth.unwrap_or(self.eval_depth).max(1);
        let evaluation = self.orchestrator.evaluate(id, depth).await?;
        Ok(EvaluationResponse {
            game_id: id.to_string(),
            depth,
            evaluation,
        })
    }
}

fn move_response(outcome: MoveOutcome) -> PlayerMoveResponse {
    let session = &outcome.session;
    let message = (!session.is_ongoing()).then(|| match session.draw_reason() {
        Some(reason) => format!("Game ended: {} ({reason})", session.status()),
        None => format!("Game ended: {}", session.status()),
    });

    PlayerMoveResponse {
        success: true,
        board_fen: session.fen(),
        bot_move: outcome.engine_move,
        status: session.status(),
        winner: session.winner(),
        draw_reason: session.draw_reason(),
        evaluation: outcome.evaluation,
        message,
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod service_tests;
