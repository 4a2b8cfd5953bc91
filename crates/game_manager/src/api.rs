//! Request and response payloads of the game service.

use chess_core::{DrawReason, GameStatus, Side};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uci_engine::{Strength, StrengthInput};

use crate::error::{ErrorCode, GameError};
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// `white` or `black`.
    pub player_color: String,
    /// Skill level 0-20.
    #[serde(default)]
    pub bot_level: Option<i64>,
    /// Rating 1320-3000. Wins over `bot_level` when both are given.
    #[serde(default)]
    pub bot_elo: Option<i64>,
}

impl CreateSessionRequest {
    pub fn strength_input(&self) -> Option<StrengthInput> {
        match (self.bot_elo, self.bot_level) {
            (Some(rating), _) => Some(StrengthInput::Rating(rating)),
            (None, Some(level)) => Some(StrengthInput::Level(level)),
            (None, None) => None,
        }
    }

    /// Requested strength, clamped into range. Defaults when unspecified.
    pub fn strength(&self) -> Strength {
        self.strength_input().map(Strength::from).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartGameResponse {
    pub game_id: String,
    pub board_fen: String,
    pub current_turn: Side,
    pub player_color: Side,
    pub bot_level: u8,
    pub bot_elo: u16,
    /// The engine's opening move when the player took black.
    pub bot_move: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMoveRequest {
    pub game_id: String,
    #[serde(rename = "move")]
    pub mv: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMoveResponse {
    pub success: bool,
    pub board_fen: String,
    pub bot_move: Option<String>,
    pub status: GameStatus,
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_reason: Option<DrawReason>,
    /// Centipawns, positive favors white.
    pub evaluation: Option<i32>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub game_id: String,
    pub board_fen: String,
    pub player_color: Side,
    pub bot_level: u8,
    pub bot_elo: u16,
    pub move_history: Vec<String>,
    pub status: GameStatus,
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_reason: Option<DrawReason>,
    pub current_turn: Side,
    pub last_move: Option<String>,
    pub legal_moves: Vec<String>,
}

impl From<&Session> for GameStateResponse {
    fn from(session: &Session) -> Self {
        Self {
            game_id: session.id().to_string(),
            board_fen: session.fen(),
            player_color: session.human_side(),
            bot_level: session.engine_strength().level(),
            bot_elo: session.engine_strength().rating(),
            move_history: session.history().to_vec(),
            status: session.status(),
            winner: session.winner(),
            draw_reason: session.draw_reason(),
            current_turn: session.turn(),
            last_move: session.last_move().map(str::to_string),
            legal_moves: session.legal_moves(),
        }
    }
}

/// One entry of the session listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: String,
    pub board_fen: String,
    pub player_color: Side,
    pub bot_level: u8,
    pub bot_elo: u16,
    pub move_history: Vec<String>,
    pub status: GameStatus,
    pub winner: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_reason: Option<DrawReason>,
    pub current_turn: Side,
    pub created_at: DateTime<Utc>,
    pub last_move: Option<String>,
}

impl From<&Session> for GameSummary {
    fn from(session: &Session) -> Self {
        Self {
            game_id: session.id().to_string(),
            board_fen: session.fen(),
            player_color: session.human_side(),
            bot_level: session.engine_strength().level(),
            bot_elo: session.engine_strength().rating(),
            move_history: session.history().to_vec(),
            status: session.status(),
            winner: session.winner(),
            draw_reason: session.draw_reason(),
            current_turn: session.turn(),
            created_at: session.created_at(),
            last_move: session.last_move().map(str::to_string),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionListResponse {
    pub count: usize,
    pub games: Vec<GameSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationResponse {
    pub game_id: String,
    pub depth: u8,
    /// Centipawns, positive favors white. `None` when only a mate score was
    /// reported or the engine has no evaluation.
    pub evaluation: Option<i32>,
}

/// Error body returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl From<&GameError> for ApiError {
    fn from(err: &GameError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod api_tests;
