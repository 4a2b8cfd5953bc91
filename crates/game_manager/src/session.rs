//! One game between a human and the engine.

use chess_core::{DrawReason, GameStatus, MoveError, Outcome, Position, Side, UciMove, classify};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uci_engine::Strength;
use uuid::Uuid;

/// Opaque session identifier (UUID v4 text).
pub type SessionId = String;

/// Why a move was not applied. The store reports these as a plain `false`;
/// they exist so the reason can be logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("game already concluded ({0})")]
    Finished(GameStatus),
    #[error("it is {turn}'s turn")]
    WrongTurn { turn: Side },
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// Full state of a game.
///
/// Board state, history and outcome only change together through
/// [`Session::apply`], which keeps them consistent: replaying `history` from
/// the start position always yields `position`.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    position: Position,
    human_side: Side,
    engine_strength: Strength,
    history: Vec<String>,
    outcome: Outcome,
    created_at: DateTime<Utc>,
    last_move: Option<String>,
    /// Repetition key of every position reached, the current one included.
    seen: Vec<u64>,
}

impl Session {
    pub(crate) fn new(human_side: Side, engine_strength: Strength) -> Self {
        let position = Position::startpos();
        let seen = vec![position.repetition_key()];
        Self {
            id: Uuid::new_v4().to_string(),
            position,
            human_side,
            engine_strength,
            history: Vec::new(),
            outcome: Outcome::Ongoing,
            created_at: Utc::now(),
            last_move: None,
            seen,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn fen(&self) -> String {
        self.position.fen()
    }

    pub fn human_side(&self) -> Side {
        self.human_side
    }

    pub fn engine_side(&self) -> Side {
        self.human_side.opponent()
    }

    pub fn engine_strength(&self) -> Strength {
        self.engine_strength
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn status(&self) -> GameStatus {
        self.outcome.status()
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.winner()
    }

    pub fn draw_reason(&self) -> Option<DrawReason> {
        self.outcome.draw_reason()
    }

    /// Side to move.
    pub fn turn(&self) -> Side {
        self.position.side_to_move()
    }

    pub fn is_ongoing(&self) -> bool {
        !self.outcome.is_terminal()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn last_move(&self) -> Option<&str> {
        self.last_move.as_deref()
    }

    /// Legal moves of the current position. A concluded game may still list
    /// some (after a draw), but none of them will be accepted.
    pub fn legal_moves(&self) -> Vec<String> {
        self.position
            .legal_moves()
            .iter()
            .map(UciMove::to_string)
            .collect()
    }

    /// Apply `mv`, optionally requiring that `side` is on move.
    ///
    /// Nothing changes unless every check passes.
    pub(crate) fn apply(&mut self, mv: &str, side: Option<Side>) -> Result<(), Rejection> {
        if !self.is_ongoing() {
            return Err(Rejection::Finished(self.status()));
        }
        let turn = self.turn();
        if side.is_some_and(|s| s != turn) {
            return Err(Rejection::WrongTurn { turn });
        }

        let parsed: UciMove = mv.parse()?;
        let next = self.position.play(&parsed)?;

        // Store the normalized spelling (lowercase, castling as king step)
        let played = parsed.to_string();
        self.seen.push(next.repetition_key());
        self.outcome = classify(&next, &self.seen);
        self.position = next;
        self.history.push(played.clone());
        self.last_move = Some(played);
        Ok(())
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod session_tests;
