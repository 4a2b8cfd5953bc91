//! Terminal-state classification.

use crate::position::Position;
use crate::types::{DrawReason, GameStatus, Side};

/// Result of classifying a position after a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ongoing,
    Checkmate { winner: Side },
    Stalemate,
    Draw(DrawReason),
}

impl Outcome {
    pub fn status(self) -> GameStatus {
        match self {
            Outcome::Ongoing => GameStatus::Ongoing,
            Outcome::Checkmate { .. } => GameStatus::Checkmate,
            Outcome::Stalemate => GameStatus::Stalemate,
            Outcome::Draw(_) => GameStatus::Draw,
        }
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            Outcome::Checkmate { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn draw_reason(self) -> Option<DrawReason> {
        match self {
            Outcome::Draw(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        self != Outcome::Ongoing
    }
}

/// Classify `position`, the result of the move just played.
///
/// `seen` holds the repetition keys of every position reached so far in the
/// game, the current one included. First match wins: checkmate, stalemate,
/// insufficient material, fifty-move rule, threefold repetition.
pub fn classify(position: &Position, seen: &[u64]) -> Outcome {
    if position.is_checkmate() {
        return Outcome::Checkmate {
            winner: position.side_to_move().opponent(),
        };
    }
    if position.is_stalemate() {
        return Outcome::Stalemate;
    }
    if position.is_insufficient_material() {
        return Outcome::Draw(DrawReason::InsufficientMaterial);
    }
    if position.is_fifty_move_draw() {
        return Outcome::Draw(DrawReason::FiftyMoveRule);
    }
    let key = position.repetition_key();
    if seen.iter().filter(|&&k| k == key).count() >= 3 {
        return Outcome::Draw(DrawReason::ThreefoldRepetition);
    }
    Outcome::Ongoing
}

#[cfg(test)]
#[path = "outcome_tests.rs"]
mod outcome_tests;
