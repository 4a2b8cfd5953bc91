//! UCI move encoding: `e2e4`, `e7e8q`, castling as the king's two-square step.

use std::fmt;
use std::str::FromStr;

use cozy_chess::{Board, File, Move, Piece, Square};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("`{0}` is not a valid UCI move")]
    Syntax(String),
    #[error("move {mv} is not legal in position {fen}")]
    Illegal { mv: String, fen: String },
}

/// A syntactically valid move in standard UCI notation.
///
/// Parsing only checks the shape of the text. Whether the move can be played
/// is a question for [`crate::Position`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UciMove(Move);

impl UciMove {
    pub fn from(self) -> Square {
        self.0.from
    }

    pub fn to(self) -> Square {
        self.0.to
    }

    pub fn promotion(self) -> Option<Piece> {
        self.0.promotion
    }

    pub(crate) fn from_raw(mv: Move) -> Self {
        Self(mv)
    }

    pub(crate) fn raw(self) -> Move {
        self.0
    }
}

impl FromStr for UciMove {
    type Err = MoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let txt = s.trim();
        if !txt.is_ascii() || !(4..=5).contains(&txt.len()) {
            return Err(MoveError::Syntax(s.to_string()));
        }
        let mv: Move = txt
            .to_ascii_lowercase()
            .parse()
            .map_err(|_| MoveError::Syntax(s.to_string()))?;
        if mv.from == mv.to {
            return Err(MoveError::Syntax(s.to_string()));
        }
        match mv.promotion {
            None | Some(Piece::Knight | Piece::Bishop | Piece::Rook | Piece::Queen) => Ok(Self(mv)),
            Some(_) => Err(MoveError::Syntax(s.to_string())),
        }
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// cozy-chess encodes castling as "king captures own rook" (`e1h1`).
/// Rewrite such moves to the two-square king step (`e1g1`) clients expect.
pub(crate) fn to_standard(board: &Board, mv: Move) -> Move {
    let castles = board.piece_on(mv.from) == Some(Piece::King)
        && board.color_on(mv.to) == board.color_on(mv.from);
    if !castles {
        return mv;
    }
    let file = if (mv.to.file() as usize) > (mv.from.file() as usize) {
        File::G
    } else {
        File::C
    };
    Move {
        from: mv.from,
        to: Square::new(file, mv.from.rank()),
        promotion: None,
    }
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
