//! Immutable position value.
//!
//! A [`Position`] wraps a cozy-chess board and only ever produces new values:
//! legality and terminal checks are pure functions over it.

use std::fmt;
use std::str::FromStr;

use cozy_chess::{Board, Color, Piece, Square};
use thiserror::Error;

use crate::types::Side;
use crate::uci::{MoveError, UciMove, to_standard};

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    #[error("invalid FEN `{fen}`: {reason}")]
    InvalidFen { fen: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    board: Board,
}

impl Position {
    pub fn startpos() -> Self {
        Self {
            board: Board::default(),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        Board::from_fen(fen.trim(), false)
            .map(|board| Self { board })
            .map_err(|e| PositionError::InvalidFen {
                fen: fen.to_string(),
                reason: format!("{e:?}"),
            })
    }

    /// Replay a move list from the starting position.
    pub fn replay<'a, I>(moves: I) -> Result<Self, MoveError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        moves.into_iter().try_fold(Self::startpos(), |pos, txt| {
            let mv: UciMove = txt.parse()?;
            pos.play(&mv)
        })
    }

    pub fn fen(&self) -> String {
        self.board.to_string()
    }

    pub fn side_to_move(&self) -> Side {
        self.board.side_to_move().into()
    }

    pub fn halfmove_clock(&self) -> u32 {
        u32::from(self.board.halfmove_clock())
    }

    pub fn fullmove_number(&self) -> u32 {
        u32::from(self.board.fullmove_number())
    }

    /// Underlying board, for engines that search on it directly.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// All legal moves in standard UCI notation.
    ///
    /// Order follows the move generator and is stable for a given position.
    pub fn legal_moves(&self) -> Vec<UciMove> {
        let mut moves = Vec::with_capacity(64);
        self.board.generate_moves(|piece_moves| {
            for mv in piece_moves {
                moves.push(UciMove::from_raw(to_standard(&self.board, mv)));
            }
            false
        });
        moves
    }

    pub fn is_legal(&self, mv: &UciMove) -> bool {
        self.legal_moves().contains(mv)
    }

    /// Play a move, returning the resulting position. `self` is untouched.
    pub fn play(&self, mv: &UciMove) -> Result<Position, MoveError> {
        let raw = self
            .raw_legal_move(mv)
            .ok_or_else(|| MoveError::Illegal {
                mv: mv.to_string(),
                fen: self.fen(),
            })?;
        let mut board = self.board.clone();
        board.try_play(raw).map_err(|_| MoveError::Illegal {
            mv: mv.to_string(),
            fen: self.fen(),
        })?;
        Ok(Position { board })
    }

    // Finds the generator's own encoding of a standard-notation move.
    fn raw_legal_move(&self, mv: &UciMove) -> Option<cozy_chess::Move> {
        let mut found = None;
        self.board.generate_moves(|piece_moves| {
            for raw in piece_moves {
                if UciMove::from_raw(to_standard(&self.board, raw)) == *mv {
                    found = Some(raw);
                    return true;
                }
            }
            false
        });
        found
    }

    pub fn in_check(&self) -> bool {
        !self.board.checkers().is_empty()
    }

    fn has_legal_moves(&self) -> bool {
        self.board.generate_moves(|piece_moves| piece_moves.into_iter().next().is_some())
    }

    pub fn is_checkmate(&self) -> bool {
        self.in_check() && !self.has_legal_moves()
    }

    pub fn is_stalemate(&self) -> bool {
        !self.in_check() && !self.has_legal_moves()
    }

    /// Neither side can possibly deliver mate.
    pub fn is_insufficient_material(&self) -> bool {
        [Side::White, Side::Black]
            .into_iter()
            .all(|side| self.side_has_insufficient_material(side))
    }

    fn side_has_insufficient_material(&self, side: Side) -> bool {
        let b = &self.board;
        let ours = b.colors(Color::from(side));
        let theirs = b.colors(Color::from(side.opponent()));

        let heavy = b.pieces(Piece::Pawn) | b.pieces(Piece::Rook) | b.pieces(Piece::Queen);
        if !(ours & heavy).is_empty() {
            return false;
        }

        if !(ours & b.pieces(Piece::Knight)).is_empty() {
            // A lone knight can only mate with help from the opponent's own pieces.
            let helpers = theirs & !b.pieces(Piece::King) & !b.pieces(Piece::Queen);
            return ours.len() <= 2 && helpers.is_empty();
        }

        if !(ours & b.pieces(Piece::Bishop)).is_empty() {
            let bishops = b.pieces(Piece::Bishop);
            let on_dark = bishops.into_iter().filter(|&sq| is_dark(sq)).count();
            let same_shade = on_dark == 0 || on_dark == bishops.len() as usize;
            return same_shade
                && b.pieces(Piece::Pawn).is_empty()
                && b.pieces(Piece::Knight).is_empty();
        }

        true
    }

    /// The fifty-move draw can be claimed: fifty full moves without a capture
    /// or pawn move, or one quiet move away from it.
    pub fn is_fifty_move_draw(&self) -> bool {
        match self.board.halfmove_clock() {
            100.. => true,
            99 => self.has_clock_completing_move(),
            _ => false,
        }
    }

    // Some quiet move brings the clock to 100 and leaves the opponent a move.
    fn has_clock_completing_move(&self) -> bool {
        let theirs = self.board.colors(Color::from(self.side_to_move().opponent()));
        let mut found = false;
        self.board.generate_moves(|piece_moves| {
            if piece_moves.piece == Piece::Pawn {
                return false;
            }
            for mv in piece_moves {
                if theirs.has(mv.to) {
                    continue;
                }
                let mut board = self.board.clone();
                board.play_unchecked(mv);
                if board.halfmove_clock() >= 100 && (Position { board }).has_legal_moves() {
                    found = true;
                    return true;
                }
            }
            false
        });
        found
    }

    /// Key identifying the position for repetition purposes.
    ///
    /// Covers placement, side to move, castling and en passant; ignores the
    /// move counters.
    pub fn repetition_key(&self) -> u64 {
        self.board.hash()
    }
}

fn is_dark(sq: Square) -> bool {
    (sq.file() as usize + sq.rank() as usize) % 2 == 0
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board)
    }
}

impl FromStr for Position {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

#[cfg(test)]
#[path = "position_tests.rs"]
mod position_tests;
