//! Position codec for the play service.
//!
//! Move generation and check detection come from `cozy-chess`; this crate
//! turns that into the vocabulary the rest of the workspace speaks:
//! - [`Position`]: an immutable, FEN-backed position value
//! - [`UciMove`]: the 4-5 character move encoding used on the wire
//! - [`classify`]: terminal-state detection with a fixed precedence

pub mod outcome;
pub mod position;
pub mod types;
pub mod uci;

pub use outcome::{Outcome, classify};
pub use position::{Position, PositionError, START_FEN};
pub use types::{DrawReason, GameStatus, ParseSideError, Side};
pub use uci::{MoveError, UciMove};
