//! Game sessions against an engine.
//!
//! - [`store`]: registry of live sessions behind the [`SessionStore`] trait
//! - [`orchestrator`]: one turn of play, human move then engine reply
//! - [`service`]: payload-level operations for a transport to expose

pub mod api;
pub mod error;
pub mod orchestrator;
pub mod service;
pub mod session;
pub mod store;

pub use api::{
    ApiError, CreateSessionRequest, EvaluationResponse, GameStateResponse, GameSummary,
    PlayerMoveRequest, PlayerMoveResponse, SessionListResponse, StartGameResponse,
};
pub use error::{ErrorCode, GameError};
pub use orchestrator::{GameStart, MoveOrchestrator, MoveOutcome};
pub use service::{DEFAULT_EVAL_DEPTH, GameService};
pub use session::{Rejection, Session, SessionId};
pub use store::{InMemorySessionStore, SessionStore};
