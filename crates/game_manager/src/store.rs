//! Session registry.
//!
//! [`SessionStore`] is the seam for swapping the backend; the orchestrator
//! only sees the trait. [`InMemorySessionStore`] keeps everything in process
//! memory and loses it on restart.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use chess_core::Side;
use tracing::{debug, info, instrument, warn};
use uci_engine::Strength;

use crate::session::{Session, SessionId};

/// Registry of live sessions.
///
/// Every method is infallible from the caller's point of view: unknown ids and
/// rejected moves are reported through the return value, never as errors.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Register a new game at the start position and return its snapshot.
    async fn create(&self, human_side: Side, strength: Strength) -> Session;

    async fn get(&self, id: &str) -> Option<Session>;

    /// Apply a move for whichever side is on turn. `false` when the id is
    /// unknown, the move does not parse or is illegal, or the game is over.
    async fn apply_move(&self, id: &str, mv: &str) -> bool;

    /// Like [`SessionStore::apply_move`], but also requires `side` to be on
    /// turn at the moment the move commits.
    async fn apply_move_as(&self, id: &str, side: Side, mv: &str) -> bool;

    /// Legal moves in the current position, empty for an unknown id.
    async fn legal_moves(&self, id: &str) -> Vec<String>;

    /// `true` if a session was removed.
    async fn delete(&self, id: &str) -> bool;

    async fn list(&self) -> Vec<Session>;

    async fn count(&self) -> usize;
}

/// Sessions in a map of individually locked entries.
///
/// The map lock is only held to find or insert an entry; moves lock just the
/// session they touch, so games never wait on each other.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<Session>>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, id: &str) -> Option<Arc<Mutex<Session>>> {
        let sessions = self.sessions.read().unwrap_or_else(|e| e.into_inner());
        sessions.get(id).cloned()
    }

    fn apply(&self, id: &str, side: Option<Side>, mv: &str) -> bool {
        let Some(entry) = self.entry(id) else {
            warn!("Move for unknown session");
            return false;
        };
        let mut session = lock(&entry);
        match session.apply(mv, side) {
            Ok(()) => {
                info!(
                    status = %session.status(),
                    turn = %session.turn(),
                    ply = session.history().len(),
                    "Applied move"
                );
                if !session.is_ongoing() {
                    info!(
                        status = %session.status(),
                        winner = ?session.winner(),
                        draw_reason = ?session.draw_reason(),
                        "Game over"
                    );
                }
                true
            }
            Err(reason) => {
                warn!(%reason, "Rejected move");
                false
            }
        }
    }
}

/// Session state stays consistent even if a holder panicked: every mutation
/// is validated before anything is written.
fn lock(entry: &Mutex<Session>) -> MutexGuard<'_, Session> {
    entry.lock().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    #[instrument(skip(self), fields(rating = strength.rating()))]
    async fn create(&self, human_side: Side, strength: Strength) -> Session {
        let session = Session::new(human_side, strength);
        let snapshot = session.clone();
        self.sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(session.id().to_string(), Arc::new(Mutex::new(session)));
        info!(session_id = %snapshot.id(), %human_side, "Created session");
        snapshot
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn get(&self, id: &str) -> Option<Session> {
        let session = self.entry(id).map(|entry| lock(&entry).clone());
        if session.is_none() {
            debug!("Session not found");
        }
        session
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn apply_move(&self, id: &str, mv: &str) -> bool {
        self.apply(id, None, mv)
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn apply_move_as(&self, id: &str, side: Side, mv: &str) -> bool {
        self.apply(id, Some(side), mv)
    }

    async fn legal_moves(&self, id: &str) -> Vec<String> {
        self.entry(id)
            .map(|entry| lock(&entry).legal_moves())
            .unwrap_or_default()
    }

    #[instrument(skip(self), fields(session_id = %id))]
    async fn delete(&self, id: &str) -> bool {
        let removed = self
            .sessions
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(id)
            .is_some();
        if removed {
            info!("Deleted session");
        }
        removed
    }

    async fn list(&self) -> Vec<Session> {
        let entries: Vec<_> = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .values()
            .cloned()
            .collect();
        entries.iter().map(|entry| lock(entry).clone()).collect()
    }

    async fn count(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod store_tests;
