//! In-memory session store
//!
//! Single source of truth mapping session id -> Session. Explicitly
//! constructed and injected into the lifecycle manager, so tests can run
//! against isolated store instances.
//!
//! Every mutation takes the write lock and runs to completion while
//! holding it, so each operation is atomic with respect to the store and
//! the queue invariants hold under concurrent callers.

use std::collections::HashMap;

use encore_common::model::{Session, SessionSummary};
use encore_common::{Error, Result};
use tokio::sync::RwLock;

/// All known sessions for the lifetime of the process.
///
/// No persistence: restarting the process loses every session.
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Create a new ACTIVE session and return a snapshot of it.
    pub async fn create(&self) -> Session {
        let session = Session::new();
        let snapshot = session.clone();
        self.sessions
            .write()
            .await
            .insert(session.session_id.clone(), session);
        snapshot
    }

    /// Snapshot of one session, full request queue included.
    pub async fn get(&self, session_id: &str) -> Result<Session> {
        self.sessions
            .read()
            .await
            .get(session_id)
            .cloned()
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))
    }

    /// Summaries of all known sessions, order unspecified.
    pub async fn list(&self) -> Vec<SessionSummary> {
        self.sessions.read().await.values().map(Session::summary).collect()
    }

    /// Mark a session ENDED in place and return the updated snapshot.
    ///
    /// Idempotent: ending an already-ended session is a no-op success.
    pub async fn end(&self, session_id: &str) -> Result<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        session.end();
        Ok(session.clone())
    }

    /// Run a mutation against one session under the write lock.
    ///
    /// State changes the closure applies before returning an error stay
    /// applied (advance relies on this for its retire-then-promote step).
    pub(crate) async fn with_session_mut<T>(
        &self,
        session_id: &str,
        mutate: impl FnOnce(&mut Session) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(session_id)
            .ok_or_else(|| Error::SessionNotFound(session_id.to_string()))?;
        mutate(session)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}
