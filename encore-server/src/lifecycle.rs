//! Session lifecycle manager
//!
//! **Responsibilities:**
//! - Enforce the session state machine (ACTIVE -> ENDED, terminal)
//! - Enforce the request state machine (pending -> playing -> played)
//! - Reject mutations against ENDED sessions
//!
//! This is the only mutation entry point the HTTP layer uses; queue work
//! itself is delegated to the model layer under the store's write lock.

use std::sync::Arc;

use encore_common::model::{Session, SessionSummary, SongRequest};
use encore_common::{Error, Result};
use tracing::info;

use crate::store::SessionStore;

/// Fields accepted for a new song request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub user_name: String,
    pub album_name: String,
    pub track_name: Option<String>,
}

/// Mutation entry point over an injected [`SessionStore`].
pub struct SessionManager {
    store: Arc<SessionStore>,
}

impl SessionManager {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    /// Create a new ACTIVE session.
    pub async fn create_session(&self) -> Session {
        let session = self.store.create().await;
        info!("Created session {}", session.session_id);
        session
    }

    /// Full session snapshot, requests included.
    pub async fn get_session(&self, session_id: &str) -> Result<Session> {
        self.store.get(session_id).await
    }

    /// Summaries of all known sessions.
    pub async fn list_sessions(&self) -> Vec<SessionSummary> {
        self.store.list().await
    }

    /// End a session. Terminal and idempotent.
    pub async fn end_session(&self, session_id: &str) -> Result<Session> {
        let session = self.store.end(session_id).await?;
        info!("Ended session {}", session_id);
        Ok(session)
    }

    /// Append a patron request to an ACTIVE session's queue.
    pub async fn submit_request(
        &self,
        session_id: &str,
        new_request: NewRequest,
    ) -> Result<SongRequest> {
        let request = self
            .store
            .with_session_mut(session_id, |session| {
                Self::ensure_active(session)?;
                session.append_request(
                    &new_request.user_name,
                    &new_request.album_name,
                    new_request.track_name.as_deref(),
                )
            })
            .await?;
        info!(
            "Session {}: queued request {} ({} - {})",
            session_id, request.id, request.user_name, request.album_name
        );
        Ok(request)
    }

    /// Current request queue in display order.
    pub async fn list_requests(&self, session_id: &str) -> Result<Vec<SongRequest>> {
        Ok(self.store.get(session_id).await?.requests)
    }

    /// Delete one request from an ACTIVE session's queue.
    pub async fn remove_request(&self, session_id: &str, request_id: u64) -> Result<()> {
        self.store
            .with_session_mut(session_id, |session| {
                Self::ensure_active(session)?;
                session.remove_request(request_id)
            })
            .await?;
        info!("Session {}: removed request {}", session_id, request_id);
        Ok(())
    }

    /// Replace the queue order with a permutation of the current ids.
    pub async fn reorder_requests(
        &self,
        session_id: &str,
        new_order: &[u64],
    ) -> Result<Vec<SongRequest>> {
        let requests = self
            .store
            .with_session_mut(session_id, |session| {
                Self::ensure_active(session)?;
                session.reorder_requests(new_order).map(|r| r.to_vec())
            })
            .await?;
        info!(
            "Session {}: queue reordered ({} requests)",
            session_id,
            requests.len()
        );
        Ok(requests)
    }

    /// Retire the playing request and promote the first pending one.
    pub async fn advance_playback(&self, session_id: &str) -> Result<SongRequest> {
        let request = self
            .store
            .with_session_mut(session_id, |session| {
                Self::ensure_active(session)?;
                session.advance_playback()
            })
            .await?;
        info!(
            "Session {}: now playing request {} ({})",
            session_id, request.id, request.album_name
        );
        Ok(request)
    }

    fn ensure_active(session: &Session) -> Result<()> {
        if session.is_ended() {
            return Err(Error::SessionEnded(session.session_id.clone()));
        }
        Ok(())
    }
}
