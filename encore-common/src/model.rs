//! Session and song-request domain model
//!
//! **Responsibilities:**
//! - Wire-shape types for sessions and requests (camelCase JSON)
//! - Request-queue operations scoped to one session
//!   (append, remove, reorder, advance)
//! - Request id generation (time-based, strictly increasing per session)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Playback status of one song request.
///
/// Transitions forward only: pending -> playing -> played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Playing,
    Played,
}

/// Lifecycle status of a session. ENDED is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SessionStatus {
    Active,
    Ended,
}

/// One patron-submitted album/track request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    pub id: u64,
    pub user_name: String,
    pub album_name: String,
    /// Optional on submission; stored as the empty string when absent.
    #[serde(default)]
    pub track_name: String,
    pub status: RequestStatus,
}

/// One venue session and its ordered request queue.
///
/// The session exclusively owns its requests; queue order is submission
/// order unless an explicit reorder replaced it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub requests: Vec<SongRequest>,

    /// Highest request id handed out so far. Ids are derived from the
    /// submission timestamp, so this only matters when two submissions
    /// land in the same millisecond.
    #[serde(skip)]
    last_request_id: u64,
}

/// Summary row returned by the session-list endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub request_count: usize,
}

impl Session {
    /// Create a new ACTIVE session with a fresh opaque id and empty queue.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            status: SessionStatus::Active,
            requests: Vec::new(),
            last_request_id: 0,
        }
    }

    /// Summary fields for the session-list view.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.session_id.clone(),
            created_at: self.created_at,
            status: self.status,
            request_count: self.requests.len(),
        }
    }

    pub fn is_ended(&self) -> bool {
        self.status == SessionStatus::Ended
    }

    /// Mark the session ENDED. Terminal; calling again is a no-op.
    pub fn end(&mut self) {
        self.status = SessionStatus::Ended;
    }

    /// Append a new pending request to the end of the queue.
    ///
    /// Rejects empty or whitespace-only `user_name`/`album_name` with
    /// `InvalidInput`. `track_name` defaults to the empty string.
    pub fn append_request(
        &mut self,
        user_name: &str,
        album_name: &str,
        track_name: Option<&str>,
    ) -> Result<SongRequest> {
        let user_name = user_name.trim();
        let album_name = album_name.trim();
        if user_name.is_empty() {
            return Err(Error::InvalidInput("userName must not be empty".to_string()));
        }
        if album_name.is_empty() {
            return Err(Error::InvalidInput("albumName must not be empty".to_string()));
        }

        let request = SongRequest {
            id: self.next_request_id(),
            user_name: user_name.to_string(),
            album_name: album_name.to_string(),
            track_name: track_name.unwrap_or("").trim().to_string(),
            status: RequestStatus::Pending,
        };
        self.requests.push(request.clone());
        Ok(request)
    }

    /// Remove a request by id. Fails with `RequestNotFound` if absent.
    pub fn remove_request(&mut self, request_id: u64) -> Result<()> {
        let before = self.requests.len();
        self.requests.retain(|r| r.id != request_id);
        if self.requests.len() == before {
            return Err(Error::RequestNotFound(request_id));
        }
        Ok(())
    }

    /// Replace the queue order to match `new_order`.
    ///
    /// `new_order` must be exactly a permutation of the current request
    /// ids; anything else (wrong length, unknown id, duplicate id) is
    /// rejected with `InvalidInput` and the queue is left untouched.
    pub fn reorder_requests(&mut self, new_order: &[u64]) -> Result<&[SongRequest]> {
        if new_order.len() != self.requests.len() {
            return Err(Error::InvalidInput(format!(
                "reorder expects {} request ids, got {}",
                self.requests.len(),
                new_order.len()
            )));
        }

        let mut remaining = self.requests.clone();
        let mut reordered = Vec::with_capacity(remaining.len());
        for &id in new_order {
            match remaining.iter().position(|r| r.id == id) {
                Some(index) => reordered.push(remaining.remove(index)),
                None => {
                    return Err(Error::InvalidInput(format!(
                        "unknown or duplicate request id in reorder: {}",
                        id
                    )))
                }
            }
        }

        self.requests = reordered;
        Ok(&self.requests)
    }

    /// Advance playback: retire the currently playing request (if any),
    /// then promote the first pending request in queue order.
    ///
    /// Returns the newly playing request. With nothing pending, fails with
    /// `NoPendingRequests` - the playing->played transition has already
    /// been applied at that point and stays applied.
    pub fn advance_playback(&mut self) -> Result<SongRequest> {
        if let Some(playing) = self
            .requests
            .iter_mut()
            .find(|r| r.status == RequestStatus::Playing)
        {
            playing.status = RequestStatus::Played;
        }

        match self
            .requests
            .iter_mut()
            .find(|r| r.status == RequestStatus::Pending)
        {
            Some(next) => {
                next.status = RequestStatus::Playing;
                Ok(next.clone())
            }
            None => Err(Error::NoPendingRequests),
        }
    }

    /// Next request id: milliseconds since the Unix epoch, bumped past the
    /// previous id when two submissions share a millisecond.
    fn next_request_id(&mut self) -> u64 {
        let now_ms = Utc::now().timestamp_millis().max(0) as u64;
        let id = now_ms.max(self.last_request_id + 1);
        self.last_request_id = id;
        id
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
