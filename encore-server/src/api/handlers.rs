//! HTTP request handlers
//!
//! Implements the JSON endpoints for session and request-queue management.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use encore_common::model::{Session, SessionSummary, SongRequest};
use encore_common::Error;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::AppState;
use crate::lifecycle::NewRequest;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequestBody {
    user_name: Option<String>,
    album_name: Option<String>,
    track_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    request_ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    status: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a domain error onto an HTTP status and `{"error": ...}` body.
fn error_response(err: Error) -> ApiError {
    let status = match &err {
        Error::SessionNotFound(_) | Error::RequestNotFound(_) => StatusCode::NOT_FOUND,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::SessionEnded(_) | Error::NoPendingRequests => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}

// ============================================================================
// Session Endpoints
// ============================================================================

/// POST /api/sessions - Create a new session
pub async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<Session>) {
    let session = state.manager.create_session().await;
    (StatusCode::CREATED, Json(session))
}

/// GET /api/sessions - List all known sessions (summary fields)
pub async fn list_sessions(State(state): State<AppState>) -> Json<Vec<SessionSummary>> {
    Json(state.manager.list_sessions().await)
}

/// GET /api/sessions/:session_id - Full session including requests
///
/// Polled by the now-playing display and the admin page.
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .manager
        .get_session(&session_id)
        .await
        .map_err(error_response)?;
    Ok(Json(session))
}

/// DELETE /api/sessions/:session_id - End a session (idempotent)
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Session>, ApiError> {
    let session = state
        .manager
        .end_session(&session_id)
        .await
        .map_err(error_response)?;
    Ok(Json(session))
}

// ============================================================================
// Request Queue Endpoints
// ============================================================================

/// POST /api/sessions/:session_id/requests - Submit a patron request
pub async fn submit_request(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<SubmitRequestBody>,
) -> Result<(StatusCode, Json<SongRequest>), ApiError> {
    // Missing fields fall through to model validation as empty strings
    let new_request = NewRequest {
        user_name: body.user_name.unwrap_or_default(),
        album_name: body.album_name.unwrap_or_default(),
        track_name: body.track_name,
    };

    let request = state
        .manager
        .submit_request(&session_id, new_request)
        .await
        .map_err(|e| {
            warn!("Rejected request submission for session {}: {}", session_id, e);
            error_response(e)
        })?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /api/sessions/:session_id/requests - Request queue in display order
pub async fn list_requests(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<SongRequest>>, ApiError> {
    let requests = state
        .manager
        .list_requests(&session_id)
        .await
        .map_err(error_response)?;
    Ok(Json(requests))
}

/// DELETE /api/sessions/:session_id/requests/:request_id - Remove a request
pub async fn remove_request(
    State(state): State<AppState>,
    Path((session_id, request_id)): Path<(String, u64)>,
) -> Result<Json<StatusResponse>, ApiError> {
    state
        .manager
        .remove_request(&session_id, request_id)
        .await
        .map_err(error_response)?;
    Ok(Json(StatusResponse {
        status: "removed".to_string(),
    }))
}

/// PUT /api/sessions/:session_id/requests/reorder - Replace the queue order
///
/// The body must list every current request id exactly once.
pub async fn reorder_requests(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<ReorderBody>,
) -> Result<Json<Vec<SongRequest>>, ApiError> {
    let requests = state
        .manager
        .reorder_requests(&session_id, &body.request_ids)
        .await
        .map_err(|e| {
            warn!("Rejected reorder for session {}: {}", session_id, e);
            error_response(e)
        })?;
    Ok(Json(requests))
}

// ============================================================================
// Playback Endpoint
// ============================================================================

/// POST /api/sessions/:session_id/advance - Advance playback
///
/// Retires the playing request and promotes the first pending one;
/// returns the now-playing request.
pub async fn advance_playback(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<SongRequest>, ApiError> {
    let request = state
        .manager
        .advance_playback(&session_id)
        .await
        .map_err(error_response)?;
    Ok(Json(request))
}
