//! REST API implementation for the Encore service
//!
//! Exposes the session and request-queue operations as JSON endpoints for
//! the admin, patron request, and now-playing display pages.

pub mod handlers;

use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::lifecycle::SessionManager;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Session lifecycle manager (the only mutation entry point)
    pub manager: Arc<SessionManager>,
    /// Server port
    pub port: u16,
}

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(health_check))

        // API routes
        .nest("/api", Router::new()
            // Session management
            .route("/sessions", post(handlers::create_session))
            .route("/sessions", get(handlers::list_sessions))
            .route("/sessions/:session_id", get(handlers::get_session))
            .route("/sessions/:session_id", delete(handlers::end_session))

            // Request queue
            .route("/sessions/:session_id/requests", post(handlers::submit_request))
            .route("/sessions/:session_id/requests", get(handlers::list_requests))
            .route("/sessions/:session_id/requests/reorder", put(handlers::reorder_requests))
            .route("/sessions/:session_id/requests/:request_id", delete(handlers::remove_request))

            // Playback control
            .route("/sessions/:session_id/advance", post(handlers::advance_playback))
        )
        .with_state(state)

        // Request logging for the polling display and admin pages
        .layer(TraceLayer::new_for_http())

        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "encore-server",
        "version": env!("CARGO_PKG_VERSION"),
        "port": state.port
    }))
}
