//! Integration tests for the Encore HTTP API
//!
//! Drives the full router through tower's `oneshot`, covering:
//! - Health check
//! - Session management (create, list, get, end)
//! - Request queue (submit, list, remove, reorder)
//! - Playback advance and its error reporting

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use encore_server::api::{create_router, AppState};
use encore_server::lifecycle::SessionManager;
use encore_server::store::SessionStore;

/// Test helper to create a router over a fresh isolated store
fn setup_test_server() -> axum::Router {
    let store = Arc::new(SessionStore::new());
    let manager = Arc::new(SessionManager::new(store));
    create_router(AppState {
        manager,
        port: 5780,
    })
}

/// Helper to make HTTP requests against the test router
async fn make_request(
    app: &axum::Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Option<Value>) {
    let mut request = Request::builder().method(method).uri(path);
    if body.is_some() {
        request = request.header("content-type", "application/json");
    }
    let request = match body {
        Some(json_body) => request.body(Body::from(json_body.to_string())).unwrap(),
        None => request.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json_body = if bytes.is_empty() {
        None
    } else {
        serde_json::from_slice(&bytes).ok()
    };

    (status, json_body)
}

async fn create_session(app: &axum::Router) -> String {
    let (status, body) = make_request(app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body.unwrap()["sessionId"].as_str().unwrap().to_string()
}

async fn submit_request(app: &axum::Router, session_id: &str, body: Value) -> (StatusCode, Value) {
    let path = format!("/api/sessions/{}/requests", session_id);
    let (status, response) = make_request(app, Method::POST, &path, Some(body)).await;
    (status, response.unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = setup_test_server();

    let (status, body) = make_request(&app, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    let body = body.expect("Expected response body");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["module"], "encore-server");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_and_get_session() {
    let app = setup_test_server();

    let (status, body) = make_request(&app, Method::POST, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let body = body.unwrap();
    assert_eq!(body["status"], "ACTIVE");
    assert!(body["createdAt"].is_string());
    assert_eq!(body["requests"], json!([]));

    let session_id = body["sessionId"].as_str().unwrap();
    let (status, fetched) =
        make_request(&app, Method::GET, &format!("/api/sessions/{}", session_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.unwrap()["sessionId"], body["sessionId"]);
}

#[tokio::test]
async fn test_get_unknown_session_returns_404() {
    let app = setup_test_server();

    let (status, body) =
        make_request(&app, Method::GET, "/api/sessions/no-such-session", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.unwrap()["error"].is_string());
}

#[tokio::test]
async fn test_list_sessions_returns_summaries() {
    let app = setup_test_server();

    let session_id = create_session(&app).await;
    submit_request(&app, &session_id, json!({"userName": "A", "albumName": "Kid A"})).await;

    let (status, body) = make_request(&app, Method::GET, "/api/sessions", None).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = body.unwrap();
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["sessionId"], session_id);
    assert_eq!(sessions[0]["requestCount"], 1);
    // Summary rows carry no request bodies
    assert!(sessions[0].get("requests").is_none());
}

#[tokio::test]
async fn test_submit_request_validation() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    // Missing albumName
    let (status, body) =
        submit_request(&app, &session_id, json!({"userName": "Alice"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // Whitespace-only userName
    let (status, _) = submit_request(
        &app,
        &session_id,
        json!({"userName": "  ", "albumName": "Kid A"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Unknown session
    let (status, _) = make_request(
        &app,
        Method::POST,
        "/api/sessions/missing/requests",
        Some(json!({"userName": "A", "albumName": "Kid A"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_full_queue_scenario() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    // Submit two requests
    let (status, r1) = submit_request(
        &app,
        &session_id,
        json!({"userName": "A", "albumName": "OK Computer"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(r1["status"], "pending");
    assert_eq!(r1["trackName"], "");

    let (status, r2) = submit_request(
        &app,
        &session_id,
        json!({"userName": "B", "albumName": "Kid A", "trackName": "Idioteque"}),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(r2["trackName"], "Idioteque");

    // First advance: R1 playing
    let advance_path = format!("/api/sessions/{}/advance", session_id);
    let (status, playing) = make_request(&app, Method::POST, &advance_path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playing.unwrap()["id"], r1["id"]);

    let list_path = format!("/api/sessions/{}/requests", session_id);
    let (_, queue) = make_request(&app, Method::GET, &list_path, None).await;
    let queue = queue.unwrap();
    assert_eq!(queue[0]["status"], "playing");
    assert_eq!(queue[1]["status"], "pending");

    // Second advance: R1 played, R2 playing
    let (status, playing) = make_request(&app, Method::POST, &advance_path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(playing.unwrap()["id"], r2["id"]);

    let (_, queue) = make_request(&app, Method::GET, &list_path, None).await;
    let queue = queue.unwrap();
    assert_eq!(queue[0]["status"], "played");
    assert_eq!(queue[1]["status"], "playing");

    // Remove R1
    let remove_path = format!("/api/sessions/{}/requests/{}", session_id, r1["id"]);
    let (status, removed) = make_request(&app, Method::DELETE, &remove_path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed.unwrap()["status"], "removed");

    let (_, queue) = make_request(&app, Method::GET, &list_path, None).await;
    let queue = queue.unwrap();
    assert_eq!(queue.as_array().unwrap().len(), 1);
    assert_eq!(queue[0]["id"], r2["id"]);
    assert_eq!(queue[0]["status"], "playing");

    // End the session
    let session_path = format!("/api/sessions/{}", session_id);
    let (status, ended) = make_request(&app, Method::DELETE, &session_path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended.unwrap()["status"], "ENDED");
}

#[tokio::test]
async fn test_advance_with_empty_queue_conflicts() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    let advance_path = format!("/api/sessions/{}/advance", session_id);
    let (status, body) = make_request(&app, Method::POST, &advance_path, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body.unwrap()["error"].is_string());
}

#[tokio::test]
async fn test_remove_unknown_request_returns_404() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    let path = format!("/api/sessions/{}/requests/12345", session_id);
    let (status, _) = make_request(&app, Method::DELETE, &path, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reorder_endpoint() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    let (_, r1) =
        submit_request(&app, &session_id, json!({"userName": "A", "albumName": "Kid A"})).await;
    let (_, r2) = submit_request(
        &app,
        &session_id,
        json!({"userName": "B", "albumName": "Amnesiac"}),
    )
    .await;

    let reorder_path = format!("/api/sessions/{}/requests/reorder", session_id);
    let (status, reordered) = make_request(
        &app,
        Method::PUT,
        &reorder_path,
        Some(json!({"requestIds": [r2["id"], r1["id"]]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reordered = reordered.unwrap();
    assert_eq!(reordered[0]["id"], r2["id"]);
    assert_eq!(reordered[1]["id"], r1["id"]);

    // Not a permutation of the current ids
    let (status, _) = make_request(
        &app,
        Method::PUT,
        &reorder_path,
        Some(json!({"requestIds": [r1["id"]]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_ended_session_rejects_mutations_over_http() {
    let app = setup_test_server();
    let session_id = create_session(&app).await;

    let session_path = format!("/api/sessions/{}", session_id);
    let (status, _) = make_request(&app, Method::DELETE, &session_path, None).await;
    assert_eq!(status, StatusCode::OK);

    // Ending again is still a success (idempotent)
    let (status, ended) = make_request(&app, Method::DELETE, &session_path, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended.unwrap()["status"], "ENDED");

    // New submissions are refused
    let (status, body) = submit_request(
        &app,
        &session_id,
        json!({"userName": "A", "albumName": "Kid A"}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    // Reads still work
    let (status, _) = make_request(&app, Method::GET, &session_path, None).await;
    assert_eq!(status, StatusCode::OK);
}
