//! Integration tests for the HTTP API
//!
//! Tests API endpoints against an offline engine with shared state

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use exoquest::config::EngineConfig;
use exoquest::core::{create_router, AppState, ArchetypeCatalog, FallbackOrchestrator};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn offline_state() -> Arc<AppState> {
    let mut config = EngineConfig::default();
    config.remote.enabled = false;
    AppState::new(FallbackOrchestrator::offline(ArchetypeCatalog::builtin()), config)
}

fn create_test_router() -> Router {
    create_router(offline_state())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn new_session(app: &Router, seed: u64) -> (String, String) {
    let (status, json) = send(app, "POST", "/session/new", Some(json!({ "seed": seed }))).await;
    assert_eq!(status, StatusCode::OK);
    (
        json["session_id"].as_str().unwrap().to_string(),
        json["target_id"].as_str().unwrap().to_string(),
    )
}

/// Guess body placing every scored dimension at the centre of the archetype's ranges
fn centre_guess(id: &str) -> Value {
    let catalog = ArchetypeCatalog::builtin();
    let archetype = catalog.lookup(id).unwrap();
    let mut body = Map::new();
    for (dim, range) in &archetype.ranges {
        body.insert(dim.name().to_string(), json!(range.center()));
    }
    Value::Object(body)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["remote_enabled"], false);
}

#[tokio::test]
async fn test_archetypes_in_declared_order() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/archetypes", None).await;

    assert_eq!(status, StatusCode::OK);
    let list = json.as_array().unwrap();
    assert_eq!(list.len(), 8);
    assert_eq!(list[0]["id"], "Earth-like");
    assert_eq!(list[7]["id"], "Desert World");
}

#[tokio::test]
async fn test_visual_config_lookup() {
    let app = create_test_router();

    let (status, json) = send(&app, "GET", "/archetypes/Gas%20Giant/visual", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["rings"].is_object());

    let (status, _) = send(&app, "GET", "/archetypes/Pulsar/visual", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_session() {
    let app = create_test_router();
    let (status, json) = send(&app, "POST", "/session/new", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["session_id"].is_string());
    assert!(json["websocket_url"].as_str().unwrap().starts_with("/ws/"));
    assert!(json["target_description_key"].as_str().unwrap().starts_with("planet."));
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();

    let (status, json) = send(&app, "GET", "/session/nonexistent", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());

    let (status, _) = send(&app, "POST", "/session/nonexistent/classify", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_session() {
    let state = offline_state();
    let app = create_router(state.clone());
    let (id, _) = new_session(&app, 11).await;
    let (other, _) = new_session(&app, 12).await;
    assert_eq!(state.sessions.read().await.len(), 2);

    let (status, json) = send(&app, "DELETE", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(json, Value::Null);

    let (status, _) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, json) = send(&app, "DELETE", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].is_string());

    let (status, _) = send(&app, "GET", &format!("/session/{}", other), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.sessions.read().await.len(), 1);
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_test_router();
    let (id, target) = new_session(&app, 17).await;

    let (status, json) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "IDLE");
    assert_eq!(json["attempts"], 0);

    let (status, json) = send(&app, "PUT", &format!("/session/{}/guess", id), Some(centre_guess(&target))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attempts"], 0);

    let (status, json) = send(&app, "POST", &format!("/session/{}/classify", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["attempt"], 1);
    assert_eq!(json["source"], "local");
    assert_eq!(json["results"][0]["archetype_id"], target.as_str());
    assert_eq!(json["won"], true);
    assert_eq!(json["newly_won"], true);

    let (_, json) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(json["state"], "WON");
    assert_eq!(json["in_flight"], false);
    assert!(json["top_visual"].is_object());

    let (status, json) = send(&app, "POST", &format!("/session/{}/restart", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["state"], "IDLE");
    assert_eq!(json["attempts"], 0);
    assert_eq!(json["generation"], 2);
    assert!(json.get("last_classification").is_none());
}

#[tokio::test]
async fn test_invalid_guess_is_rejected_without_partial_update() {
    let app = create_test_router();
    let (id, _) = new_session(&app, 3).await;

    let body = json!({ "mass": 42.0, "gravity": 9.8 });
    let (status, json) = send(&app, "PUT", &format!("/session/{}/guess", id), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("gravity"));

    let (_, json) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(json["current_guess"]["mass"], 1.0);
}

#[tokio::test]
async fn test_guess_values_are_clamped() {
    let app = create_test_router();
    let (id, _) = new_session(&app, 3).await;

    let body = json!({ "composition": 250.0, "orbitalDistance": 0.0 });
    let (status, json) = send(&app, "PUT", &format!("/session/{}/guess", id), Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["current_guess"]["composition"], 100.0);
    assert_eq!(json["current_guess"]["orbitalDistance"], 0.01);
}

#[tokio::test]
async fn test_classify_conflicts_while_attempt_in_flight() {
    let state = offline_state();
    let app = create_router(state.clone());
    let (id, _) = new_session(&app, 5).await;

    {
        let mut sessions = state.sessions.write().await;
        sessions.get_mut(&id).unwrap().session.begin_attempt().unwrap();
    }

    let (status, json) = send(&app, "POST", &format!("/session/{}/classify", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(json["error"].as_str().unwrap().contains("in flight"));

    let (_, json) = send(&app, "GET", &format!("/session/{}", id), None).await;
    assert_eq!(json["attempts"], 1);
    assert_eq!(json["in_flight"], true);
}

#[tokio::test]
async fn test_seeded_sessions_draw_same_target() {
    let app = create_test_router();
    let (_, a) = new_session(&app, 99).await;
    let (_, b) = new_session(&app, 99).await;
    assert_eq!(a, b);
}
