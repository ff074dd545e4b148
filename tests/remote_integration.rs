//! Integration tests for the HTTP remote classifier
//!
//! A local axum server on an ephemeral port stands in for the inference service.

use axum::{http::StatusCode, routing::post, Json, Router};
use exoquest::config::RemoteConfig;
use exoquest::core::{
    ArchetypeCatalog, FallbackOrchestrator, HttpRemoteClassifier, RemoteClassifier, UnitConverter,
};
use exoquest::error::ClassifyError;
use exoquest::types::{ClassificationSource, ParameterVector};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

async fn spawn_service(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(base_url: &str, timeout_ms: u64) -> RemoteConfig {
    RemoteConfig {
        enabled: true,
        base_url: base_url.to_string(),
        endpoint: "/predict".to_string(),
        timeout_ms,
    }
}

fn features() -> exoquest::core::RemoteFeatures {
    UnitConverter::new().convert(&ParameterVector::default())
}

/// Echoes a hot-Jupiter verdict, but only when every KOI field is present
async fn predict(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    for key in ["koi_prad", "koi_teq", "koi_period", "koi_model_snr", "koi_steff", "koi_srad"] {
        if !body[key].is_number() {
            return Err(StatusCode::UNPROCESSABLE_ENTITY);
        }
    }
    Ok(Json(json!({
        "type_top3": [["joviano_caliente", 0.71], ["joviano", 0.2], ["neptuniano", 0.09]],
        "is_exoplanet_proba": 0.93
    })))
}

#[tokio::test]
async fn test_successful_prediction() {
    let base = spawn_service(Router::new().route("/predict", post(predict))).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();

    let response = remote.classify(&features()).await.unwrap();

    assert_eq!(response.type_top3.len(), 3);
    assert_eq!(response.type_top3[0].0, "joviano_caliente");
    assert_eq!(response.is_exoplanet_proba, Some(0.93));
}

#[tokio::test]
async fn test_server_error_is_bad_response() {
    let router = Router::new().route("/predict", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
    let base = spawn_service(router).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();

    let err = remote.classify(&features()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::BadResponse(ref m) if m.contains("500")), "{:?}", err);
}

#[tokio::test]
async fn test_missing_type_top3_is_bad_response() {
    let router = Router::new().route("/predict", post(|| async { Json(json!({"is_exoplanet_proba": 0.5})) }));
    let base = spawn_service(router).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();

    let err = remote.classify(&features()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::BadResponse(_)));
}

#[tokio::test]
async fn test_slow_service_times_out_as_transport_error() {
    let router = Router::new().route(
        "/predict",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(1000)).await;
            Json(json!({"type_top3": [["terraneo", 1.0]]}))
        }),
    );
    let base = spawn_service(router).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 100)).unwrap();

    let err = remote.classify(&features()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::Transport(_)), "{:?}", err);
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let remote = HttpRemoteClassifier::new(&config(&format!("http://{}", addr), 1000)).unwrap();
    let err = remote.classify(&features()).await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

#[tokio::test]
async fn test_orchestrator_over_http() {
    let base = spawn_service(Router::new().route("/predict", post(predict))).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();
    let orchestrator = FallbackOrchestrator::new(Arc::new(remote), ArchetypeCatalog::builtin());

    let c = orchestrator.classify(&ParameterVector::default()).await;

    assert_eq!(c.source, ClassificationSource::Remote);
    let ids: Vec<&str> = c.results.iter().map(|r| r.archetype_id.as_str()).collect();
    assert_eq!(ids, vec!["Hot Jupiter", "Gas Giant", "Ice Giant"]);
}

#[tokio::test]
async fn test_orchestrator_falls_back_when_service_fails() {
    let router = Router::new().route("/predict", post(|| async { StatusCode::SERVICE_UNAVAILABLE }));
    let base = spawn_service(router).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();
    let orchestrator = FallbackOrchestrator::new(Arc::new(remote), ArchetypeCatalog::builtin());

    let c = orchestrator.classify(&ParameterVector::default()).await;

    assert_eq!(c.source, ClassificationSource::Local);
    assert_eq!(c.results.len(), 8);
}

#[tokio::test]
async fn test_out_of_range_confidence_falls_back_to_local() {
    let router = Router::new().route(
        "/predict",
        post(|| async { Json(json!({"type_top3": [["joviano", 0.8]], "is_exoplanet_proba": 1.7})) }),
    );
    let base = spawn_service(router).await;
    let remote = HttpRemoteClassifier::new(&config(&base, 2000)).unwrap();

    let err = remote.classify(&features()).await.unwrap_err();
    assert!(matches!(err, ClassifyError::BadResponse(_)), "{:?}", err);

    let orchestrator = FallbackOrchestrator::new(Arc::new(remote), ArchetypeCatalog::builtin());
    let c = orchestrator.classify(&ParameterVector::default()).await;
    assert_eq!(c.source, ClassificationSource::Local);
}
