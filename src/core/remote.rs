//! Remote classification adapter
//!
//! POSTs the converted KOI fields to the inference service, parses
//! `{ type_top3: [[label, p], ...], is_exoplanet_proba? }` and maps the
//! service's label vocabulary onto internal archetype ids. Every failure is
//! reported once; the adapter never retries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RemoteConfig;
use crate::core::RemoteFeatures;
use crate::error::ClassifyError;
use crate::types::{Classification, ClassificationResult};

/// Raw response shape of the inference service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteResponse {
    pub type_top3: Vec<(String, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exoplanet_proba: Option<f64>,
}

/// A remote classifier reachable over request/response
#[async_trait]
pub trait RemoteClassifier: Send + Sync {
    async fn classify(&self, features: &RemoteFeatures) -> Result<RemoteResponse, ClassifyError>;
}

/// Map a service label onto an internal archetype id.
/// Unknown labels pass through unchanged.
pub fn map_label(label: &str) -> &str {
    match label {
        "subterrestre" => "Sub Earth",
        "subterrestre_caliente" => "Desert World",
        "terraneo" => "Earth-like",
        "terraneo_caliente" => "Desert World",
        "super_tierra" => "Super Earth",
        "super_tierra_caliente" => "Desert World",
        "mini_neptuno" => "Ice Giant",
        "mini_neptuno_caliente" => "Hot Jupiter",
        "neptuniano" => "Ice Giant",
        "neptuniano_caliente" => "Hot Jupiter",
        "joviano" => "Gas Giant",
        "joviano_caliente" => "Hot Jupiter",
        other => other,
    }
}

/// Convert a service response into a classification, keeping order and count
pub fn map_response(response: &RemoteResponse) -> Classification {
    let results = response
        .type_top3
        .iter()
        .enumerate()
        .map(|(rank, (label, probability))| ClassificationResult {
            archetype_id: map_label(label).to_string(),
            probability: *probability,
            rank,
        })
        .collect();
    Classification::remote(results, response.is_exoplanet_proba)
}

/// Parse a response body; anything not matching the expected shape is a bad response
pub fn parse_response(body: &str) -> Result<RemoteResponse, ClassifyError> {
    let response: RemoteResponse =
        serde_json::from_str(body).map_err(|e| ClassifyError::BadResponse(e.to_string()))?;
    if let Some((label, p)) = response
        .type_top3
        .iter()
        .find(|(_, p)| !(0.0..=1.0).contains(p))
    {
        return Err(ClassifyError::BadResponse(format!(
            "probability {} for '{}' outside [0, 1]",
            p, label
        )));
    }
    if let Some(confidence) = response.is_exoplanet_proba.filter(|c| !(0.0..=1.0).contains(c)) {
        return Err(ClassifyError::BadResponse(format!(
            "is_exoplanet_proba {} outside [0, 1]",
            confidence
        )));
    }
    Ok(response)
}

/// reqwest-backed remote classifier
#[derive(Debug, Clone)]
pub struct HttpRemoteClassifier {
    client: reqwest::Client,
    url: String,
}

impl HttpRemoteClassifier {
    pub fn new(config: &RemoteConfig) -> Result<Self, ClassifyError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("exoquest/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClassifyError::Transport(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            url: config.url(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl RemoteClassifier for HttpRemoteClassifier {
    async fn classify(&self, features: &RemoteFeatures) -> Result<RemoteResponse, ClassifyError> {
        debug!(url = %self.url, ?features, "requesting remote classification");
        let response = self
            .client
            .post(&self.url)
            .json(features)
            .send()
            .await
            .map_err(|e| ClassifyError::Transport(format!("request to '{}' failed: {}", self.url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClassifyError::BadResponse(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ClassifyError::Transport(format!("failed to read response body: {}", e)))?;
        parse_response(&body)
    }
}

// =============================================================================
// TESTS
// =============================================================================
