//! Engine configuration
//!
//! Every field has a default taken from the constants in the crate root, so an
//! empty JSON object (or no file at all) yields the stock behavior.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::{
    DEFAULT_REMOTE_ENDPOINT, DEFAULT_REMOTE_TIMEOUT_MS, DEFAULT_REMOTE_URL, FEEDBACK_CLOSE,
    FEEDBACK_CONFIDENT_TOP, FEEDBACK_FAIR, FEEDBACK_GOOD, SCORE_SHARPNESS, WIN_TOP_ONE_MIN_PROBABILITY,
    WIN_TOP_RANK_LIMIT, WIN_TOP_TWO_MIN_PROBABILITY,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub remote: RemoteConfig,
    pub classifier: ClassifierConfig,
    pub win: WinThresholds,
    pub feedback: FeedbackThresholds,
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: display,
            source,
        })
    }
}

/// Remote inference service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// When false every attempt is served by the local classifier
    pub enabled: bool,
    pub base_url: String,
    pub endpoint: String,
    pub timeout_ms: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_REMOTE_URL.to_string(),
            endpoint: DEFAULT_REMOTE_ENDPOINT.to_string(),
            timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
        }
    }
}

impl RemoteConfig {
    pub fn url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Local range classifier settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Exponent on composite scores before normalization; 1 disables sharpening
    pub sharpness: i32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sharpness: SCORE_SHARPNESS,
        }
    }
}

/// Win predicate thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WinThresholds {
    pub top_two_min_probability: f64,
    pub top_one_min_probability: f64,
    pub top_rank_limit: usize,
}

impl Default for WinThresholds {
    fn default() -> Self {
        Self {
            top_two_min_probability: WIN_TOP_TWO_MIN_PROBABILITY,
            top_one_min_probability: WIN_TOP_ONE_MIN_PROBABILITY,
            top_rank_limit: WIN_TOP_RANK_LIMIT,
        }
    }
}

/// Feedback tier boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackThresholds {
    pub close: f64,
    pub good: f64,
    pub fair: f64,
    pub confident_top: f64,
}

impl Default for FeedbackThresholds {
    fn default() -> Self {
        Self {
            close: FEEDBACK_CLOSE,
            good: FEEDBACK_GOOD,
            fair: FEEDBACK_FAIR,
            confident_top: FEEDBACK_CONFIDENT_TOP,
        }
    }
}
