//! Classification results and their provenance

use serde::{Deserialize, Serialize};

/// One entry of a ranked classification response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Internal archetype id (or an unmapped remote label)
    pub archetype_id: String,
    /// Probability in [0, 1]
    pub probability: f64,
    /// 0-based position in the response
    pub rank: usize,
}

/// Which classifier served a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationSource {
    /// Remote inference service
    Remote,
    /// Local range classifier (fallback or offline)
    Local,
}

impl std::fmt::Display for ClassificationSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClassificationSource::Remote => write!(f, "remote"),
            ClassificationSource::Local => write!(f, "local"),
        }
    }
}

/// A full classification response from exactly one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Ordered by non-increasing probability (local) or service order (remote)
    pub results: Vec<ClassificationResult>,
    pub source: ClassificationSource,
    /// Auxiliary confidence scalar reported by the remote service
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl Classification {
    pub fn local(results: Vec<ClassificationResult>) -> Self {
        Self {
            results,
            source: ClassificationSource::Local,
            confidence: None,
        }
    }

    pub fn remote(results: Vec<ClassificationResult>, confidence: Option<f64>) -> Self {
        Self {
            results,
            source: ClassificationSource::Remote,
            confidence,
        }
    }

    /// Highest-ranked entry
    pub fn top(&self) -> Option<&ClassificationResult> {
        self.results.first()
    }

    /// First entry for an archetype id; None means "not found", not zero
    pub fn find(&self, archetype_id: &str) -> Option<&ClassificationResult> {
        self.results.iter().find(|r| r.archetype_id == archetype_id)
    }
}
