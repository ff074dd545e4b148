//! Error taxonomy for the classification engine

use thiserror::Error;

/// Failures while producing a classification.
///
/// All three are recovered inside the engine; a session never sees them.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// Network failure or timeout reaching the remote service
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx status or a payload that does not match the expected shape
    #[error("bad response: {0}")]
    BadResponse(String),

    /// Archetype id missing from the catalog
    #[error("unknown archetype: {0}")]
    UnknownArchetype(String),
}

impl ClassifyError {
    /// Short label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::BadResponse(_) => "bad_response",
            Self::UnknownArchetype(_) => "unknown_archetype",
        }
    }
}

/// Session lifecycle violations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("an attempt is already in flight (sequence {0})")]
    AttemptInFlight(u64),

    #[error("attempt {sequence} of generation {generation} was superseded")]
    StaleAttempt { generation: u64, sequence: u64 },

    #[error("unknown parameter dimension: {0}")]
    UnknownDimension(String),

    #[error("invalid value for {dimension}: {value}")]
    InvalidValue { dimension: String, value: f64 },
}

/// Catalog construction failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog must contain at least one archetype")]
    Empty,

    #[error("duplicate archetype id: {0}")]
    DuplicateId(String),

    #[error("invalid range for {archetype}.{dimension}: [{min}, {max}]")]
    InvalidRange {
        archetype: String,
        dimension: String,
        min: f64,
        max: f64,
    },
}

/// Configuration loading failures
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ClassifyError::BadResponse("missing type_top3".into());
        assert_eq!(err.to_string(), "bad response: missing type_top3");
        assert_eq!(err.kind(), "bad_response");

        let err = SessionError::StaleAttempt { generation: 2, sequence: 5 };
        assert_eq!(err.to_string(), "attempt 5 of generation 2 was superseded");
    }
}
