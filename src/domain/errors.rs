//! Domain errors for the retrieval and generation pipeline.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Format an upstream HTTP status for error messages.
fn format_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "transport".to_string(), |s| format!("HTTP {s}"))
}

/// Errors produced by the chunk/embed/retrieve/generate pipeline.
#[derive(Debug, Error)]
pub enum RagError {
    /// The inference endpoint could not be reached after every discovery attempt.
    #[error("Inference endpoint {endpoint} unreachable after {attempts} attempt(s): {last_error}")]
    Connection {
        endpoint: String,
        attempts: u32,
        last_error: String,
    },

    /// The endpoint answered but offers no model usable for generation.
    #[error("No usable model found at {endpoint} (available: {})", .available.join(", "))]
    ModelNotFound {
        endpoint: String,
        available: Vec<String>,
    },

    /// A required request field is missing or empty.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Document mode was requested but retrieval returned nothing.
    #[error("No relevant information found in the loaded document; ingest a document and try again")]
    RetrievalEmpty,

    /// The generation call failed or returned a non-success status.
    #[error("Generation failed ({}): {message}", format_status(.status))]
    Generation { status: Option<u16>, message: String },

    /// An embedding call failed or returned a non-success status.
    #[error("Embedding failed ({}): {message}", format_status(.status))]
    Embedding { status: Option<u16>, message: String },

    /// A vector did not match the dimensionality of the active corpus.
    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Client construction or configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result alias used throughout the library.
pub type RagResult<T> = Result<T, RagError>;

/// Protocol-neutral status reported to callers of the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStatus {
    /// The request was missing a required field.
    ValidationFailed,
    /// Document mode produced an empty retrieval.
    NoRelevantContext,
    /// The inference endpoint is unreachable or unusable.
    ServiceUnavailable,
    /// A model call failed.
    GenerationFailed,
}

impl RagError {
    /// Semantic status for this error.
    pub const fn status(&self) -> ErrorStatus {
        match self {
            Self::Validation(_) => ErrorStatus::ValidationFailed,
            Self::RetrievalEmpty => ErrorStatus::NoRelevantContext,
            Self::Connection { .. } | Self::ModelNotFound { .. } | Self::Config(_) => {
                ErrorStatus::ServiceUnavailable
            }
            Self::Generation { .. } | Self::Embedding { .. } | Self::DimensionMismatch { .. } => {
                ErrorStatus::GenerationFailed
            }
        }
    }

    /// Convenience constructor for validation failures.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl std::fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::ValidationFailed => "validation_failed",
            Self::NoRelevantContext => "no_relevant_context",
            Self::ServiceUnavailable => "service_unavailable",
            Self::GenerationFailed => "generation_failed",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            RagError::validation("message is required").status(),
            ErrorStatus::ValidationFailed
        );
        assert_eq!(RagError::RetrievalEmpty.status(), ErrorStatus::NoRelevantContext);
        assert_eq!(
            RagError::Connection {
                endpoint: "http://localhost:11434".to_string(),
                attempts: 3,
                last_error: "connection refused".to_string(),
            }
            .status(),
            ErrorStatus::ServiceUnavailable
        );
        assert_eq!(
            RagError::Generation {
                status: Some(500),
                message: "boom".to_string(),
            }
            .status(),
            ErrorStatus::GenerationFailed
        );
        assert_eq!(
            RagError::Embedding {
                status: None,
                message: "reset".to_string(),
            }
            .status(),
            ErrorStatus::GenerationFailed
        );
    }

    #[test]
    fn test_connection_error_message_includes_attempts_and_endpoint() {
        let err = RagError::Connection {
            endpoint: "http://localhost:11434".to_string(),
            attempts: 3,
            last_error: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("http://localhost:11434"));
        assert!(msg.contains("3 attempt(s)"));
    }

    #[test]
    fn test_generation_error_includes_upstream_status() {
        let err = RagError::Generation {
            status: Some(404),
            message: "model 'x' not found".to_string(),
        };
        assert_eq!(err.to_string(), "Generation failed (HTTP 404): model 'x' not found");

        let err = RagError::Generation {
            status: None,
            message: "timed out".to_string(),
        };
        assert_eq!(err.to_string(), "Generation failed (transport): timed out");
    }

    #[test]
    fn test_error_status_display() {
        assert_eq!(ErrorStatus::NoRelevantContext.to_string(), "no_relevant_context");
        assert_eq!(
            serde_json::to_string(&ErrorStatus::ServiceUnavailable).unwrap(),
            "\"service_unavailable\""
        );
    }
}
