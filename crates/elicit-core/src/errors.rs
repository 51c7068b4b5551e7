//! Cross-cutting error types for elicit.
//!
//! Crate-specific errors (`EngineError`, `ConfigError`, `EmbeddingError`) live
//! in their own crates. Every failure that reaches a caller is reported as an
//! [`ErrorKind`] plus a user-safe message, never as internal detail.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category surfaced through the turn API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed or too-short input. Recoverable; the message carries guidance.
    Validation,
    /// The embedding backend could not produce a vector.
    DependencyUnavailable,
    /// The diagnosis model is not loaded.
    ModelUnavailable,
    /// Loaded artifacts disagree about the symptom vocabulary.
    ArtifactMismatch,
    /// Anything else.
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Validation => "validation",
            Self::DependencyUnavailable => "dependency_unavailable",
            Self::ModelUnavailable => "model_unavailable",
            Self::ArtifactMismatch => "artifact_mismatch",
            Self::Internal => "internal",
        };
        f.write_str(name)
    }
}

/// Errors raised by the core types themselves.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An evidence weight was not a finite number in `[0, 1]`.
    #[error("Invalid weight for '{id}': {weight} (expected a value between 0 and 1)")]
    InvalidWeight { id: String, weight: f64 },
}

impl CoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Error body returned to turn API callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorResponse {
    pub kind: ErrorKind,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
