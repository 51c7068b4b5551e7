//! Engine error types.

use elicit_core::{CoreError, ErrorKind, ErrorResponse};
use elicit_embeddings::EmbeddingError;

use crate::artifacts::ArtifactError;

/// Errors from matching, selection, classification and context assembly.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Caller input was rejected. The message is safe to show to users.
    #[error("{0}")]
    Validation(String),

    /// Invalid evidence or other core-type validation failure.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The embedding backend failed; matching cannot proceed.
    #[error("embedding backend unavailable: {0}")]
    DependencyUnavailable(#[from] EmbeddingError),

    /// The diagnosis model is missing or unusable.
    #[error("diagnosis model unavailable: {0}")]
    ModelUnavailable(String),

    /// Two artifacts disagree about the symptom vocabulary.
    #[error("artifact mismatch: {0}")]
    ArtifactMismatch(String),

    /// An artifact file could not be read or parsed.
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
}

impl EngineError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Core(err) => err.kind(),
            Self::DependencyUnavailable(_) => ErrorKind::DependencyUnavailable,
            Self::ModelUnavailable(_) => ErrorKind::ModelUnavailable,
            Self::ArtifactMismatch(_) => ErrorKind::ArtifactMismatch,
            Self::Artifact(_) => ErrorKind::Internal,
        }
    }

    /// Caller-facing form: the kind plus a message without internal detail.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            Self::Validation(message) => message.clone(),
            Self::Core(err) => err.to_string(),
            Self::DependencyUnavailable(_) => {
                "Symptom matching is temporarily unavailable. Please try again later.".to_string()
            }
            Self::ModelUnavailable(_) => "The diagnosis model is not available.".to_string(),
            Self::ArtifactMismatch(_) | Self::Artifact(_) => "Internal server error.".to_string(),
        };
        ErrorResponse::new(self.kind(), message)
    }
}
