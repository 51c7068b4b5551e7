//! # elicit-embeddings
//!
//! Sentence embeddings for symptom matching using fastembed (ONNX runtime).
//!
//! The same encoder embeds the catalog's symptom descriptions (once, at
//! startup) and every live query. Mixing encoders breaks cosine similarity,
//! so every [`Embedder`] reports a [`Embedder::model_name`] that callers
//! record next to cached vectors.
//!
//! ## Async usage
//!
//! The fastembed ONNX runtime is synchronous. When calling from async code,
//! wrap calls in `tokio::task::spawn_blocking`:
//!
//! ```ignore
//! let vector = tokio::task::spawn_blocking(move || engine.embed(&text)).await??;
//! ```

pub mod error;
mod model;

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

pub use error::EmbeddingError;
use fastembed::{TextEmbedding, TextInitOptions};
pub use model::EncoderModel;

/// Text -> fixed-length vector backend.
///
/// Implementations must be deterministic for identical input and model.
pub trait Embedder: Send + Sync {
    /// Identifier of the encoder; vectors from different names are not comparable.
    fn model_name(&self) -> &str;

    /// Length of every vector this backend produces.
    fn dimension(&self) -> usize;

    /// Embed a batch of texts. Returns one vector per input, in order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails.
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::EmbedFailed`] if inference fails, or
    /// [`EmbeddingError::EmptyResult`] if the backend returns no vector.
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut results = self.embed_batch(&[text.to_string()])?;
        results.pop().ok_or(EmbeddingError::EmptyResult)
    }
}

/// Local embedding engine backed by fastembed.
///
/// Model files are downloaded on first use and cached at
/// `~/.elicit/cache/fastembed/` unless another cache directory is given.
///
/// # Thread safety
///
/// [`TextEmbedding::embed`] requires `&mut self`, so the model sits behind a
/// `Mutex`. Concurrent queries serialize on inference, which dominates the
/// latency of a matching turn anyway.
pub struct EmbeddingEngine {
    model: Mutex<TextEmbedding>,
    kind: EncoderModel,
}

impl EmbeddingEngine {
    /// Create an engine for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::InitFailed`] if model download or ONNX initialization fails.
    pub fn new(
        kind: EncoderModel,
        cache_dir: Option<PathBuf>,
        show_download_progress: bool,
    ) -> Result<Self, EmbeddingError> {
        let cache_dir = cache_dir.unwrap_or_else(default_cache_dir);
        tracing::info!(model = kind.name(), cache = %cache_dir.display(), "loading embedding model");

        let model = TextEmbedding::try_new(
            TextInitOptions::new(kind.fastembed_model())
                .with_cache_dir(cache_dir)
                .with_show_download_progress(show_download_progress),
        )
        .map_err(|e| EmbeddingError::InitFailed(e.to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
            kind,
        })
    }

    /// Create an engine from a configured model name.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::UnknownModel`] for an unsupported name, or
    /// [`EmbeddingError::InitFailed`] as for [`Self::new`].
    pub fn from_name(
        name: &str,
        cache_dir: Option<PathBuf>,
        show_download_progress: bool,
    ) -> Result<Self, EmbeddingError> {
        Self::new(name.parse()?, cache_dir, show_download_progress)
    }

    #[must_use]
    pub const fn kind(&self) -> EncoderModel {
        self.kind
    }
}

impl Embedder for EmbeddingEngine {
    fn model_name(&self) -> &str {
        self.kind.name()
    }

    fn dimension(&self) -> usize {
        self.kind.dimension()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut model = self.model.lock().unwrap_or_else(PoisonError::into_inner);
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| EmbeddingError::EmbedFailed(e.to_string()))
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir().map_or_else(
        || PathBuf::from(".fastembed_cache"),
        |h| h.join(".elicit").join("cache").join("fastembed"),
    )
}

/// Cosine similarity between two vectors. Zero-norm inputs score `0.0`.
///
/// # Errors
///
/// Returns [`EmbeddingError::DimensionMismatch`] if the lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f32, EmbeddingError> {
    if a.len() != b.len() {
        return Err(EmbeddingError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }
    Ok(dot / (norm_a * norm_b))
}
