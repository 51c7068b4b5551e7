//! Precomputed description embeddings with brute-force nearest-neighbour search.

use elicit_embeddings::{Embedder, EmbeddingError, cosine_similarity};

use crate::catalog::SymptomCatalog;
use crate::error::EngineError;

/// One embedding per catalog symptom, aligned by catalog position.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    model: String,
    dimension: usize,
    vectors: Vec<Vec<f32>>,
}

impl EmbeddingIndex {
    /// Embed every catalog description with `embedder`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::DependencyUnavailable`] if the backend fails.
    pub fn build(catalog: &SymptomCatalog, embedder: &dyn Embedder) -> Result<Self, EngineError> {
        let descriptions: Vec<String> = catalog
            .iter()
            .map(|symptom| symptom.description.clone())
            .collect();
        let vectors = embedder.embed_batch(&descriptions)?;
        tracing::info!(
            symptoms = vectors.len(),
            model = embedder.model_name(),
            "built symptom embedding index"
        );
        Self::from_vectors(
            catalog,
            embedder.model_name(),
            embedder.dimension(),
            vectors,
        )
    }

    /// Wrap vectors computed elsewhere (e.g. loaded from a cache).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ArtifactMismatch`] if there is not exactly one
    /// vector per catalog symptom or a vector has the wrong length.
    pub fn from_vectors(
        catalog: &SymptomCatalog,
        model: &str,
        dimension: usize,
        vectors: Vec<Vec<f32>>,
    ) -> Result<Self, EngineError> {
        if vectors.len() != catalog.len() {
            return Err(EngineError::ArtifactMismatch(format!(
                "{} embeddings for {} catalog symptoms",
                vectors.len(),
                catalog.len()
            )));
        }
        if let Some((position, vector)) = vectors
            .iter()
            .enumerate()
            .find(|(_, vector)| vector.len() != dimension)
        {
            let id = catalog
                .symptom_at(position)
                .map_or_else(String::new, |symptom| symptom.id.to_string());
            return Err(EngineError::ArtifactMismatch(format!(
                "embedding for '{id}' has {} dimensions, expected {dimension}",
                vector.len()
            )));
        }

        Ok(Self {
            model: model.to_string(),
            dimension,
            vectors,
        })
    }

    /// Name of the encoder that produced the vectors.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    #[must_use]
    pub fn vector(&self, position: usize) -> Option<&[f32]> {
        self.vectors.get(position).map(Vec::as_slice)
    }

    /// Cosine similarity of `query` against every vector, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`EmbeddingError::DimensionMismatch`] if `query` has the wrong length.
    pub fn similarities(&self, query: &[f32]) -> Result<Vec<f32>, EmbeddingError> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        self.vectors
            .iter()
            .map(|vector| cosine_similarity(query, vector))
            .collect()
    }

    /// The `k` most similar catalog positions, best first.
    ///
    /// The sort is stable, so equal scores keep catalog order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::similarities`].
    pub fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, EmbeddingError> {
        let mut scored: Vec<(usize, f32)> =
            self.similarities(query)?.into_iter().enumerate().collect();
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);
        Ok(scored)
    }
}
