//! Hybrid keyword + semantic matching of free text onto the symptom catalog.
//!
//! The keyword pass looks for each symptom's phrase (`high_fever` ->
//! `high fever`) inside the normalized text. The semantic pass embeds the
//! normalized text and ranks catalog descriptions by cosine similarity.
//! Keyword hits come first; semantic hits fill the remaining slots.
//!
//! Text that normalizes to nothing (only stopwords or punctuation) yields no
//! matches at all: the semantic pass is skipped rather than embedding an
//! empty string and returning whatever descriptions sit nearest to it.

use std::collections::HashMap;

use elicit_core::SymptomId;
use elicit_core::responses::{MatchCandidate, MatchSource};
use elicit_embeddings::Embedder;

use crate::catalog::SymptomCatalog;
use crate::error::EngineError;
use crate::index::EmbeddingIndex;
use crate::normalize::normalize;

/// Borrowed view over the shared resources needed to match text.
#[derive(Clone, Copy)]
pub struct SymptomMatcher<'a> {
    catalog: &'a SymptomCatalog,
    index: &'a EmbeddingIndex,
    embedder: &'a dyn Embedder,
}

impl<'a> SymptomMatcher<'a> {
    #[must_use]
    pub fn new(
        catalog: &'a SymptomCatalog,
        index: &'a EmbeddingIndex,
        embedder: &'a dyn Embedder,
    ) -> Self {
        Self {
            catalog,
            index,
            embedder,
        }
    }

    /// Up to `top_k` catalog ids for `text`, keyword matches first.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `top_k` is zero, and
    /// [`EngineError::DependencyUnavailable`] if the embedding backend fails.
    pub fn match_symptoms(&self, text: &str, top_k: usize) -> Result<Vec<SymptomId>, EngineError> {
        Ok(self
            .match_scored(text, top_k)?
            .into_iter()
            .map(|candidate| candidate.id)
            .collect())
    }

    /// Like [`Self::match_symptoms`] but reports how each candidate was found.
    ///
    /// # Errors
    ///
    /// Same as [`Self::match_symptoms`].
    pub fn match_scored(
        &self,
        text: &str,
        top_k: usize,
    ) -> Result<Vec<MatchCandidate>, EngineError> {
        if top_k == 0 {
            return Err(EngineError::Validation(
                "top_k must be at least 1".to_string(),
            ));
        }

        let normalized = normalize(text);
        if normalized.is_empty() {
            tracing::debug!("text normalized to nothing; no candidates");
            return Ok(Vec::new());
        }

        let keyword = self.keyword_positions(&normalized);
        let semantic = self.semantic_positions(&normalized, top_k)?;
        let similarity: HashMap<usize, f32> = semantic.iter().copied().collect();

        let mut merged: Vec<MatchCandidate> = Vec::with_capacity(top_k);
        let mut seen = Vec::with_capacity(top_k);
        let ordered = keyword
            .iter()
            .copied()
            .chain(semantic.iter().map(|(position, _)| *position));
        for position in ordered {
            if merged.len() == top_k {
                break;
            }
            if seen.contains(&position) {
                continue;
            }
            seen.push(position);

            let Some(symptom) = self.catalog.symptom_at(position) else {
                continue;
            };
            let source = match (keyword.contains(&position), similarity.get(&position)) {
                (true, Some(_)) => MatchSource::Both,
                (true, None) => MatchSource::Keyword,
                (false, _) => MatchSource::Semantic,
            };
            merged.push(MatchCandidate {
                id: symptom.id.clone(),
                source,
                similarity: similarity.get(&position).copied(),
            });
        }

        tracing::debug!(
            keyword = keyword.len(),
            semantic = semantic.len(),
            returned = merged.len(),
            "matched symptoms"
        );
        Ok(merged)
    }

    /// Catalog positions whose phrase occurs in `normalized`, in catalog order.
    fn keyword_positions(&self, normalized: &str) -> Vec<usize> {
        self.catalog
            .iter()
            .enumerate()
            .filter(|(_, symptom)| normalized.contains(&symptom.id.phrase()))
            .map(|(position, _)| position)
            .collect()
    }

    fn semantic_positions(
        &self,
        normalized: &str,
        top_k: usize,
    ) -> Result<Vec<(usize, f32)>, EngineError> {
        if self.embedder.model_name() != self.index.model() {
            return Err(EngineError::ArtifactMismatch(format!(
                "index built with '{}' but queries use '{}'",
                self.index.model(),
                self.embedder.model_name()
            )));
        }
        let query = self.embedder.embed(normalized)?;
        Ok(self.index.nearest(&query, top_k)?)
    }
}
