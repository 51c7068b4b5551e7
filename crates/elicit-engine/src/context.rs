//! Shared, immutable engine resources.

use std::sync::{Arc, PoisonError, RwLock};

use elicit_config::ElicitConfig;
use elicit_embeddings::Embedder;

use crate::artifacts;
use crate::catalog::SymptomCatalog;
use crate::classifier::DiagnosisClassifier;
use crate::error::EngineError;
use crate::index::EmbeddingIndex;
use crate::matcher::SymptomMatcher;
use crate::mi::MutualInformationMatrix;
use crate::selector::{InformationGainSelector, SelectorSettings};

/// Tunables for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSettings {
    /// Maximum candidates returned from free text.
    pub top_k: usize,
    /// Shortest accepted initial description, in characters after trimming.
    pub min_text_chars: usize,
    pub selector: SelectorSettings,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&ElicitConfig::default())
    }
}

impl EngineSettings {
    #[must_use]
    pub fn from_config(config: &ElicitConfig) -> Self {
        Self {
            top_k: config.matcher.top_k,
            min_text_chars: config.matcher.min_text_chars,
            selector: SelectorSettings::from(&config.selector),
        }
    }
}

/// Everything a turn needs, built once and shared read-only.
pub struct EngineContext {
    catalog: SymptomCatalog,
    index: EmbeddingIndex,
    matrix: MutualInformationMatrix,
    classifier: DiagnosisClassifier,
    embedder: Arc<dyn Embedder>,
    settings: EngineSettings,
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("symptoms", &self.catalog.len())
            .field("model", &self.index.model())
            .field("mi_symptoms", &self.matrix.len())
            .field("classifier", &self.classifier)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl EngineContext {
    /// Assemble a context, checking that the artifacts agree with each other.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ArtifactMismatch`] if the index is not aligned
    /// with the catalog or was built by a different encoder, or if the
    /// mutual-information matrix or classifier names a symptom the catalog
    /// does not have.
    pub fn new(
        catalog: SymptomCatalog,
        index: EmbeddingIndex,
        matrix: MutualInformationMatrix,
        classifier: DiagnosisClassifier,
        embedder: Arc<dyn Embedder>,
        settings: EngineSettings,
    ) -> Result<Self, EngineError> {
        if index.len() != catalog.len() {
            return Err(EngineError::ArtifactMismatch(format!(
                "embedding index has {} entries for {} catalog symptoms",
                index.len(),
                catalog.len()
            )));
        }
        if index.model() != embedder.model_name() {
            return Err(EngineError::ArtifactMismatch(format!(
                "embedding index built with '{}' but the encoder is '{}'",
                index.model(),
                embedder.model_name()
            )));
        }
        if let Some(id) = matrix.ids().iter().find(|id| !catalog.contains(id.as_str())) {
            return Err(EngineError::ArtifactMismatch(format!(
                "mutual-information matrix names unknown symptom '{id}'"
            )));
        }
        if let Some(id) = classifier
            .features()
            .iter()
            .find(|id| !catalog.contains(id.as_str()))
        {
            return Err(EngineError::ArtifactMismatch(format!(
                "classifier feature '{id}' is not in the catalog"
            )));
        }

        Ok(Self {
            catalog,
            index,
            matrix,
            classifier,
            embedder,
            settings,
        })
    }

    /// Load every artifact named by `config` and assemble the context.
    ///
    /// The embedding index comes from the on-disk cache when it matches
    /// `embedder`, otherwise it is computed and the cache rewritten.
    ///
    /// # Errors
    ///
    /// Any artifact loading error, or the consistency errors of [`Self::new`].
    pub fn from_config(
        config: &ElicitConfig,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self, EngineError> {
        let paths = &config.artifacts;
        let catalog = artifacts::load_catalog(&paths.catalog_path())?;
        let matrix = artifacts::load_mi_matrix(&paths.mi_matrix_path())?;
        let forest = artifacts::load_forest(&paths.classifier_path())?;
        let classifier = DiagnosisClassifier::new(Box::new(forest))?;
        let index =
            artifacts::load_or_build_index(&paths.embeddings_path(), &catalog, embedder.as_ref())?;

        Self::new(
            catalog,
            index,
            matrix,
            classifier,
            embedder,
            EngineSettings::from_config(config),
        )
    }

    #[must_use]
    pub const fn catalog(&self) -> &SymptomCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    #[must_use]
    pub const fn matrix(&self) -> &MutualInformationMatrix {
        &self.matrix
    }

    #[must_use]
    pub const fn classifier(&self) -> &DiagnosisClassifier {
        &self.classifier
    }

    #[must_use]
    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    #[must_use]
    pub const fn settings(&self) -> EngineSettings {
        self.settings
    }

    #[must_use]
    pub fn matcher(&self) -> SymptomMatcher<'_> {
        SymptomMatcher::new(&self.catalog, &self.index, self.embedder.as_ref())
    }

    #[must_use]
    pub const fn selector(&self) -> InformationGainSelector<'_> {
        InformationGainSelector::new(&self.matrix, self.settings.selector)
    }
}

/// Swappable handle to the current [`EngineContext`].
///
/// Readers take a snapshot and keep using it for the whole turn; a reload
/// replaces the snapshot for later readers only.
#[derive(Debug)]
pub struct SharedContext {
    current: RwLock<Arc<EngineContext>>,
}

impl SharedContext {
    #[must_use]
    pub fn new(context: EngineContext) -> Self {
        Self {
            current: RwLock::new(Arc::new(context)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<EngineContext> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Install `context`, returning the snapshot it replaced.
    pub fn reload(&self, context: EngineContext) -> Arc<EngineContext> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        tracing::info!(symptoms = context.catalog.len(), "reloaded engine context");
        std::mem::replace(&mut *current, Arc::new(context))
    }
}
