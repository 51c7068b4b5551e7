//! The immutable symptom vocabulary.

use std::collections::HashMap;

use elicit_core::{Symptom, SymptomId};

use crate::error::EngineError;

/// Ordered, de-duplicated list of known symptoms.
///
/// Catalog order is significant: keyword matches are reported in it and
/// semantic ties resolve to the earlier entry.
#[derive(Debug, Clone)]
pub struct SymptomCatalog {
    symptoms: Vec<Symptom>,
    positions: HashMap<SymptomId, usize>,
}

impl SymptomCatalog {
    /// # Errors
    ///
    /// Returns [`EngineError::ArtifactMismatch`] if `symptoms` is empty or an
    /// identifier repeats.
    pub fn new(symptoms: Vec<Symptom>) -> Result<Self, EngineError> {
        if symptoms.is_empty() {
            return Err(EngineError::ArtifactMismatch(
                "symptom catalog is empty".into(),
            ));
        }

        let mut positions = HashMap::with_capacity(symptoms.len());
        for (position, symptom) in symptoms.iter().enumerate() {
            if positions.insert(symptom.id.clone(), position).is_some() {
                return Err(EngineError::ArtifactMismatch(format!(
                    "duplicate symptom id '{}' in catalog",
                    symptom.id
                )));
            }
        }

        Ok(Self {
            symptoms,
            positions,
        })
    }

    /// Convenience constructor from `(id, description)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`Self::new`].
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, EngineError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<SymptomId>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(id, description)| Symptom::new(id, description))
                .collect(),
        )
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Symptom> {
        self.position(id).map(|position| &self.symptoms[position])
    }

    #[must_use]
    pub fn description(&self, id: &str) -> Option<&str> {
        self.get(id).map(|symptom| symptom.description.as_str())
    }

    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.positions.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    #[must_use]
    pub fn symptom_at(&self, position: usize) -> Option<&Symptom> {
        self.symptoms.get(position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symptom> {
        self.symptoms.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SymptomId> {
        self.symptoms.iter().map(|symptom| &symptom.id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.symptoms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symptoms.is_empty()
    }
}
