//! Per-request evidence about the user's symptoms.
//!
//! Both types are rebuilt from caller-supplied data on every turn; nothing
//! here is persisted between turns.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::symptom::SymptomId;

/// Observed presence of each symptom as a confidence weight in `[0, 1]`.
///
/// `1.0` means fully confirmed, `0.0` means denied. Any weight above zero
/// counts as confirmed evidence. Entries are kept in identifier order so
/// every aggregate over the state is independent of the order the caller
/// reported symptoms in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct EvidenceState {
    weights: BTreeMap<SymptomId, f64>,
}

impl EvidenceState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(id, weight)` pairs, rejecting invalid weights.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWeight`] if any weight is non-finite or
    /// outside `[0, 1]`.
    pub fn from_weights<I, K>(weights: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<SymptomId>,
    {
        let mut state = Self::new();
        for (id, weight) in weights {
            state.insert(id, weight)?;
        }
        Ok(state)
    }

    /// Record a weight for `id`, replacing any previous answer.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidWeight`] if `weight` is non-finite or
    /// outside `[0, 1]`.
    pub fn insert(&mut self, id: impl Into<SymptomId>, weight: f64) -> Result<(), CoreError> {
        let id = id.into();
        check_weight(&id, weight)?;
        self.weights.insert(id, weight);
        Ok(())
    }

    pub fn confirm(&mut self, id: impl Into<SymptomId>) {
        self.weights.insert(id.into(), 1.0);
    }

    pub fn deny(&mut self, id: impl Into<SymptomId>) {
        self.weights.insert(id.into(), 0.0);
    }

    /// Check every stored weight. Deserialized states bypass [`Self::insert`].
    ///
    /// # Errors
    ///
    /// Returns the first [`CoreError::InvalidWeight`] found.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.weights
            .iter()
            .try_for_each(|(id, weight)| check_weight(id, *weight))
    }

    #[must_use]
    pub fn weight(&self, id: &str) -> Option<f64> {
        self.weights.get(id).copied()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.weights.contains_key(id)
    }

    /// Entries with a weight above zero.
    pub fn confirmed(&self) -> impl Iterator<Item = (&SymptomId, f64)> {
        self.weights
            .iter()
            .filter(|(_, weight)| **weight > 0.0)
            .map(|(id, weight)| (id, *weight))
    }

    #[must_use]
    pub fn confirmed_ids(&self) -> BTreeSet<SymptomId> {
        self.confirmed().map(|(id, _)| id.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SymptomId, f64)> {
        self.weights.iter().map(|(id, weight)| (id, *weight))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

fn check_weight(id: &SymptomId, weight: f64) -> Result<(), CoreError> {
    if weight.is_finite() && (0.0..=1.0).contains(&weight) {
        Ok(())
    } else {
        Err(CoreError::InvalidWeight {
            id: id.to_string(),
            weight,
        })
    }
}

/// Symptoms already presented to the user in the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AskedSet {
    ids: BTreeSet<SymptomId>,
}

impl AskedSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `id` was not already present.
    pub fn insert(&mut self, id: impl Into<SymptomId>) -> bool {
        self.ids.insert(id.into())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymptomId> {
        self.ids.iter()
    }
}

impl<K: Into<SymptomId>> FromIterator<K> for AskedSet {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<K: Into<SymptomId>> Extend<K> for AskedSet {
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        self.ids.extend(iter.into_iter().map(Into::into));
    }
}
