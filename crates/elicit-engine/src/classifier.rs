//! Disease prediction from a confirmed symptom set.
//!
//! The trained model is an opaque oracle behind [`DiagnosisModel`]: it
//! declares the feature order it was trained on and maps a binary presence
//! vector in that order to class probabilities.

use std::collections::{BTreeSet, HashMap};

use elicit_core::SymptomId;
use elicit_core::responses::RankedDiagnosis;

use crate::error::EngineError;

/// A pre-trained multi-class classifier over binary symptom features.
pub trait DiagnosisModel: Send + Sync {
    /// Feature vocabulary, in the order the model expects its input.
    fn feature_names(&self) -> &[SymptomId];

    /// Class labels, aligned with [`Self::predict_proba`]'s output.
    fn classes(&self) -> &[String];

    /// Probability per class for one presence vector.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] if the model cannot evaluate
    /// the input.
    fn predict_proba(&self, features: &[u8]) -> Result<Vec<f64>, EngineError>;
}

/// Builds feature vectors for a [`DiagnosisModel`] and interprets its output.
pub struct DiagnosisClassifier {
    model: Box<dyn DiagnosisModel>,
    positions: HashMap<SymptomId, usize>,
}

impl std::fmt::Debug for DiagnosisClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosisClassifier")
            .field("features", &self.model.feature_names().len())
            .field("classes", &self.model.classes().len())
            .finish()
    }
}

impl DiagnosisClassifier {
    /// # Errors
    ///
    /// Returns [`EngineError::ModelUnavailable`] if the model has no features
    /// or no classes, and [`EngineError::ArtifactMismatch`] if a feature name
    /// repeats.
    pub fn new(model: Box<dyn DiagnosisModel>) -> Result<Self, EngineError> {
        if model.feature_names().is_empty() {
            return Err(EngineError::ModelUnavailable(
                "classifier has an empty feature vocabulary".into(),
            ));
        }
        if model.classes().is_empty() {
            return Err(EngineError::ModelUnavailable(
                "classifier has no classes".into(),
            ));
        }

        let mut positions = HashMap::with_capacity(model.feature_names().len());
        for (position, id) in model.feature_names().iter().enumerate() {
            if positions.insert(id.clone(), position).is_some() {
                return Err(EngineError::ArtifactMismatch(format!(
                    "duplicate classifier feature '{id}'"
                )));
            }
        }

        Ok(Self { model, positions })
    }

    #[must_use]
    pub fn features(&self) -> &[SymptomId] {
        self.model.feature_names()
    }

    #[must_use]
    pub fn classes(&self) -> &[String] {
        self.model.classes()
    }

    #[must_use]
    pub fn knows(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Presence vector in feature order: `1` where the feature is confirmed.
    ///
    /// Confirmed ids the model has no feature for are dropped.
    #[must_use]
    pub fn encode(&self, confirmed: &BTreeSet<SymptomId>) -> Vec<u8> {
        let mut vector = vec![0_u8; self.positions.len()];
        for id in confirmed {
            if let Some(&position) = self.positions.get(id) {
                vector[position] = 1;
            }
        }
        vector
    }

    /// Inverse of [`Self::encode`]: the features set to a non-zero value.
    #[must_use]
    pub fn decode(&self, vector: &[u8]) -> BTreeSet<SymptomId> {
        self.features()
            .iter()
            .zip(vector)
            .filter(|(_, present)| **present != 0)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// The single most probable disease label.
    ///
    /// # Errors
    ///
    /// Propagates [`DiagnosisModel::predict_proba`] failures.
    pub fn predict(&self, confirmed: &BTreeSet<SymptomId>) -> Result<String, EngineError> {
        self.predict_ranked(confirmed, 1)?
            .into_iter()
            .next()
            .map(|ranked| ranked.label)
            .ok_or_else(|| EngineError::ModelUnavailable("model returned no classes".into()))
    }

    /// The `limit` most probable labels, best first. Equal probabilities keep
    /// class order, so the first entry matches an argmax over the classes.
    ///
    /// # Errors
    ///
    /// Propagates [`DiagnosisModel::predict_proba`] failures, and returns
    /// [`EngineError::ModelUnavailable`] if the model returns the wrong number
    /// of probabilities.
    pub fn predict_ranked(
        &self,
        confirmed: &BTreeSet<SymptomId>,
        limit: usize,
    ) -> Result<Vec<RankedDiagnosis>, EngineError> {
        let features = self.encode(confirmed);
        let probabilities = self.model.predict_proba(&features)?;
        let classes = self.model.classes();
        if probabilities.len() != classes.len() {
            return Err(EngineError::ModelUnavailable(format!(
                "model returned {} probabilities for {} classes",
                probabilities.len(),
                classes.len()
            )));
        }

        let mut ranked: Vec<RankedDiagnosis> = classes
            .iter()
            .zip(probabilities)
            .map(|(label, probability)| RankedDiagnosis {
                label: label.clone(),
                probability,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked.truncate(limit);

        if let Some(top) = ranked.first() {
            tracing::debug!(
                confirmed = confirmed.len(),
                label = %top.label,
                probability = top.probability,
                "predicted diagnosis"
            );
        }
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    /// Scores each class by how many of its marker features are present.
    struct MarkerModel {
        features: Vec<SymptomId>,
        classes: Vec<String>,
        markers: Vec<Vec<usize>>,
    }

    impl DiagnosisModel for MarkerModel {
        fn feature_names(&self) -> &[SymptomId] {
            &self.features
        }

        fn classes(&self) -> &[String] {
            &self.classes
        }

        fn predict_proba(&self, features: &[u8]) -> Result<Vec<f64>, EngineError> {
            let hits: Vec<f64> = self
                .markers
                .iter()
                .map(|markers| markers.iter().map(|&i| f64::from(features[i])).sum())
                .collect();
            let total: f64 = hits.iter().sum();
            if total == 0.0 {
                let n = self.classes.len() as f64;
                return Ok(vec![1.0 / n; self.classes.len()]);
            }
            Ok(hits.into_iter().map(|h| h / total).collect())
        }
    }

    fn classifier() -> DiagnosisClassifier {
        DiagnosisClassifier::new(Box::new(MarkerModel {
            features: vec!["itching".into(), "skin_rash".into(), "high_fever".into(), "cough".into()],
            classes: vec!["Fungal infection".into(), "Common Cold".into()],
            markers: vec![vec![0, 1], vec![2, 3]],
        }))
        .unwrap()
    }

    fn set(ids: &[&str]) -> BTreeSet<SymptomId> {
        ids.iter().copied().map(SymptomId::from).collect()
    }

    #[test]
    fn encodes_in_feature_order() {
        let classifier = classifier();
        assert_eq!(classifier.encode(&set(&["cough", "itching"])), vec![1, 0, 0, 1]);
        assert_eq!(classifier.encode(&set(&[])), vec![0, 0, 0, 0]);
    }

    #[test]
    fn decode_recovers_known_subset() {
        let classifier = classifier();
        let confirmed = set(&["cough", "skin_rash", "not_a_feature"]);
        let decoded = classifier.decode(&classifier.encode(&confirmed));
        assert_eq!(decoded, set(&["cough", "skin_rash"]));
    }

    #[test]
    fn predicts_argmax_class() {
        let classifier = classifier();
        assert_eq!(
            classifier.predict(&set(&["itching", "skin_rash"])).unwrap(),
            "Fungal infection"
        );
        assert_eq!(
            classifier.predict(&set(&["high_fever", "cough", "itching"])).unwrap(),
            "Common Cold"
        );
    }

    #[test]
    fn predict_is_deterministic() {
        let classifier = classifier();
        let confirmed = set(&["high_fever", "skin_rash"]);
        let first = classifier.predict(&confirmed).unwrap();
        for _ in 0..5 {
            assert_eq!(classifier.predict(&confirmed).unwrap(), first);
        }
    }

    #[test]
    fn ties_resolve_to_first_class() {
        let classifier = classifier();
        let ranked = classifier.predict_ranked(&set(&[]), 2).unwrap();
        assert_eq!(ranked[0].label, "Fungal infection");
        assert_eq!(ranked[1].label, "Common Cold");
    }

    #[test]
    fn empty_vocabulary_is_model_unavailable() {
        let err = DiagnosisClassifier::new(Box::new(MarkerModel {
            features: Vec::new(),
            classes: vec!["x".into()],
            markers: vec![Vec::new()],
        }))
        .unwrap_err();
        assert!(matches!(err, EngineError::ModelUnavailable(_)));
    }
}
