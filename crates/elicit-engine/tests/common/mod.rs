//! Shared fixtures: a five-symptom world with a bag-of-words encoder, so no
//! model download is needed.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use elicit_embeddings::{Embedder, EmbeddingError};
use elicit_engine::forest::{ForestArtifact, RandomForestModel, TreeArrays};
use elicit_engine::{
    DiagnosisClassifier, EmbeddingIndex, EngineContext, EngineSettings, MutualInformationMatrix,
    SymptomCatalog,
};

pub const MODEL: &str = "fixture-bow";

const VOCABULARY: &[&str] = &[
    "tiredness",
    "energy",
    "exhausted",
    "vomit",
    "stomach",
    "temperature",
    "hot",
    "pain",
    "head",
    "cold",
    "shivering",
    "feeling",
];

/// Counts vocabulary words. Deterministic, and counts every call.
#[derive(Debug, Default)]
pub struct BagOfWordsEmbedder {
    calls: AtomicUsize,
}

impl BagOfWordsEmbedder {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn vectorize(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; VOCABULARY.len()];
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
        {
            let token = token.to_lowercase();
            if let Some(slot) = VOCABULARY.iter().position(|word| *word == token) {
                vector[slot] += 1.0;
            }
        }
        vector
    }
}

impl Embedder for BagOfWordsEmbedder {
    fn model_name(&self) -> &str {
        MODEL
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(texts.iter().map(|text| Self::vectorize(text)).collect())
    }
}

/// Always fails, like a backend whose runtime crashed.
#[derive(Debug, Default)]
pub struct FailingEmbedder;

impl Embedder for FailingEmbedder {
    fn model_name(&self) -> &str {
        MODEL
    }

    fn dimension(&self) -> usize {
        VOCABULARY.len()
    }

    fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        Err(EmbeddingError::EmbedFailed("runtime unavailable".into()))
    }
}

pub fn catalog() -> SymptomCatalog {
    SymptomCatalog::from_pairs([
        ("fatigue", "Feeling of tiredness and lack of energy"),
        ("nausea", "Urge to vomit with an upset stomach"),
        ("fever", "Body temperature above normal"),
        ("headache", "Pain in the head"),
        ("chills", "Feeling cold and shivering"),
    ])
    .unwrap()
}

/// Symmetric, with `MI(fatigue, fever) = 0.8` and `MI(fatigue, nausea) = 0.01`.
pub fn matrix() -> MutualInformationMatrix {
    let ids = ["fatigue", "nausea", "fever", "headache", "chills"]
        .into_iter()
        .map(Into::into)
        .collect();
    MutualInformationMatrix::new(
        ids,
        vec![
            vec![1.0, 0.01, 0.8, 0.05, 0.0005],
            vec![0.01, 1.0, 0.02, 0.3, 0.0],
            vec![0.8, 0.02, 1.0, 0.1, 0.6],
            vec![0.05, 0.3, 0.1, 1.0, 0.0],
            vec![0.0005, 0.0, 0.6, 0.0, 1.0],
        ],
    )
    .unwrap()
}

fn stump(feature: i64, absent: [f64; 3], present: [f64; 3]) -> TreeArrays {
    TreeArrays {
        children_left: vec![1, -1, -1],
        children_right: vec![2, -1, -1],
        feature: vec![feature, -2, -2],
        threshold: vec![0.5, -2.0, -2.0],
        value: vec![vec![1.0, 1.0, 1.0], absent.to_vec(), present.to_vec()],
    }
}

/// Fever alone points to Malaria, headache to Migraine, otherwise Common Cold.
pub fn forest() -> ForestArtifact {
    ForestArtifact {
        classes: vec!["Common Cold".into(), "Malaria".into(), "Migraine".into()],
        feature_names: ["fatigue", "nausea", "fever", "headache", "chills"]
            .into_iter()
            .map(Into::into)
            .collect(),
        trees: vec![
            stump(2, [0.5, 0.0, 0.5], [0.0, 1.0, 0.0]),
            stump(3, [0.6, 0.4, 0.0], [0.0, 0.0, 1.0]),
        ],
    }
}

pub fn classifier() -> DiagnosisClassifier {
    DiagnosisClassifier::new(Box::new(RandomForestModel::new(forest()).unwrap())).unwrap()
}

pub fn context_with(embedder: Arc<dyn Embedder>, settings: EngineSettings) -> EngineContext {
    let catalog = catalog();
    let index = EmbeddingIndex::build(&catalog, &BagOfWordsEmbedder::default()).unwrap();
    EngineContext::new(catalog, index, matrix(), classifier(), embedder, settings).unwrap()
}

pub fn context() -> EngineContext {
    context_with(
        Arc::new(BagOfWordsEmbedder::default()),
        EngineSettings::default(),
    )
}
