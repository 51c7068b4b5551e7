//! Locations of the pre-built model artifacts.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dir() -> String {
    "artifacts".to_string()
}

fn default_catalog() -> String {
    "sym_desc.json".to_string()
}

fn default_mi_matrix() -> String {
    "mi_matrix.csv".to_string()
}

fn default_embeddings() -> String {
    "symptom_embeddings.json".to_string()
}

fn default_classifier() -> String {
    "classifier.json".to_string()
}

/// File names are resolved relative to `dir` unless absolute.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtifactsConfig {
    #[serde(default = "default_dir")]
    pub dir: String,

    /// JSON object `{symptom_id: description}`.
    #[serde(default = "default_catalog")]
    pub catalog: String,

    /// CSV symptom x symptom mutual-information table.
    #[serde(default = "default_mi_matrix")]
    pub mi_matrix: String,

    /// Cached description embeddings, rebuilt when missing or stale.
    #[serde(default = "default_embeddings")]
    pub embeddings: String,

    /// Exported random-forest classifier.
    #[serde(default = "default_classifier")]
    pub classifier: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            catalog: default_catalog(),
            mi_matrix: default_mi_matrix(),
            embeddings: default_embeddings(),
            classifier: default_classifier(),
        }
    }
}

impl ArtifactsConfig {
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.catalog)
    }

    #[must_use]
    pub fn mi_matrix_path(&self) -> PathBuf {
        self.resolve(&self.mi_matrix)
    }

    #[must_use]
    pub fn embeddings_path(&self) -> PathBuf {
        self.resolve(&self.embeddings)
    }

    #[must_use]
    pub fn classifier_path(&self) -> PathBuf {
        self.resolve(&self.classifier)
    }

    fn resolve(&self, file: &str) -> PathBuf {
        let path = PathBuf::from(file);
        if path.is_absolute() {
            path
        } else {
            PathBuf::from(&self.dir).join(path)
        }
    }
}
