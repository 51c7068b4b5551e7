//! Reading the pre-built artifacts from disk.
//!
//! - catalog: JSON object `{"symptom_id": "description", ...}`, file order kept
//! - mutual information: CSV with a header row of column ids and the row id
//!   in the first column (the layout `pandas.DataFrame.to_csv` writes)
//! - embeddings: JSON cache of description vectors, tagged with the encoder
//!   that produced them; rebuilt when missing, stale or incomplete
//! - classifier: [`ForestArtifact`] JSON

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::{Path, PathBuf};

use elicit_core::{Symptom, SymptomId};
use elicit_embeddings::Embedder;
use serde::{Deserialize, Serialize};

use crate::catalog::SymptomCatalog;
use crate::error::EngineError;
use crate::forest::{ForestArtifact, RandomForestModel};
use crate::index::EmbeddingIndex;
use crate::mi::MutualInformationMatrix;

/// Failures reading or parsing an artifact file.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("invalid artifact {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl ArtifactError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.to_path_buf(),
            source,
        }
    }

    fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }
}

/// Load the symptom catalog, keeping the file's key order.
///
/// # Errors
///
/// Returns [`ArtifactError`] for unreadable or malformed files, and
/// [`EngineError::ArtifactMismatch`] for an empty catalog.
pub fn load_catalog(path: &Path) -> Result<SymptomCatalog, EngineError> {
    let raw: serde_json::Map<String, serde_json::Value> = read_json(path)?;
    let mut symptoms = Vec::with_capacity(raw.len());
    for (id, value) in raw {
        let Some(description) = value.as_str() else {
            return Err(ArtifactError::invalid(
                path,
                format!("description of '{id}' is not a string"),
            )
            .into());
        };
        symptoms.push(Symptom::new(id, description));
    }
    let catalog = SymptomCatalog::new(symptoms)?;
    tracing::info!(symptoms = catalog.len(), path = %path.display(), "loaded symptom catalog");
    Ok(catalog)
}

/// Load the mutual-information matrix from CSV.
///
/// # Errors
///
/// Returns [`ArtifactError`] for unreadable or malformed files and
/// [`EngineError::ArtifactMismatch`] if the table is not square.
pub fn load_mi_matrix(path: &Path) -> Result<MutualInformationMatrix, EngineError> {
    let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
    let matrix = read_mi_matrix(file, path)?;
    tracing::info!(symptoms = matrix.len(), path = %path.display(), "loaded mutual-information matrix");
    Ok(matrix)
}

/// Parse a mutual-information CSV from any reader. `origin` names the source in errors.
///
/// # Errors
///
/// Same as [`load_mi_matrix`].
pub fn read_mi_matrix<R: Read>(
    reader: R,
    origin: &Path,
) -> Result<MutualInformationMatrix, EngineError> {
    let csv_err = |source: csv::Error| ArtifactError::Csv {
        path: origin.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(csv_err)?.clone();
    let column_ids: Vec<SymptomId> = headers.iter().skip(1).map(SymptomId::from).collect();

    let mut row_ids = Vec::new();
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(csv_err)?;
        let mut cells = record.iter();
        let Some(id) = cells.next() else {
            continue;
        };
        let values = cells
            .map(|cell| {
                cell.parse::<f64>().map_err(|_| {
                    ArtifactError::invalid(
                        origin,
                        format!("row {} ('{id}'): '{cell}' is not a number", line + 1),
                    )
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        row_ids.push(SymptomId::from(id));
        rows.push(values);
    }

    MutualInformationMatrix::with_columns(row_ids, column_ids, rows)
}

/// Load and validate the exported random forest.
///
/// # Errors
///
/// Returns [`ArtifactError`] for unreadable or malformed files and
/// [`EngineError::ModelUnavailable`] for a structurally invalid forest.
pub fn load_forest(path: &Path) -> Result<RandomForestModel, EngineError> {
    let artifact: ForestArtifact = read_json(path)?;
    let model = RandomForestModel::new(artifact)?;
    tracing::info!(trees = model.tree_count(), path = %path.display(), "loaded classifier");
    Ok(model)
}

/// One cached vector and the description it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEmbedding {
    pub description: String,
    pub vector: Vec<f32>,
}

/// Cached description embeddings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingCache {
    pub model: String,
    pub dimension: usize,
    pub entries: BTreeMap<SymptomId, CachedEmbedding>,
}

impl EmbeddingCache {
    #[must_use]
    pub fn from_index(catalog: &SymptomCatalog, index: &EmbeddingIndex) -> Self {
        let entries = catalog
            .iter()
            .enumerate()
            .filter_map(|(position, symptom)| {
                index.vector(position).map(|vector| {
                    let entry = CachedEmbedding {
                        description: symptom.description.clone(),
                        vector: vector.to_vec(),
                    };
                    (symptom.id.clone(), entry)
                })
            })
            .collect();
        Self {
            model: index.model().to_string(),
            dimension: index.dimension(),
            entries,
        }
    }

    /// Vectors in catalog order, or `None` if the cache does not fit this
    /// catalog and encoder.
    ///
    /// An entry whose description no longer matches the catalog text counts
    /// as missing.
    #[must_use]
    pub fn aligned(&self, catalog: &SymptomCatalog, embedder: &dyn Embedder) -> Option<Vec<Vec<f32>>> {
        if self.model != embedder.model_name() || self.dimension != embedder.dimension() {
            return None;
        }
        catalog
            .iter()
            .map(|symptom| {
                self.entries
                    .get(&symptom.id)
                    .filter(|entry| {
                        entry.description == symptom.description
                            && entry.vector.len() == self.dimension
                    })
                    .map(|entry| entry.vector.clone())
            })
            .collect()
    }
}

/// Use cached embeddings when they match the catalog and encoder, otherwise
/// embed every description and rewrite the cache.
///
/// A cache that cannot be written is logged and skipped.
///
/// # Errors
///
/// Returns [`EngineError::DependencyUnavailable`] if embedding fails.
pub fn load_or_build_index(
    path: &Path,
    catalog: &SymptomCatalog,
    embedder: &dyn Embedder,
) -> Result<EmbeddingIndex, EngineError> {
    if path.exists() {
        match read_json::<EmbeddingCache>(path) {
            Ok(cache) => {
                if let Some(vectors) = cache.aligned(catalog, embedder) {
                    tracing::info!(path = %path.display(), "using cached symptom embeddings");
                    return EmbeddingIndex::from_vectors(
                        catalog,
                        embedder.model_name(),
                        embedder.dimension(),
                        vectors,
                    );
                }
                tracing::warn!(
                    path = %path.display(),
                    cached_model = %cache.model,
                    model = embedder.model_name(),
                    "embedding cache is stale; rebuilding"
                );
            }
            Err(error) => {
                tracing::warn!(%error, "embedding cache unreadable; rebuilding");
            }
        }
    }

    let index = EmbeddingIndex::build(catalog, embedder)?;
    if let Err(error) = write_cache(path, &EmbeddingCache::from_index(catalog, &index)) {
        tracing::warn!(%error, "failed to write embedding cache");
    }
    Ok(index)
}

fn write_cache(path: &Path, cache: &EmbeddingCache) -> Result<(), ArtifactError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| ArtifactError::io(parent, e))?;
    }
    let file = File::create(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_json::to_writer(BufWriter::new(file), cache).map_err(|e| ArtifactError::json(path, e))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let file = File::open(path).map_err(|e| ArtifactError::io(path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ArtifactError::json(path, e))
}
