//! Embedding backend configuration.

use serde::{Deserialize, Serialize};

fn default_model() -> String {
    "all-mpnet-base-v2".to_string()
}

const fn default_show_download_progress() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmbeddingsConfig {
    /// Sentence encoder name (see `elicit-embeddings` for the supported set).
    #[serde(default = "default_model")]
    pub model: String,

    /// Model download cache. Empty means `~/.elicit/cache/fastembed`.
    #[serde(default)]
    pub cache_dir: String,

    #[serde(default = "default_show_download_progress")]
    pub show_download_progress: bool,
}

impl Default for EmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            cache_dir: String::new(),
            show_download_progress: default_show_download_progress(),
        }
    }
}

impl EmbeddingsConfig {
    #[must_use]
    pub fn has_cache_dir(&self) -> bool {
        !self.cache_dir.is_empty()
    }
}
