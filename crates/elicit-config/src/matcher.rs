//! Free-text matching configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_top_k() -> usize {
    5
}

const fn default_min_text_chars() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatcherConfig {
    /// Maximum number of candidate symptoms returned for the initial text.
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Minimum trimmed length (in characters) of the initial description.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_text_chars: default_min_text_chars(),
        }
    }
}

impl MatcherConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.top_k == 0 {
            return Err(ConfigError::invalid("matcher.top_k", "must be at least 1"));
        }
        if self.min_text_chars == 0 {
            return Err(ConfigError::invalid(
                "matcher.min_text_chars",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}
