//! Next-question selection configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_threshold() -> f64 {
    0.001
}

const fn default_max_questions() -> usize {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SelectorConfig {
    /// Candidates scoring below this stop the questioning.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Questioning stops once more than this many symptoms have been asked.
    #[serde(default = "default_max_questions")]
    pub max_questions: usize,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            max_questions: default_max_questions(),
        }
    }
}

impl SelectorConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(ConfigError::invalid(
                "selector.threshold",
                format!("must be a finite non-negative number, got {}", self.threshold),
            ));
        }
        Ok(())
    }
}
