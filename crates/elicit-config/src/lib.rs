//! # elicit-config
//!
//! Layered configuration loading for elicit using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`ELICIT_*` prefix, `__` as separator)
//! 2. Project-level `.elicit/config.toml`
//! 3. User-level `~/.config/elicit/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `ELICIT_SELECTOR__THRESHOLD` -> `selector.threshold`,
//! `ELICIT_ARTIFACTS__DIR` -> `artifacts.dir`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use elicit_config::ElicitConfig;
//!
//! let config = ElicitConfig::load_with_dotenv().expect("config");
//! println!("asking at most {} questions", config.selector.max_questions);
//! ```

mod artifacts;
mod embeddings;
mod error;
mod matcher;
mod selector;

pub use artifacts::ArtifactsConfig;
pub use embeddings::EmbeddingsConfig;
pub use error::ConfigError;
pub use matcher::MatcherConfig;
pub use selector::SelectorConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ElicitConfig {
    #[serde(default)]
    pub matcher: MatcherConfig,
    #[serde(default)]
    pub selector: SelectorConfig,
    #[serde(default)]
    pub embeddings: EmbeddingsConfig,
    #[serde(default)]
    pub artifacts: ArtifactsConfig,
}

impl ElicitConfig {
    /// Load and validate configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need `.env` file loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source fails to parse, or
    /// [`ConfigError::InvalidValue`] if a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".elicit/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed("ELICIT_").split("__"))
    }

    /// Reject values the engine cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.matcher.validate()?;
        self.selector.validate()?;
        if self.embeddings.model.trim().is_empty() {
            return Err(ConfigError::invalid("embeddings.model", "must not be empty"));
        }
        Ok(())
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("elicit").join("config.toml"))
    }

    /// Load `.env` from the current directory. Silently does nothing if absent.
    fn load_dotenv() {
        let _ = dotenvy::dotenv();
    }
}
