//! Symptom identifiers and catalog entries.

use std::borrow::Borrow;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable symptom key made of underscore-separated tokens (e.g. `high_fever`).
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SymptomId(String);

impl SymptomId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier with separators replaced by spaces (`high_fever` -> `high fever`).
    ///
    /// This is the form matched against normalized user text.
    #[must_use]
    pub fn phrase(&self) -> String {
        self.0.replace('_', " ")
    }
}

impl fmt::Display for SymptomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SymptomId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SymptomId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for SymptomId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for SymptomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One catalog entry: identifier plus human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Symptom {
    pub id: SymptomId,
    pub description: String,
}

impl Symptom {
    pub fn new(id: impl Into<SymptomId>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}
