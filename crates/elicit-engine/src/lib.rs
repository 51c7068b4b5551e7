//! # elicit-engine
//!
//! The interactive elicitation core:
//!
//! - [`normalize`]: lowercase, punctuation and stopword stripping
//! - [`catalog`] / [`index`]: the symptom vocabulary and its description embeddings
//! - [`matcher`]: keyword + semantic matching of free text onto the vocabulary
//! - [`mi`] / [`selector`]: greedy next-question choice over a mutual-information matrix
//! - [`classifier`] / [`forest`]: final disease prediction from confirmed symptoms
//! - [`artifacts`]: reading the catalog, matrix, embedding cache and classifier from disk
//! - [`session`]: the `initial` / `next` turn protocol
//!
//! Everything hangs off an immutable [`EngineContext`] built once at startup
//! and shared behind `Arc`.

pub mod artifacts;
pub mod catalog;
pub mod classifier;
pub mod context;
pub mod error;
pub mod forest;
pub mod index;
pub mod matcher;
pub mod mi;
pub mod normalize;
pub mod selector;
pub mod session;

pub use catalog::SymptomCatalog;
pub use classifier::{DiagnosisClassifier, DiagnosisModel};
pub use context::{EngineContext, EngineSettings, SharedContext};
pub use error::EngineError;
pub use index::EmbeddingIndex;
pub use matcher::SymptomMatcher;
pub use mi::MutualInformationMatrix;
pub use selector::{InformationGainSelector, Selection};
pub use session::ElicitationSession;
