//! # elicit-core
//!
//! Core types and error kinds shared across all elicit crates.
//!
//! This crate provides the foundational types for the elicitation engine:
//! - Symptom identifiers and catalog entries
//! - Evidence state (per-symptom confidence weights) and the asked set
//! - Error kinds reported to callers of the turn API
//! - Request/response shapes for the `initial` and `next` turns

pub mod errors;
pub mod evidence;
pub mod responses;
pub mod symptom;

pub use errors::{CoreError, ErrorKind, ErrorResponse};
pub use evidence::{AskedSet, EvidenceState};
pub use symptom::{Symptom, SymptomId};
