//! Request and response shapes for the caller-facing turn protocol.
//!
//! The protocol is transport-agnostic: `initial {text}` returns candidate
//! symptoms, `next {evidence, asked}` returns either the next question or a
//! termination with a predicted disease. The caller resends the full
//! evidence and asked set on every turn.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::evidence::{AskedSet, EvidenceState};
use crate::symptom::SymptomId;

/// Where the caller is in the elicitation protocol after a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    AwaitingInitialText,
    AwaitingSymptomConfirmation,
    Terminated,
}

/// Why the selector stopped asking questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    /// No symptom has a positive weight.
    EmptyEvidence,
    /// Every known symptom has been asked or answered.
    EmptyCandidatePool,
    /// The best candidate scored below the configured threshold.
    BelowThreshold,
    /// More questions were asked than the configured maximum.
    MaxQuestionsReached,
}

/// How a candidate symptom was found in free text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Keyword,
    Semantic,
    Both,
}

/// A matched symptom with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MatchCandidate {
    pub id: SymptomId,
    pub source: MatchSource,
    /// Cosine similarity between the text and the symptom description, if
    /// the semantic pass ranked it.
    pub similarity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InitialRequest {
    pub text: String,
}

/// Response to `initial`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct InitialResponse {
    pub state: SessionState,
    pub candidates: Vec<SymptomId>,
    pub descriptions: BTreeMap<SymptomId, String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NextRequest {
    #[serde(default)]
    pub evidence: EvidenceState,
    #[serde(default)]
    pub asked: AskedSet,
}

/// Response to `next`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NextResponse {
    pub state: SessionState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_symptom: Option<SymptomId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination: Option<TerminationReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_disease: Option<String>,
    pub message: String,
}

/// A disease label with the model's probability for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RankedDiagnosis {
    pub label: String,
    pub probability: f64,
}

/// Response to a direct prediction over a confirmed symptom set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PredictionResponse {
    pub confirmed: Vec<SymptomId>,
    /// Confirmed symptoms the model has no feature for.
    pub ignored: Vec<SymptomId>,
    pub predicted_disease: String,
    pub ranked: Vec<RankedDiagnosis>,
}

/// One scored candidate from the selector's ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoredCandidate {
    pub id: SymptomId,
    pub score: f64,
}

/// Diagnostic view of one selector step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ExplainResponse {
    pub confirmed: Vec<SymptomId>,
    pub asked: usize,
    pub max_questions: usize,
    pub threshold: f64,
    pub ranking: Vec<ScoredCandidate>,
    pub decision: NextResponse,
}
