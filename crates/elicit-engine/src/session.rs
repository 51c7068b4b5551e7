//! The `initial` / `next` turn protocol.
//!
//! Sessions hold no state of their own: the caller carries the evidence and
//! the asked set between turns and resends them in full.

use std::collections::{BTreeMap, BTreeSet};

use elicit_core::responses::{
    ExplainResponse, InitialResponse, NextResponse, PredictionResponse, SessionState,
    TerminationReason,
};
use elicit_core::{AskedSet, EvidenceState, SymptomId};

use crate::context::EngineContext;
use crate::error::EngineError;
use crate::selector::Selection;

pub const SHORT_TEXT_MESSAGE: &str =
    "Please describe what symptoms you're facing (e.g., fatigue, nausea).";
pub const CANDIDATES_FOUND_MESSAGE: &str =
    "I found some possible symptoms. Please rate how strongly you experience each one.";
pub const NO_CANDIDATES_MESSAGE: &str =
    "No symptoms found. Please describe your symptoms differently.";
pub const NO_EVIDENCE_MESSAGE: &str = "No symptoms were confirmed.";
pub const FINISHED_MESSAGE: &str = "No further symptoms detected with high relevance.";
pub const NO_DESCRIPTION: &str = "No description available.";

/// How many diagnoses [`ElicitationSession::predict`] ranks.
const RANKED_DIAGNOSES: usize = 5;

/// Drives one conversation turn against a shared [`EngineContext`].
#[derive(Debug, Clone, Copy)]
pub struct ElicitationSession<'a> {
    ctx: &'a EngineContext,
}

impl<'a> ElicitationSession<'a> {
    #[must_use]
    pub const fn new(ctx: &'a EngineContext) -> Self {
        Self { ctx }
    }

    /// Map the user's opening description onto candidate symptoms.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] for text shorter than the configured
    /// minimum (the matcher is not consulted), and
    /// [`EngineError::DependencyUnavailable`] if embedding fails.
    pub fn initial(&self, text: &str) -> Result<InitialResponse, EngineError> {
        let settings = self.ctx.settings();
        if text.trim().chars().count() < settings.min_text_chars {
            return Err(EngineError::Validation(SHORT_TEXT_MESSAGE.to_string()));
        }

        let candidates = self.ctx.matcher().match_symptoms(text, settings.top_k)?;
        let descriptions: BTreeMap<SymptomId, String> = candidates
            .iter()
            .map(|id| (id.clone(), self.describe(id)))
            .collect();

        tracing::debug!(candidates = candidates.len(), "initial turn");
        let (state, message) = if candidates.is_empty() {
            (SessionState::AwaitingInitialText, NO_CANDIDATES_MESSAGE)
        } else {
            (
                SessionState::AwaitingSymptomConfirmation,
                CANDIDATES_FOUND_MESSAGE,
            )
        };

        Ok(InitialResponse {
            state,
            candidates,
            descriptions,
            message: message.to_string(),
        })
    }

    /// Ask the next most informative question, or finish with a prediction.
    ///
    /// # Errors
    ///
    /// Returns a validation error for out-of-range evidence weights, and
    /// propagates classifier failures on termination.
    pub fn next(
        &self,
        evidence: &EvidenceState,
        asked: &AskedSet,
    ) -> Result<NextResponse, EngineError> {
        evidence.validate()?;

        let selection = self.ctx.selector().select_next(evidence, asked);
        tracing::debug!(
            evidence = evidence.len(),
            asked = asked.len(),
            terminal = selection.is_terminal(),
            "next turn"
        );

        match selection {
            Selection::Next { symptom, score } => Ok(NextResponse {
                state: SessionState::AwaitingSymptomConfirmation,
                score: Some(round3(score)),
                description: Some(self.describe(&symptom)),
                message: format!(
                    "Do you experience '{}'? Use the slider to let me know how strongly you're feeling it.",
                    symptom.phrase()
                ),
                next_symptom: Some(symptom),
                termination: None,
                predicted_disease: None,
            }),
            Selection::Terminate(reason) => self.terminate(evidence, reason),
        }
    }

    /// Classify an explicit set of confirmed symptoms.
    ///
    /// Ids the classifier has no feature for are reported in `ignored`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Validation`] if `confirmed` is empty, and
    /// propagates classifier failures.
    pub fn predict(
        &self,
        confirmed: &BTreeSet<SymptomId>,
    ) -> Result<PredictionResponse, EngineError> {
        if confirmed.is_empty() {
            return Err(EngineError::Validation(NO_EVIDENCE_MESSAGE.to_string()));
        }

        let classifier = self.ctx.classifier();
        let (known, ignored): (Vec<SymptomId>, Vec<SymptomId>) = confirmed
            .iter()
            .cloned()
            .partition(|id| classifier.knows(id.as_str()));
        for id in &ignored {
            tracing::warn!(symptom = %id, "classifier has no feature for symptom; ignoring");
        }

        let ranked = classifier.predict_ranked(confirmed, RANKED_DIAGNOSES)?;
        let predicted_disease = ranked
            .first()
            .map(|top| top.label.clone())
            .ok_or_else(|| EngineError::ModelUnavailable("model returned no classes".into()))?;

        Ok(PredictionResponse {
            confirmed: known,
            ignored,
            predicted_disease,
            ranked,
        })
    }

    /// The decision [`Self::next`] would make, plus the scored candidate ranking
    /// behind it.
    ///
    /// # Errors
    ///
    /// Same as [`Self::next`].
    pub fn explain(
        &self,
        evidence: &EvidenceState,
        asked: &AskedSet,
        limit: usize,
    ) -> Result<ExplainResponse, EngineError> {
        let decision = self.next(evidence, asked)?;
        let selector = self.ctx.selector();
        let settings = selector.settings();

        Ok(ExplainResponse {
            confirmed: evidence.confirmed_ids().into_iter().collect(),
            asked: asked.len(),
            max_questions: settings.max_questions,
            threshold: settings.threshold,
            ranking: selector.rank_candidates(evidence, asked, limit),
            decision,
        })
    }

    fn terminate(
        &self,
        evidence: &EvidenceState,
        reason: TerminationReason,
    ) -> Result<NextResponse, EngineError> {
        let (predicted_disease, message) = if reason == TerminationReason::EmptyEvidence {
            (None, NO_EVIDENCE_MESSAGE)
        } else {
            let label = self.ctx.classifier().predict(&evidence.confirmed_ids())?;
            tracing::info!(?reason, %label, "session terminated");
            (Some(label), FINISHED_MESSAGE)
        };

        Ok(NextResponse {
            state: SessionState::Terminated,
            next_symptom: None,
            score: None,
            description: None,
            termination: Some(reason),
            predicted_disease,
            message: message.to_string(),
        })
    }

    fn describe(&self, id: &SymptomId) -> String {
        self.ctx
            .catalog()
            .description(id.as_str())
            .unwrap_or(NO_DESCRIPTION)
            .to_string()
    }
}

/// Round to three decimals for display.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
