//! Greedy next-question selection over the mutual-information matrix.
//!
//! Each unasked symptom `c` is scored against the confirmed evidence as a
//! weighted average:
//!
//! ```text
//! score(c) = Σ w(s) · MI(s, c) / Σ w(s)      over confirmed s (w(s) > 0)
//! ```
//!
//! With every weight at `1.0` this is the plain mean of `MI(s, c)`. The
//! highest score wins; ties go to the candidate that comes first in matrix
//! order. Questioning stops when nothing is confirmed, nothing is left to
//! ask, more than `max_questions` were asked, or the best score falls below
//! `threshold`.

use elicit_config::SelectorConfig;
use elicit_core::responses::{ScoredCandidate, TerminationReason};
use elicit_core::{AskedSet, EvidenceState, SymptomId};

use crate::mi::MutualInformationMatrix;

/// Outcome of one selection step.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Next { symptom: SymptomId, score: f64 },
    Terminate(TerminationReason),
}

impl Selection {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminate(_))
    }
}

/// Stopping rule parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectorSettings {
    pub threshold: f64,
    pub max_questions: usize,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self::from(&SelectorConfig::default())
    }
}

impl From<&SelectorConfig> for SelectorSettings {
    fn from(config: &SelectorConfig) -> Self {
        Self {
            threshold: config.threshold,
            max_questions: config.max_questions,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct InformationGainSelector<'a> {
    matrix: &'a MutualInformationMatrix,
    settings: SelectorSettings,
}

impl<'a> InformationGainSelector<'a> {
    #[must_use]
    pub const fn new(matrix: &'a MutualInformationMatrix, settings: SelectorSettings) -> Self {
        Self { matrix, settings }
    }

    #[must_use]
    pub const fn settings(&self) -> SelectorSettings {
        self.settings
    }

    /// Pick the most informative symptom to ask about next, or stop.
    #[must_use]
    pub fn select_next(&self, evidence: &EvidenceState, asked: &AskedSet) -> Selection {
        let confirmed = self.confirmed(evidence);
        if confirmed.is_empty() {
            tracing::debug!("no confirmed evidence; terminating");
            return Selection::Terminate(TerminationReason::EmptyEvidence);
        }
        if asked.len() > self.settings.max_questions {
            tracing::debug!(
                asked = asked.len(),
                max = self.settings.max_questions,
                "question budget exhausted"
            );
            return Selection::Terminate(TerminationReason::MaxQuestionsReached);
        }

        let mut best: Option<(&SymptomId, f64)> = None;
        for candidate in self.candidates(evidence, asked) {
            let score = self.score(&confirmed, candidate);
            // Strict comparison keeps the earliest candidate on ties.
            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((candidate, score));
            }
        }

        let Some((symptom, score)) = best else {
            tracing::debug!("every known symptom already asked; terminating");
            return Selection::Terminate(TerminationReason::EmptyCandidatePool);
        };

        if score < self.settings.threshold {
            tracing::debug!(%symptom, score, threshold = self.settings.threshold, "best candidate below threshold");
            return Selection::Terminate(TerminationReason::BelowThreshold);
        }

        tracing::debug!(%symptom, score, "selected next symptom");
        Selection::Next {
            symptom: symptom.clone(),
            score,
        }
    }

    /// Every remaining candidate with its score, best first, at most `limit`.
    ///
    /// Ignores the stopping rule; useful for explaining a decision.
    #[must_use]
    pub fn rank_candidates(
        &self,
        evidence: &EvidenceState,
        asked: &AskedSet,
        limit: usize,
    ) -> Vec<ScoredCandidate> {
        let confirmed = self.confirmed(evidence);
        if confirmed.is_empty() {
            return Vec::new();
        }

        let mut ranking: Vec<ScoredCandidate> = self
            .candidates(evidence, asked)
            .map(|candidate| ScoredCandidate {
                id: candidate.clone(),
                score: self.score(&confirmed, candidate),
            })
            .collect();
        ranking.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranking.truncate(limit);
        ranking
    }

    /// Confirmed `(id, weight)` pairs the matrix knows about.
    fn confirmed<'e>(&self, evidence: &'e EvidenceState) -> Vec<(&'e SymptomId, f64)> {
        evidence
            .confirmed()
            .filter(|(id, _)| {
                let known = self.matrix.contains(id.as_str());
                if !known {
                    tracing::warn!(symptom = %id, "ignoring evidence for unknown symptom");
                }
                known
            })
            .collect()
    }

    /// Matrix ids that were neither asked nor already answered.
    fn candidates<'s>(
        &'s self,
        evidence: &'s EvidenceState,
        asked: &'s AskedSet,
    ) -> impl Iterator<Item = &'a SymptomId> + 's {
        self.matrix
            .ids()
            .iter()
            .filter(move |id| !asked.contains(id.as_str()) && !evidence.contains(id.as_str()))
    }

    fn score(&self, confirmed: &[(&SymptomId, f64)], candidate: &SymptomId) -> f64 {
        let (weighted, total_weight) =
            confirmed
                .iter()
                .fold((0.0, 0.0), |(weighted, total), (id, weight)| {
                    let mi = self
                        .matrix
                        .get(id.as_str(), candidate.as_str())
                        .unwrap_or(0.0);
                    (weighted + weight * mi, total + weight)
                });
        if total_weight > 0.0 {
            weighted / total_weight
        } else {
            0.0
        }
    }
}
