mod common;

use std::collections::HashSet;
use std::sync::Arc;

use elicit_core::SymptomId;
use elicit_core::responses::MatchSource;
use elicit_engine::{EngineError, EngineSettings};
use pretty_assertions::assert_eq;
use rstest::rstest;

use common::{FailingEmbedder, context, context_with};

fn ids(values: &[SymptomId]) -> Vec<&str> {
    values.iter().map(SymptomId::as_str).collect()
}

#[test]
fn keyword_hits_come_first_in_catalog_order() {
    let ctx = context();
    let matched = ctx
        .matcher()
        .match_symptoms("I have a terrible headache and a high fever!", 2)
        .unwrap();
    assert_eq!(ids(&matched), vec!["fever", "headache"]);
}

#[test]
fn semantic_pass_finds_paraphrases() {
    let ctx = context();
    let matched = ctx
        .matcher()
        .match_symptoms("My stomach makes me want to vomit", 1)
        .unwrap();
    assert_eq!(ids(&matched), vec!["nausea"]);
}

#[test]
fn semantic_fills_remaining_slots_without_duplicates() {
    let ctx = context();
    let matched = ctx
        .matcher()
        .match_scored("fever, and my head is in pain", 3)
        .unwrap();

    assert_eq!(matched[0].id.as_str(), "fever");
    assert_eq!(matched[0].source, MatchSource::Keyword);
    assert_eq!(matched[1].id.as_str(), "headache");
    assert_eq!(matched[1].source, MatchSource::Semantic);
    assert!(matched[1].similarity.unwrap() > 0.9);
    assert_eq!(matched.len(), 3);

    let unique: HashSet<_> = matched.iter().map(|c| &c.id).collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn keyword_and_semantic_hit_is_tagged_both() {
    let ctx = context();
    let matched = ctx.matcher().match_scored("headache, pain in head", 1).unwrap();
    assert_eq!(matched[0].id.as_str(), "headache");
    assert_eq!(matched[0].source, MatchSource::Both);
}

#[rstest]
#[case("I feel exhausted all the time", 1)]
#[case("I feel exhausted all the time", 3)]
#[case("fever chills nausea headache fatigue", 2)]
#[case("my stomach hurts and I feel hot", 10)]
fn never_exceeds_top_k_or_leaves_catalog(#[case] text: &str, #[case] top_k: usize) {
    let ctx = context();
    let matched = ctx.matcher().match_symptoms(text, top_k).unwrap();
    assert!(matched.len() <= top_k);
    assert!(matched.iter().all(|id| ctx.catalog().contains(id.as_str())));
}

#[test]
fn is_deterministic() {
    let ctx = context();
    let text = "Feeling cold, shivering and tired";
    let first = ctx.matcher().match_symptoms(text, 3).unwrap();
    for _ in 0..5 {
        assert_eq!(ctx.matcher().match_symptoms(text, 3).unwrap(), first);
    }
}

#[test]
fn stopword_only_text_matches_nothing() {
    let ctx = context();
    assert!(ctx.matcher().match_symptoms("and then I was there", 5).unwrap().is_empty());
}

#[test]
fn stopword_only_text_never_reaches_the_encoder() {
    let ctx = context_with(Arc::new(FailingEmbedder), EngineSettings::default());
    let matches = ctx.matcher().match_symptoms("and then I was there", 5).unwrap();
    assert!(matches.is_empty());
}

#[test]
fn zero_top_k_is_rejected() {
    let ctx = context();
    let err = ctx.matcher().match_symptoms("fever", 0).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn backend_failure_is_not_hidden_behind_keyword_results() {
    let ctx = context_with(Arc::new(FailingEmbedder), EngineSettings::default());
    let err = ctx.matcher().match_symptoms("high fever", 5).unwrap_err();
    assert!(matches!(err, EngineError::DependencyUnavailable(_)));
}
