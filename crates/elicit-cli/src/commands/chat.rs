//! Interactive questioning on the terminal.
//!
//! The loop plays the caller's role in the turn protocol: it keeps the
//! evidence and asked set between turns and resends them on every `next`.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use elicit_core::responses::NextResponse;
use elicit_core::{AskedSet, EvidenceState, SymptomId};
use elicit_engine::session::SHORT_TEXT_MESSAGE;
use elicit_engine::{ElicitationSession, EngineContext, EngineError};

const WEIGHT_HELP: &str = "Please answer with a number between 0 and 1, or y/n.";

/// Handle `elicit chat`.
pub async fn handle(ctx: &Arc<EngineContext>) -> anyhow::Result<()> {
    let ctx = Arc::clone(ctx);
    tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        run_loop(&ctx, stdin.lock(), stdout.lock()).map(|_| ())
    })
    .await
    .context("chat task panicked")?
}

/// Drive one full conversation. Returns the terminating response, or `None`
/// if input ended first.
pub fn run_loop<R: BufRead, W: Write>(
    ctx: &EngineContext,
    mut input: R,
    mut out: W,
) -> anyhow::Result<Option<NextResponse>> {
    let session = ElicitationSession::new(ctx);
    writeln!(out, "Welcome to elicit. {SHORT_TEXT_MESSAGE}")?;

    let initial = loop {
        let Some(text) = prompt(&mut input, &mut out, "> ")? else {
            return Ok(None);
        };
        match session.initial(&text) {
            Ok(response) if response.candidates.is_empty() => {
                writeln!(out, "{}", response.message)?;
            }
            Ok(response) => break response,
            Err(EngineError::Validation(message)) => writeln!(out, "{message}")?,
            Err(error) => return Err(error.into()),
        }
    };

    writeln!(out, "{}", initial.message)?;
    let mut evidence = EvidenceState::new();
    let mut asked = AskedSet::new();

    for id in &initial.candidates {
        let description = initial
            .descriptions
            .get(id)
            .map_or("", String::as_str);
        writeln!(out, "- {} ({description})", id.phrase())?;
        let Some(answer) = read_answer(&mut input, &mut out)? else {
            return Ok(None);
        };
        answer.record(&mut evidence, id.clone())?;
    }

    loop {
        let response = session.next(&evidence, &asked)?;
        let Some(next) = response.next_symptom.clone() else {
            writeln!(out, "{}", response.message)?;
            if let Some(disease) = &response.predicted_disease {
                writeln!(out, "Predicted condition: {disease}")?;
            }
            return Ok(Some(response));
        };

        writeln!(out, "{}", response.message)?;
        if let Some(description) = &response.description {
            writeln!(out, "  ({description})")?;
        }
        let Some(answer) = read_answer(&mut input, &mut out)? else {
            return Ok(None);
        };
        answer.record(&mut evidence, next.clone())?;
        asked.insert(next);
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> anyhow::Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// One reply to a symptom question.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Answer {
    Yes,
    No,
    Strength(f64),
}

impl Answer {
    fn parse(answer: &str) -> Option<Self> {
        match answer.to_ascii_lowercase().as_str() {
            "" | "n" | "no" => Some(Self::No),
            "y" | "yes" => Some(Self::Yes),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|weight| (0.0..=1.0).contains(weight))
                .map(Self::Strength),
        }
    }

    fn record(self, evidence: &mut EvidenceState, id: SymptomId) -> Result<(), EngineError> {
        match self {
            Self::Yes => evidence.confirm(id),
            Self::No => evidence.deny(id),
            Self::Strength(weight) => evidence.insert(id, weight)?,
        }
        Ok(())
    }
}

fn read_answer<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> anyhow::Result<Option<Answer>> {
    loop {
        let Some(line) = prompt(input, out, "  strength [0-1, y/n]: ")? else {
            return Ok(None);
        };
        match Answer::parse(&line) {
            Some(answer) => return Ok(Some(answer)),
            None => writeln!(out, "{WEIGHT_HELP}")?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::sync::Arc;

    use elicit_core::responses::TerminationReason;
    use elicit_embeddings::{Embedder, EmbeddingError};
    use elicit_engine::forest::{ForestArtifact, RandomForestModel, TreeArrays};
    use elicit_engine::selector::SelectorSettings;
    use elicit_engine::{
        DiagnosisClassifier, EmbeddingIndex, EngineContext, EngineSettings,
        MutualInformationMatrix, SymptomCatalog,
    };

    use elicit_core::{EvidenceState, SymptomId};

    use super::{Answer, run_loop};

    /// Every text maps to the same vector, so only keyword hits are informative.
    struct ConstantEmbedder;

    impl Embedder for ConstantEmbedder {
        fn model_name(&self) -> &str {
            "constant"
        }

        fn dimension(&self) -> usize {
            2
        }

        fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }
    }

    fn context() -> EngineContext {
        let catalog = SymptomCatalog::from_pairs([
            ("fatigue", "Feeling of tiredness"),
            ("fever", "Body temperature above normal"),
            ("nausea", "Urge to vomit"),
        ])
        .expect("catalog");
        let index = EmbeddingIndex::from_vectors(&catalog, "constant", 2, vec![vec![1.0, 0.0]; 3])
            .expect("index");
        let matrix = MutualInformationMatrix::new(
            vec!["fatigue".into(), "fever".into(), "nausea".into()],
            vec![
                vec![1.0, 0.8, 0.01],
                vec![0.8, 1.0, 0.0],
                vec![0.01, 0.0, 1.0],
            ],
        )
        .expect("matrix");
        let forest = ForestArtifact {
            classes: vec!["Flu".into(), "Malaria".into()],
            feature_names: vec!["fatigue".into(), "fever".into(), "nausea".into()],
            trees: vec![TreeArrays {
                children_left: vec![1, -1, -1],
                children_right: vec![2, -1, -1],
                feature: vec![1, -2, -2],
                threshold: vec![0.5, -2.0, -2.0],
                value: vec![vec![1.0, 1.0], vec![1.0, 0.0], vec![0.0, 1.0]],
            }],
        };
        let classifier =
            DiagnosisClassifier::new(Box::new(RandomForestModel::new(forest).expect("forest")))
                .expect("classifier");
        let settings = EngineSettings {
            top_k: 1,
            min_text_chars: 5,
            selector: SelectorSettings::default(),
        };

        EngineContext::new(
            catalog,
            index,
            matrix,
            classifier,
            Arc::new(ConstantEmbedder),
            settings,
        )
        .expect("context")
    }

    fn transcript(lines: &[&str]) -> (Option<elicit_core::responses::NextResponse>, String) {
        let input = Cursor::new(lines.join("\n") + "\n");
        let mut out = Vec::new();
        let result = run_loop(&context(), input, &mut out).expect("chat should run");
        (result, String::from_utf8(out).expect("utf8"))
    }

    #[test]
    fn full_conversation_ends_with_prediction() {
        let (result, out) = transcript(&["hi", "I feel fatigue all day", "y", "0.9", "maybe", "n"]);

        let result = result.expect("conversation should finish");
        assert_eq!(result.termination, Some(TerminationReason::EmptyCandidatePool));
        assert_eq!(result.predicted_disease.as_deref(), Some("Malaria"));

        assert!(out.contains("Please describe what symptoms you're facing"));
        assert!(out.contains("- fatigue (Feeling of tiredness)"));
        assert!(out.contains("Do you experience 'fever'?"));
        assert!(out.contains("Do you experience 'nausea'?"));
        assert!(out.contains("Please answer with a number between 0 and 1, or y/n."));
        assert!(out.contains("Predicted condition: Malaria"));
    }

    #[test]
    fn end_of_input_stops_quietly() {
        let (result, out) = transcript(&["I feel fatigue all day"]);
        assert!(result.is_none());
        assert!(out.contains("- fatigue"));
    }

    #[test]
    fn answers_accept_numbers_and_yes_no() {
        assert_eq!(Answer::parse("y"), Some(Answer::Yes));
        assert_eq!(Answer::parse("No"), Some(Answer::No));
        assert_eq!(Answer::parse(""), Some(Answer::No));
        assert_eq!(Answer::parse("0.25"), Some(Answer::Strength(0.25)));
        assert_eq!(Answer::parse("1.5"), None);
        assert_eq!(Answer::parse("NaN"), None);
        assert_eq!(Answer::parse("often"), None);
    }

    #[test]
    fn yes_confirms_and_no_denies() {
        let mut evidence = EvidenceState::new();
        Answer::Yes.record(&mut evidence, "fever".into()).unwrap();
        Answer::No.record(&mut evidence, "nausea".into()).unwrap();
        Answer::Strength(0.4)
            .record(&mut evidence, "fatigue".into())
            .unwrap();

        assert_eq!(evidence.weight("fever"), Some(1.0));
        assert_eq!(evidence.weight("nausea"), Some(0.0));
        assert_eq!(evidence.weight("fatigue"), Some(0.4));
        let confirmed: Vec<_> = evidence.confirmed_ids().into_iter().collect();
        assert_eq!(confirmed, vec![SymptomId::from("fatigue"), SymptomId::from("fever")]);
    }
}
