use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use elicit_core::responses::NextRequest;
use elicit_core::{AskedSet, EvidenceState};
use elicit_engine::{EngineContext, EngineError};

use crate::cli::root_commands::TurnArgs;

/// Run a synchronous engine call on the blocking pool.
pub async fn run_engine<T, F>(ctx: &Arc<EngineContext>, call: F) -> anyhow::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&EngineContext) -> Result<T, EngineError> + Send + 'static,
{
    let ctx = Arc::clone(ctx);
    let value = tokio::task::spawn_blocking(move || call(&ctx))
        .await
        .context("engine task panicked")??;
    Ok(value)
}

/// Build the turn request from `--request` or the inline flags.
pub fn read_turn(args: &TurnArgs) -> anyhow::Result<NextRequest> {
    if let Some(path) = &args.request {
        let raw = if path.as_os_str() == "-" {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("failed to read request from stdin")?;
            raw
        } else {
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request {}", path.display()))?
        };
        return serde_json::from_str(&raw).context("invalid turn request JSON");
    }

    let evidence = EvidenceState::from_weights(args.evidence.iter().cloned())
        .map_err(EngineError::from)?;
    let asked: AskedSet = args.asked.iter().map(String::as_str).collect();
    Ok(NextRequest { evidence, asked })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use elicit_core::{ErrorKind, SymptomId};
    use elicit_engine::EngineError;

    use super::read_turn;
    use crate::cli::root_commands::TurnArgs;

    fn inline(evidence: &[(&str, f64)], asked: &[&str]) -> TurnArgs {
        TurnArgs {
            evidence: evidence
                .iter()
                .map(|(id, weight)| (SymptomId::from(*id), *weight))
                .collect(),
            asked: asked.iter().map(ToString::to_string).collect(),
            request: None,
        }
    }

    #[test]
    fn inline_flags_build_request() {
        let request = read_turn(&inline(&[("fatigue", 1.0)], &["nausea"])).expect("should build");
        assert_eq!(request.evidence.weight("fatigue"), Some(1.0));
        assert!(request.asked.contains("nausea"));
    }

    #[test]
    fn out_of_range_weight_is_an_engine_validation_error() {
        let err = read_turn(&inline(&[("fatigue", 1.5)], &[])).expect_err("should fail");
        let engine = err.downcast_ref::<EngineError>().expect("engine error");
        assert_eq!(engine.kind(), ErrorKind::Validation);
    }

    #[test]
    fn request_file_is_parsed() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("turn.json");
        let mut file = std::fs::File::create(&path).expect("create");
        write!(file, r#"{{"evidence": {{"fatigue": 1.0}}, "asked": ["high_fever"]}}"#)
            .expect("write");

        let args = TurnArgs {
            evidence: Vec::new(),
            asked: Vec::new(),
            request: Some(path),
        };
        let request = read_turn(&args).expect("should parse");
        assert_eq!(request.evidence.len(), 1);
        assert!(request.asked.contains("high_fever"));
    }
}
