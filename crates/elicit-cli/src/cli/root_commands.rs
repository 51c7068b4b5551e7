use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use elicit_core::SymptomId;

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Match a free-text description onto candidate symptoms.
    Initial(InitialArgs),
    /// Choose the next question from confirmed evidence, or finish with a diagnosis.
    Next(NextArgs),
    /// Predict a disease from an explicit list of confirmed symptoms.
    Predict(PredictArgs),
    /// Show the scored candidate ranking behind the next decision.
    Explain(ExplainArgs),
    /// Interactive questioning session on the terminal.
    Chat,
    /// Print the effective configuration.
    Config,
    /// Print the JSON Schema of a request or response type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitialArgs {
    /// Symptom description (words are joined with spaces).
    #[arg(required = true, num_args = 1..)]
    pub words: Vec<String>,
}

impl InitialArgs {
    #[must_use]
    pub fn text(&self) -> String {
        self.words.join(" ")
    }
}

/// Evidence and asked set for one turn, inline or from a JSON request file.
#[derive(Clone, Debug, Args)]
pub struct TurnArgs {
    /// Answered symptom as `id=weight`, weight in [0, 1]. Repeatable.
    #[arg(long, value_parser = parse_evidence)]
    pub evidence: Vec<(SymptomId, f64)>,

    /// Symptom already asked about. Repeatable.
    #[arg(long)]
    pub asked: Vec<String>,

    /// JSON `{"evidence": {...}, "asked": [...]}` file, or `-` for stdin.
    #[arg(long, conflicts_with_all = ["evidence", "asked"])]
    pub request: Option<PathBuf>,
}

#[derive(Clone, Debug, Args)]
pub struct NextArgs {
    #[command(flatten)]
    pub turn: TurnArgs,
}

#[derive(Clone, Debug, Args)]
pub struct ExplainArgs {
    #[command(flatten)]
    pub turn: TurnArgs,

    /// Number of ranked candidates to show.
    #[arg(long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(Clone, Debug, Args)]
pub struct PredictArgs {
    /// Confirmed symptom ids.
    #[arg(required = true, num_args = 1..)]
    pub symptoms: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type to describe.
    #[arg(value_enum)]
    pub type_name: SchemaType,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SchemaType {
    InitialRequest,
    InitialResponse,
    NextRequest,
    NextResponse,
    PredictionResponse,
    ExplainResponse,
    ErrorResponse,
}

fn parse_evidence(raw: &str) -> Result<(SymptomId, f64), String> {
    let (id, weight) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected id=weight, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing symptom id in '{raw}'"));
    }
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight in '{raw}'"))?;
    Ok((SymptomId::from(id), weight))
}
