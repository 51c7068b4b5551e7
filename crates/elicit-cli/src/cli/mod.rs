use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `elicit` binary.
#[derive(Debug, Parser)]
#[command(
    name = "elicit",
    version,
    about = "Adaptive symptom questioning and diagnosis"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, raw, text
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress spinner)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Artifact directory (overrides `artifacts.dir` from config)
    #[arg(short, long, global = true)]
    pub artifacts: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            artifacts: self.artifacts.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["elicit", "--format", "text", "--verbose", "config"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Config));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["elicit", "config", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["elicit", "--format", "xml", "config"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn artifacts_override_is_a_path() {
        let cli = Cli::try_parse_from(["elicit", "--artifacts", "/srv/model", "config"])
            .expect("cli should parse");
        let flags = cli.global_flags();
        assert_eq!(
            flags.artifacts.as_deref(),
            Some(std::path::Path::new("/srv/model"))
        );
    }

    #[test]
    fn initial_joins_words() {
        let cli = Cli::try_parse_from(["elicit", "initial", "high", "fever", "and", "chills"])
            .expect("cli should parse");
        let Commands::Initial(args) = cli.command else {
            panic!("expected initial");
        };
        assert_eq!(args.text(), "high fever and chills");
    }

    #[test]
    fn next_collects_evidence_and_asked() {
        let cli = Cli::try_parse_from([
            "elicit",
            "next",
            "--evidence",
            "fatigue=1",
            "--evidence",
            "high_fever=0.5",
            "--asked",
            "nausea",
        ])
        .expect("cli should parse");
        let Commands::Next(args) = cli.command else {
            panic!("expected next");
        };
        assert_eq!(args.turn.evidence.len(), 2);
        assert_eq!(args.turn.evidence[1].0.as_str(), "high_fever");
        assert!((args.turn.evidence[1].1 - 0.5).abs() < f64::EPSILON);
        assert_eq!(args.turn.asked, vec!["nausea".to_string()]);
    }

    #[test]
    fn next_rejects_malformed_evidence() {
        let parsed = Cli::try_parse_from(["elicit", "next", "--evidence", "fatigue"]);
        assert!(parsed.is_err());

        let parsed = Cli::try_parse_from(["elicit", "next", "--evidence", "fatigue=lots"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn request_file_conflicts_with_inline_evidence() {
        let parsed = Cli::try_parse_from([
            "elicit",
            "next",
            "--request",
            "turn.json",
            "--evidence",
            "fatigue=1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn explain_limit_defaults_to_ten() {
        let cli = Cli::try_parse_from(["elicit", "explain", "--evidence", "fatigue=1"])
            .expect("cli should parse");
        let Commands::Explain(args) = cli.command else {
            panic!("expected explain");
        };
        assert_eq!(args.limit, 10);
    }
}
