use clap::Parser;
use elicit_core::ErrorResponse;
use elicit_engine::EngineError;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod progress;
mod ui;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();

    if let Err(error) = run(cli).await {
        if let Some(response) = error_response(&error, flags.format) {
            if let Err(output_error) = output::output(&response, flags.format) {
                tracing::warn!(error = %output_error, "failed to print error response");
            }
        }
        eprintln!("elicit error: {error:#}");
        std::process::exit(1);
    }
}

/// Machine-readable body for engine failures in `json`/`raw` output.
fn error_response(error: &anyhow::Error, format: cli::OutputFormat) -> Option<ErrorResponse> {
    if format == cli::OutputFormat::Text {
        return None;
    }
    error
        .downcast_ref::<EngineError>()
        .map(EngineError::to_response)
}

async fn run(cli: cli::Cli) -> anyhow::Result<()> {
    init_tracing(cli.quiet, cli.verbose)?;

    let flags = cli.global_flags();
    ui::init(&flags);

    match &cli.command {
        cli::Commands::Schema(args) => return commands::schema::handle(args, &flags),
        cli::Commands::Config => return commands::config::handle(&flags),
        _ => {}
    }

    let config = bootstrap::load_config(&flags)?;
    let ctx = bootstrap::build_context(&config).await?;

    commands::dispatch::dispatch(cli.command, &ctx, &flags).await
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("ELICIT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
