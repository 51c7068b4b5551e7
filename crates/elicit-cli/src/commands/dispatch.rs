use std::sync::Arc;

use elicit_engine::EngineContext;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &Arc<EngineContext>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Initial(args) => commands::initial::handle(&args, ctx, flags).await,
        Commands::Next(args) => commands::next::handle(&args, ctx, flags).await,
        Commands::Predict(args) => commands::predict::handle(&args, ctx, flags).await,
        Commands::Explain(args) => commands::explain::handle(&args, ctx, flags).await,
        Commands::Chat => commands::chat::handle(ctx).await,
        Commands::Config | Commands::Schema(_) => {
            unreachable!("config/schema are pre-dispatched in main")
        }
    }
}
