use std::sync::Arc;

use elicit_engine::{ElicitationSession, EngineContext};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitialArgs;
use crate::commands::shared::run_engine;
use crate::output::output;

/// Handle `elicit initial`.
pub async fn handle(
    args: &InitialArgs,
    ctx: &Arc<EngineContext>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let text = args.text();
    let response = run_engine(ctx, move |ctx| ElicitationSession::new(ctx).initial(&text)).await?;
    output(&response, flags.format)
}
