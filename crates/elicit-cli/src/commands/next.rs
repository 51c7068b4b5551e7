use std::sync::Arc;

use elicit_engine::{ElicitationSession, EngineContext};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::NextArgs;
use crate::commands::shared::{read_turn, run_engine};
use crate::output::output;

/// Handle `elicit next`.
pub async fn handle(
    args: &NextArgs,
    ctx: &Arc<EngineContext>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let request = read_turn(&args.turn)?;
    let response = run_engine(ctx, move |ctx| {
        ElicitationSession::new(ctx).next(&request.evidence, &request.asked)
    })
    .await?;
    output(&response, flags.format)
}
