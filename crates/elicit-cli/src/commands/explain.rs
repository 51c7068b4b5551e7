use std::sync::Arc;

use elicit_engine::{ElicitationSession, EngineContext};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ExplainArgs;
use crate::commands::shared::{read_turn, run_engine};
use crate::output::output;

/// Handle `elicit explain`.
pub async fn handle(
    args: &ExplainArgs,
    ctx: &Arc<EngineContext>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let request = read_turn(&args.turn)?;
    let limit = args.limit;
    let response = run_engine(ctx, move |ctx| {
        ElicitationSession::new(ctx).explain(&request.evidence, &request.asked, limit)
    })
    .await?;
    output(&response, flags.format)
}
