use std::collections::BTreeSet;
use std::sync::Arc;

use elicit_core::SymptomId;
use elicit_engine::{ElicitationSession, EngineContext};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::PredictArgs;
use crate::commands::shared::run_engine;
use crate::output::output;

/// Handle `elicit predict`.
pub async fn handle(
    args: &PredictArgs,
    ctx: &Arc<EngineContext>,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let confirmed: BTreeSet<SymptomId> = args
        .symptoms
        .iter()
        .map(|id| SymptomId::from(id.trim()))
        .collect();
    let response =
        run_engine(ctx, move |ctx| ElicitationSession::new(ctx).predict(&confirmed)).await?;
    output(&response, flags.format)
}
