use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `elicit config`: print the merged configuration without loading artifacts.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = bootstrap::load_config(flags)?;
    output(&config, flags.format)
}
