use anyhow::Result;
use serde_json::json;

use crate::core::config::context::CommandContext;
use crate::core::pip::PipManager;
use crate::core::outcome::ExecutionOutcome;

#[derive(Clone, Debug)]
pub struct RunScriptRequest {
    pub script: String,
}

/// Runs a `[scripts]` entry and hands its combined output back verbatim.
///
/// # Errors
/// Returns an error if the script is missing, cannot be started, or exits
/// non-zero.
pub fn run_script(
    ctx: &CommandContext<'_>,
    request: &RunScriptRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let run = pip.run_script(&request.script)?;
    Ok(ExecutionOutcome::passthrough(
        format!("script `{}` finished", run.name),
        json!({
            "script": run.name,
            "command": run.command,
            "output": run.output,
        }),
    ))
}
