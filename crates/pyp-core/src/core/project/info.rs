use anyhow::Result;
use pyp_domain::ProjectReadiness;
use serde_json::json;

use crate::core::config::context::CommandContext;
use crate::core::manifest::ManifestStore;
use crate::core::outcome::ExecutionOutcome;
use crate::PYP_VERSION;

#[must_use]
pub fn tool_version() -> ExecutionOutcome {
    ExecutionOutcome::passthrough(
        format!("pyp CLI {PYP_VERSION}"),
        json!({ "version": PYP_VERSION }),
    )
}

/// Whether the working directory already has a manifest and an environment.
///
/// # Errors
///
/// Returns an access error when either path cannot be inspected.
pub fn project_readiness(ctx: &CommandContext<'_>) -> Result<ProjectReadiness> {
    ManifestStore::new(ctx.layout().clone()).readiness()
}
