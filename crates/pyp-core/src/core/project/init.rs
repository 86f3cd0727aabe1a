use anyhow::Result;
use pyp_domain::ScaffoldArgs;
use serde_json::json;
use tracing::info;

use crate::core::config::context::CommandContext;
use crate::core::pip::PipManager;
use crate::core::outcome::ExecutionOutcome;

#[derive(Clone, Debug, Default)]
pub struct ProjectInitRequest {
    pub scaffold: ScaffoldArgs,
}

/// Creates `.env` and `pypconfig.toml` in the project root.
///
/// An existing manifest is left alone; only a missing environment is
/// recreated.
///
/// # Errors
/// Returns an error when the runtime is unusable, the environment cannot be
/// created, or the manifest cannot be written.
pub fn project_init(
    ctx: &CommandContext<'_>,
    request: &ProjectInitRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let readiness = pip.store().readiness()?;

    if readiness.manifest {
        let created = pip.ensure_env()?;
        return Ok(ExecutionOutcome::success(
            "Project already initialized",
            json!({
                "manifest": pip.store().path().display().to_string(),
                "environment_created": created,
            }),
        ));
    }

    pip.create_env()?;
    let config = pip.create_manifest(&request.scaffold)?;
    info!(project = %config.project.name, "initialized project");
    Ok(ExecutionOutcome::success(
        "Environment created successfully",
        json!({
            "project": config.project.name,
            "version": config.project.version,
            "license": config.project.license,
            "python": config.python.version,
            "pip": config.python.pip,
            "dependencies": config.project.dependencies,
            "manifest": pip.store().path().display().to_string(),
            "environment_created": true,
        }),
    ))
}
