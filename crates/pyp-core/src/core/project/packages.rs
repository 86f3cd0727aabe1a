use anyhow::Result;
use serde_json::json;

use crate::core::config::context::CommandContext;
use crate::core::pip::{PackageChange, PipManager};
use crate::core::outcome::ExecutionOutcome;

#[derive(Clone, Debug, Default)]
pub struct InstallRequest {
    /// Empty means "install what the manifest declares".
    pub packages: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct UninstallRequest {
    pub package: String,
}

#[derive(Clone, Debug)]
pub struct UpdateRequest {
    pub package: String,
}

#[derive(Clone, Debug)]
pub struct CheckRequest {
    pub package: String,
}

/// # Errors
/// Returns an error if pip fails or the manifest cannot be resynced.
pub fn package_install(
    ctx: &CommandContext<'_>,
    request: &InstallRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let change = pip.install(&request.packages)?;
    let message = match change.requested.as_slice() {
        [] => "Nothing to install".to_string(),
        [single] => format!("Installed {single}"),
        many => format!("Installed {} packages", many.len()),
    };
    Ok(change_outcome(message, &change))
}

/// # Errors
/// Returns an error if pip fails or the manifest cannot be resynced.
pub fn package_uninstall(
    ctx: &CommandContext<'_>,
    request: &UninstallRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let change = pip.uninstall(&request.package)?;
    Ok(change_outcome(
        format!("Uninstalled {}", request.package),
        &change,
    ))
}

/// # Errors
/// Returns an error if pip fails or the manifest cannot be resynced.
pub fn package_update(
    ctx: &CommandContext<'_>,
    request: &UpdateRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let change = pip.update(&request.package)?;
    Ok(change_outcome(format!("Updated {}", request.package), &change))
}

/// Prints installed packages one per line, as pip reports them.
///
/// # Errors
/// Returns an error if pip cannot list the environment.
pub fn package_list(ctx: &CommandContext<'_>) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let packages = pip.list_installed()?;
    Ok(ExecutionOutcome::passthrough(
        packages.join("\n"),
        json!({ "packages": packages }),
    ))
}

/// # Errors
/// Returns an error if pip cannot list the environment.
pub fn package_check(
    ctx: &CommandContext<'_>,
    request: &CheckRequest,
) -> Result<ExecutionOutcome> {
    let pip = PipManager::connect(ctx)?;
    let installed = pip.is_installed(&request.package)?;
    let message = if installed {
        format!("Package {} is installed", request.package)
    } else {
        format!("Package {} is not installed", request.package)
    };
    Ok(ExecutionOutcome::passthrough(
        message,
        json!({
            "package": request.package,
            "installed": installed,
        }),
    ))
}

fn change_outcome(message: String, change: &PackageChange) -> ExecutionOutcome {
    ExecutionOutcome::success(
        message,
        json!({
            "requested": change.requested,
            "dependencies": change.dependencies,
            "manifest_changed": change.manifest_changed,
        }),
    )
}
