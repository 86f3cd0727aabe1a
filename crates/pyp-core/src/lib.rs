#![deny(clippy::all)]

mod core;
pub mod api;

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::{Config, GlobalOptions};
pub use crate::core::env::{Activation, ActivationError, EnvironmentSnapshot, RestoreMode};
pub use crate::core::errors::{PackageOperation, PypError};
pub use crate::core::manifest::ManifestStore;
pub use crate::core::pip::{PackageChange, PipManager, RuntimeVersions, ScriptRun};
pub use crate::core::project::{
    package_check, package_install, package_list, package_uninstall, package_update,
    project_init, project_readiness, run_script, tool_version, CheckRequest, InstallRequest,
    ProjectInitRequest, RunScriptRequest, UninstallRequest, UpdateRequest,
};
pub use crate::core::runtime::effects::{Effects, ProcessRunner, SharedEffects, SystemEffects};
pub use crate::core::runtime::process::RunOutput;
pub use crate::core::runtime::{error_outcome, format_status_message, to_json_response, CommandGroup};
pub use crate::core::outcome::{CommandStatus, ExecutionOutcome};

pub use pyp_domain::{ProjectReadiness, ScaffoldArgs};

pub(crate) const PYP_VERSION: &str = env!("CARGO_PKG_VERSION");
