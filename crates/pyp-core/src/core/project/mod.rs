//! Command handlers. Each one builds a [`PipManager`] (which confirms the
//! runtime and pip are usable), performs a single operation, and reports an
//! [`ExecutionOutcome`]. Typed failures are returned as errors and mapped to
//! outcomes by [`crate::error_outcome`].
//!
//! [`PipManager`]: crate::PipManager
//! [`ExecutionOutcome`]: crate::ExecutionOutcome

mod info;
mod init;
mod packages;
mod scripts;

pub use info::{project_readiness, tool_version};
pub use init::{project_init, ProjectInitRequest};
pub use packages::{
    package_check, package_install, package_list, package_uninstall, package_update,
    CheckRequest, InstallRequest, UninstallRequest, UpdateRequest,
};
pub use scripts::{run_script, RunScriptRequest};
