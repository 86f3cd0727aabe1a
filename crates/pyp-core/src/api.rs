// Public surface consumed by the `pyp` binary.
//
// Keeps the crate root small: everything the CLI needs to build requests,
// run handlers and render outcomes is re-exported from here.

pub use crate::core::config::context::{CommandContext, CommandInfo};
pub use crate::core::config::GlobalOptions;
pub use crate::core::project::{
    package_check, package_install, package_list, package_uninstall, package_update,
    project_init, project_readiness, run_script, tool_version, CheckRequest, InstallRequest,
    ProjectInitRequest, RunScriptRequest, UninstallRequest, UpdateRequest,
};
pub use crate::core::runtime::effects::SystemEffects;
pub use crate::core::runtime::{
    error_outcome, format_status_message, to_json_response, CommandGroup,
};
pub use crate::core::outcome::{CommandStatus, ExecutionOutcome};

pub use pyp_domain::{
    ProjectReadiness, ScaffoldArgs, DEFAULT_LICENSE, DEFAULT_PROJECT_NAME,
    DEFAULT_PROJECT_VERSION, LICENSE_CHOICES,
};
