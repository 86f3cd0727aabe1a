pub(crate) mod effects;
mod errors;
pub(crate) mod process;

use serde::{Deserialize, Serialize};

pub use errors::{error_outcome, format_status_message, to_json_response};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CommandGroup {
    Version,
    Init,
    Install,
    Uninstall,
    List,
    Check,
    Update,
    RunScript,
}
