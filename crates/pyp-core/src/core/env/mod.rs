//! Entering and leaving the project's virtual environment.
//!
//! pyp never spawns a subshell: "activating" means rewriting this process's
//! own `PATH`/`VIRTUAL_ENV`/`PYTHONHOME` so that children inherit the
//! environment, then putting everything back afterwards.

mod activation;
mod snapshot;

pub use activation::{Activation, ActivationError};
pub use snapshot::{EnvironmentSnapshot, RestoreMode};

pub(crate) const PATH_VAR: &str = "PATH";
pub(crate) const HOME_VAR: &str = "PYTHONHOME";
pub(crate) const VIRTUAL_ENV_VAR: &str = "VIRTUAL_ENV";
