use std::env;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use super::{HOME_VAR, PATH_VAR, VIRTUAL_ENV_VAR};

/// How much of the saved state survives a deactivation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreMode {
    /// Restore and keep the snapshot around.
    Soft,
    /// Restore and forget the snapshot.
    Hard,
}

/// Process variables as they were before an activation.
///
/// `None` records an unset variable, which is restored by removing it rather
/// than by writing an empty value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    search_path: Option<OsString>,
    runtime_home: Option<OsString>,
    target_env_path: PathBuf,
}

impl EnvironmentSnapshot {
    pub fn capture(target_env_path: &Path) -> Self {
        Self {
            search_path: env::var_os(PATH_VAR),
            runtime_home: env::var_os(HOME_VAR),
            target_env_path: target_env_path.to_path_buf(),
        }
    }

    pub fn search_path(&self) -> Option<&OsStr> {
        self.search_path.as_deref()
    }

    pub fn runtime_home(&self) -> Option<&OsStr> {
        self.runtime_home.as_deref()
    }

    pub fn target_env_path(&self) -> &Path {
        &self.target_env_path
    }

    pub fn restore(&self) {
        restore_var(PATH_VAR, self.search_path.as_deref());
        restore_var(HOME_VAR, self.runtime_home.as_deref());
        env::remove_var(VIRTUAL_ENV_VAR);
    }
}

fn restore_var(key: &str, value: Option<&OsStr>) {
    match value {
        Some(value) => env::set_var(key, value),
        None => env::remove_var(key),
    }
}
