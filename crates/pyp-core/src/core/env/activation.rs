use std::env::{self, JoinPathsError};
use std::ffi::OsString;
use std::io;
use std::iter;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::{Mutex, PoisonError};

use pyp_domain::env_bin_dir;
use thiserror::Error;
use tracing::{debug, trace};

use super::snapshot::{EnvironmentSnapshot, RestoreMode};
use super::{HOME_VAR, PATH_VAR, VIRTUAL_ENV_VAR};

/// Environment path of the activation currently holding the process.
static LIVE: Mutex<Option<PathBuf>> = Mutex::new(None);

#[derive(Debug, Error)]
pub enum ActivationError {
    #[error("environment {} is already active (requested {})", active.display(), requested.display())]
    AlreadyActive { active: PathBuf, requested: PathBuf },
    #[error("unable to resolve the environment path")]
    CurrentDir(#[source] io::Error),
    #[error("cannot add {} to PATH", bin_dir.display())]
    SearchPath {
        bin_dir: PathBuf,
        #[source]
        source: JoinPathsError,
    },
}

/// Guard for an activated environment.
///
/// At most one guard is live per process. Dropping it restores the variables
/// captured at activation time.
#[derive(Debug)]
pub struct Activation {
    env_path: PathBuf,
    bin_dir: PathBuf,
    backup: Option<EnvironmentSnapshot>,
    live: bool,
}

impl Activation {
    /// Enters `env_dir`, resolved against the working directory when relative.
    ///
    /// # Errors
    ///
    /// Fails with [`ActivationError::AlreadyActive`] while another guard is
    /// live, leaving the process environment untouched.
    pub fn activate(env_dir: &Path) -> Result<Self, ActivationError> {
        let env_path = if env_dir.is_absolute() {
            env_dir.to_path_buf()
        } else {
            env::current_dir()
                .map_err(ActivationError::CurrentDir)?
                .join(env_dir)
        };

        let mut live = LIVE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = live.as_ref() {
            return Err(ActivationError::AlreadyActive {
                active: active.clone(),
                requested: env_path,
            });
        }

        let snapshot = EnvironmentSnapshot::capture(&env_path);
        let bin_dir = env_bin_dir(&env_path);
        let search_path = prepend_search_path(&bin_dir, &snapshot)?;
        env::set_var(VIRTUAL_ENV_VAR, &env_path);
        env::set_var(PATH_VAR, search_path);
        env::remove_var(HOME_VAR);
        *live = Some(env_path.clone());
        drop(live);

        refresh_shell_hash();
        debug!(env = %env_path.display(), "activated environment");
        Ok(Self {
            env_path,
            bin_dir,
            backup: Some(snapshot),
            live: true,
        })
    }

    /// Puts the captured variables back and releases the process-wide slot.
    ///
    /// Only a live guard touches the environment; once released, later calls
    /// leave whatever activation came next alone.
    pub fn deactivate(&mut self, mode: RestoreMode) {
        if self.live {
            let mut live = LIVE.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(snapshot) = self.backup.as_ref() {
                snapshot.restore();
            }
            *live = None;
            drop(live);
            self.live = false;
            refresh_shell_hash();
            debug!(env = %self.env_path.display(), "deactivated environment");
        }
        if mode == RestoreMode::Hard {
            self.backup = None;
        }
    }

    pub fn path(&self) -> &Path {
        &self.env_path
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    pub fn snapshot(&self) -> Option<&EnvironmentSnapshot> {
        self.backup.as_ref()
    }

    pub fn is_live(&self) -> bool {
        self.live
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        if self.live {
            self.deactivate(RestoreMode::Soft);
        }
    }
}

fn prepend_search_path(
    bin_dir: &Path,
    snapshot: &EnvironmentSnapshot,
) -> Result<OsString, ActivationError> {
    let existing = snapshot.search_path().map(env::split_paths).into_iter().flatten();
    env::join_paths(iter::once(bin_dir.to_path_buf()).chain(existing)).map_err(|source| {
        ActivationError::SearchPath {
            bin_dir: bin_dir.to_path_buf(),
            source,
        }
    })
}

/// Asks bash/zsh to forget cached command locations. Failures are ignored.
fn refresh_shell_hash() {
    let Some(shell) = env::var_os("SHELL") else {
        return;
    };
    let name = shell.to_string_lossy();
    if !(name.contains("bash") || name.contains("zsh")) {
        return;
    }
    let result = Command::new(&shell)
        .args(["-c", "hash -r"])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    match result {
        Ok(status) if status.success() => {}
        Ok(status) => trace!(shell = %name, %status, "hash -r exited unsuccessfully"),
        Err(err) => trace!(shell = %name, error = %err, "hash -r could not be run"),
    }
}
