use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

pub const VENV_DIR: &str = ".env";
pub const MANIFEST_FILE: &str = "pypconfig.toml";
pub const LOCK_FILE: &str = ".pypconfig.lock";

/// Fixed file layout of a pyp project rooted at `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(MANIFEST_FILE)
    }

    pub fn env_dir(&self) -> PathBuf {
        self.root.join(VENV_DIR)
    }

    pub fn lock_path(&self) -> PathBuf {
        self.root.join(LOCK_FILE)
    }

    /// Reports the manifest and environment independently.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when a stat fails for any reason other
    /// than the path not existing.
    pub fn readiness(&self) -> io::Result<ProjectReadiness> {
        Ok(ProjectReadiness {
            manifest: probe_path(&self.manifest_path())?,
            environment: probe_path(&self.env_dir())?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectReadiness {
    pub manifest: bool,
    pub environment: bool,
}

/// `Ok(false)` only for a missing path; every other stat failure is returned.
pub fn probe_path(path: &Path) -> io::Result<bool> {
    match path.metadata() {
        Ok(_) => Ok(true),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(err),
    }
}

/// Directory holding the environment's executables.
pub fn env_bin_dir(env_dir: &Path) -> PathBuf {
    if cfg!(windows) {
        env_dir.join("Scripts")
    } else {
        env_dir.join("bin")
    }
}
