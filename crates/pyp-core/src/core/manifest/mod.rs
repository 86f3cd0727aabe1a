mod lock;

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use pyp_domain::{ManifestDocument, ProjectLayout, ProjectReadiness, PypConfig};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::core::errors::PypError;
use lock::ManifestLock;

/// Reads and writes `pypconfig.toml` for one project.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    layout: ProjectLayout,
}

impl ManifestStore {
    #[must_use]
    pub fn new(layout: ProjectLayout) -> Self {
        Self { layout }
    }

    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.layout.manifest_path()
    }

    /// Checks for the manifest and the environment directory separately.
    ///
    /// # Errors
    ///
    /// Returns [`PypError::AccessError`] when either path cannot be inspected.
    pub fn readiness(&self) -> Result<ProjectReadiness> {
        self.layout.readiness().map_err(|source| {
            PypError::AccessError {
                what: "project files",
                path: self.layout.root().to_path_buf(),
                source,
            }
            .into()
        })
    }

    /// # Errors
    ///
    /// [`PypError::ConfigReadFailed`] or [`PypError::ConfigDecodeFailed`].
    pub fn read(&self) -> Result<PypConfig> {
        let path = self.path();
        let contents = read_manifest(&path)?;
        PypConfig::from_toml_str(&contents).map_err(|err| {
            PypError::ConfigDecodeFailed {
                path: path.clone(),
                detail: err.to_string(),
            }
            .into()
        })
    }

    /// Writes a brand-new manifest; an existing file is never overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`PypError::ConfigWriteFailed`] when encoding fails or the file
    /// cannot be created.
    pub fn create(&self, config: &PypConfig) -> Result<()> {
        let path = self.path();
        let write_failed = |detail: String| PypError::ConfigWriteFailed {
            path: path.clone(),
            detail,
        };
        let contents = config
            .to_toml_string()
            .map_err(|err| write_failed(format!("{err:#}")))?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| write_failed(err.to_string()))?;
        file.write_all(contents.as_bytes())
            .map_err(|err| write_failed(err.to_string()))?;
        debug!(path = %path.display(), "created manifest");
        Ok(())
    }

    /// Overwrites `project.dependencies` with `specs`.
    ///
    /// Returns whether the file changed. Formatting and comments elsewhere in
    /// the file are preserved, and an unchanged list leaves the file untouched.
    ///
    /// # Errors
    ///
    /// Surfaces read, decode and write failures as their [`PypError`] kinds.
    pub fn sync_dependencies(&self, specs: &[String]) -> Result<bool> {
        let path = self.path();
        let _lock = ManifestLock::acquire(&self.layout.lock_path())?;
        let contents = read_manifest(&path)?;
        let mut doc: ManifestDocument =
            contents
                .parse()
                .map_err(|err: anyhow::Error| PypError::ConfigDecodeFailed {
                    path: path.clone(),
                    detail: err.to_string(),
                })?;
        let changed = doc
            .replace_dependencies(specs)
            .map_err(|err| PypError::ConfigDecodeFailed {
                path: path.clone(),
                detail: err.to_string(),
            })?;
        if !changed {
            debug!(count = specs.len(), "manifest dependencies already current");
            return Ok(false);
        }
        write_atomic(&path, &doc.render())?;
        debug!(count = specs.len(), "synced manifest dependencies");
        Ok(true)
    }
}

fn read_manifest(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| {
        PypError::ConfigReadFailed {
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let write_failed = |detail: String| PypError::ConfigWriteFailed {
        path: path.to_path_buf(),
        detail,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| write_failed(err.to_string()))?;
    temp.write_all(contents.as_bytes())
        .map_err(|err| write_failed(err.to_string()))?;
    if let Ok(metadata) = fs::metadata(path) {
        fs::set_permissions(temp.path(), metadata.permissions())
            .map_err(|err| write_failed(err.to_string()))?;
    }
    temp.persist(path)
        .map_err(|err| write_failed(err.error.to_string()))?;
    Ok(())
}
