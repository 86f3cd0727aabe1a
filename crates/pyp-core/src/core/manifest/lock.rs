use std::fs::{File, OpenOptions};
use std::path::Path;

use anyhow::{Context, Result};
use fs4::FileExt;

/// Advisory exclusive lock held for a manifest read-modify-write cycle.
#[derive(Debug)]
pub(crate) struct ManifestLock {
    _file: File,
}

impl ManifestLock {
    /// Blocks until no other pyp process holds the lock at `path`.
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        file.lock_exclusive()
            .with_context(|| format!("failed to lock {}", path.display()))?;
        Ok(Self { _file: file })
    }
}
