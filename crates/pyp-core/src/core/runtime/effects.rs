use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use which::which;

use super::process::{run_command, run_command_combined, RunOutput};

/// Spawns the external tools pyp drives.
pub trait ProcessRunner: Send + Sync {
    /// Resolves `program` against `PATH`.
    fn locate(&self, program: &str) -> Option<String>;
    fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput>;
    /// Like [`ProcessRunner::run_command`] with stderr folded into stdout.
    fn run_command_combined(&self, program: &str, args: &[String], cwd: &Path)
        -> Result<RunOutput>;
}

pub trait Effects: Send + Sync {
    fn process(&self) -> &dyn ProcessRunner;
}

pub struct SystemEffects {
    process: Arc<SystemProcessRunner>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            process: Arc::new(SystemProcessRunner),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn process(&self) -> &dyn ProcessRunner {
        self.process.as_ref()
    }
}

struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn locate(&self, program: &str) -> Option<String> {
        which(program)
            .ok()
            .and_then(|path| path.into_os_string().into_string().ok())
    }

    fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
        run_command(program, args, cwd)
    }

    fn run_command_combined(
        &self,
        program: &str,
        args: &[String],
        cwd: &Path,
    ) -> Result<RunOutput> {
        run_command_combined(program, args, cwd)
    }
}

pub type SharedEffects = Arc<dyn Effects>;
