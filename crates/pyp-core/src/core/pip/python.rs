use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::core::errors::PypError;
use crate::core::runtime::effects::ProcessRunner;

const CANDIDATES: [&str; 2] = ["python3", "python"];

/// Picks the first of `python3`/`python` on `PATH` that answers `--version`.
///
/// # Errors
///
/// Returns [`PypError::ToolNotFound`] when no candidate is on `PATH` or none
/// of them runs.
pub(crate) fn detect_interpreter(runner: &dyn ProcessRunner, cwd: &Path) -> Result<String> {
    let probe = ["--version".to_string()];
    let mut rejected = Vec::new();
    for candidate in CANDIDATES {
        let Some(path) = runner.locate(candidate) else {
            continue;
        };
        match runner.run_command(&path, &probe, cwd) {
            Ok(output) if output.success() => {
                debug!(interpreter = %path, "selected runtime from PATH");
                return Ok(path);
            }
            Ok(output) => {
                debug!(interpreter = %path, code = output.code, "runtime failed --version");
                rejected.push(format!("{path} exited with {}", output.code));
            }
            Err(err) => {
                debug!(interpreter = %path, error = %err, "runtime could not be spawned");
                rejected.push(format!("{path}: {err}"));
            }
        }
    }
    let detail = if rejected.is_empty() {
        "neither python3 nor python was found on PATH".to_string()
    } else {
        format!("no working runtime on PATH ({})", rejected.join("; "))
    };
    Err(PypError::ToolNotFound {
        tool: "python".to_string(),
        detail,
    }
    .into())
}
