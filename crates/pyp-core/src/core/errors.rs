use std::{fmt, io, path::PathBuf};

use thiserror::Error;

/// Which pip invocation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageOperation {
    Install,
    Uninstall,
    Upgrade,
    List,
}

impl fmt::Display for PackageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            PackageOperation::Install => "install",
            PackageOperation::Uninstall => "uninstall",
            PackageOperation::Upgrade => "upgrade",
            PackageOperation::List => "list",
        };
        f.write_str(verb)
    }
}

#[derive(Debug, Error)]
pub enum PypError {
    #[error("{tool} is not available: {detail}")]
    ToolNotFound { tool: String, detail: String },

    #[error("failed to create virtual environment")]
    EnvironmentCreationFailed { stderr: String },

    #[error("failed to read {}", path.display())]
    ConfigReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a valid manifest: {detail}", path.display())]
    ConfigDecodeFailed { path: PathBuf, detail: String },

    #[error("failed to write {}: {detail}", path.display())]
    ConfigWriteFailed { path: PathBuf, detail: String },

    #[error("pip {operation} failed (exit code {code})")]
    PackageOperationFailed {
        operation: PackageOperation,
        code: i32,
        stderr: String,
    },

    #[error("script `{name}` is not defined in pypconfig.toml")]
    ScriptNotFound { name: String, available: Vec<String> },

    #[error("script `{name}` exited with code {code}")]
    ScriptFailed {
        name: String,
        code: i32,
        output: String,
    },

    #[error("unable to access {what} at {}", path.display())]
    AccessError {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unexpected `{tool} --version` output")]
    VersionParse { tool: String, output: String },
}

impl PypError {
    /// Stable identifier surfaced as `details.reason`.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            PypError::ToolNotFound { .. } => "tool_not_found",
            PypError::EnvironmentCreationFailed { .. } => "environment_creation_failed",
            PypError::ConfigReadFailed { source, .. }
                if source.kind() == io::ErrorKind::NotFound =>
            {
                "missing_manifest"
            }
            PypError::ConfigReadFailed { .. } => "manifest_read_failed",
            PypError::ConfigDecodeFailed { .. } => "invalid_manifest",
            PypError::ConfigWriteFailed { .. } => "manifest_write_failed",
            PypError::PackageOperationFailed { .. } => "package_operation_failed",
            PypError::ScriptNotFound { .. } => "script_not_found",
            PypError::ScriptFailed { .. } => "script_failed",
            PypError::AccessError { .. } => "access_error",
            PypError::VersionParse { .. } => "version_parse_failed",
        }
    }
}
