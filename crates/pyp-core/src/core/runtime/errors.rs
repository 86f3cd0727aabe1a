use std::io;

use serde_json::{json, Map, Value};

use crate::core::config::context::CommandInfo;
use crate::core::env::ActivationError;
use crate::core::errors::PypError;
use crate::core::outcome::{CommandStatus, ExecutionOutcome};

const TOOL_HINT: &str =
    "Install Python 3 with pip, or point `--python`/`PYP_PYTHON` at a working interpreter.";

/// Maps a typed pyp failure anywhere in `err`'s chain to an outcome.
///
/// Returns `None` for errors pyp has no specific guidance for; callers report
/// those as internal errors.
#[must_use]
pub fn error_outcome(err: &anyhow::Error) -> Option<ExecutionOutcome> {
    if let Some(pyp) = err.chain().find_map(|cause| cause.downcast_ref::<PypError>()) {
        return Some(pyp_error_outcome(pyp));
    }
    err.chain()
        .find_map(|cause| cause.downcast_ref::<ActivationError>())
        .map(activation_error_outcome)
}

fn pyp_error_outcome(err: &PypError) -> ExecutionOutcome {
    let reason = err.reason();
    match err {
        PypError::ToolNotFound { tool, detail } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "tool": tool,
                "stderr": detail,
                "hint": TOOL_HINT,
            }),
        ),
        PypError::EnvironmentCreationFailed { stderr } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "stderr": stderr,
                "hint": "Check that the interpreter ships the `venv` module (e.g. python3-venv).",
            }),
        ),
        PypError::ConfigReadFailed { source, .. } if source.kind() == io::ErrorKind::NotFound => {
            ExecutionOutcome::user_error(
                "pypconfig.toml not found",
                json!({
                    "reason": reason,
                    "hint": "Run `pyp init` to create pypconfig.toml.",
                }),
            )
        }
        PypError::ConfigReadFailed { path, source } => ExecutionOutcome::user_error(
            err.to_string(),
            json!({
                "reason": reason,
                "path": path.display().to_string(),
                "error": source.to_string(),
            }),
        ),
        PypError::ConfigDecodeFailed { path, detail } => ExecutionOutcome::user_error(
            "pypconfig.toml is not a valid manifest",
            json!({
                "reason": reason,
                "path": path.display().to_string(),
                "error": detail,
                "hint": "Fix pypconfig.toml and rerun the command.",
            }),
        ),
        PypError::ConfigWriteFailed { path, detail } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "path": path.display().to_string(),
                "error": detail,
            }),
        ),
        PypError::PackageOperationFailed {
            operation,
            code,
            stderr,
        } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "operation": operation.to_string(),
                "code": code,
                "stderr": stderr,
            }),
        ),
        PypError::ScriptNotFound { name, available } => {
            let hint = if available.is_empty() {
                format!("Add `{name} = \"...\"` under [scripts] in pypconfig.toml.")
            } else {
                format!("Available scripts: {}", available.join(", "))
            };
            ExecutionOutcome::user_error(
                err.to_string(),
                json!({
                    "reason": reason,
                    "script": name,
                    "available": available,
                    "hint": hint,
                }),
            )
        }
        PypError::ScriptFailed { name, code, output } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "script": name,
                "exit_code": code,
                "passthrough": true,
                "output": output,
            }),
        ),
        PypError::AccessError { path, source, .. } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "path": path.display().to_string(),
                "error": source.to_string(),
            }),
        ),
        PypError::VersionParse { tool, output } => ExecutionOutcome::failure(
            err.to_string(),
            json!({
                "reason": reason,
                "tool": tool,
                "stderr": output,
                "hint": TOOL_HINT,
            }),
        ),
    }
}

fn activation_error_outcome(err: &ActivationError) -> ExecutionOutcome {
    let reason = match err {
        ActivationError::AlreadyActive { .. } => "activation_conflict",
        ActivationError::CurrentDir(_) | ActivationError::SearchPath { .. } => {
            "activation_failed"
        }
    };
    ExecutionOutcome::failure(err.to_string(), json!({ "reason": reason }))
}

/// The `--json` envelope: `{command, status, message, details}` plus the
/// exit code the process is about to return.
#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome, code: i32) -> Value {
    let mut details = match &outcome.details {
        Value::Object(map) => map.clone(),
        Value::Null => Map::new(),
        other => Map::from_iter([("value".to_string(), other.clone())]),
    };
    if outcome.status != CommandStatus::Ok {
        details.entry("exit_code").or_insert_with(|| json!(code));
    }
    json!({
        "command": info.group,
        "status": outcome.status.label(),
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

/// Prefixes `message` with `pyp <command>:` unless it already carries it.
#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("pyp {}", info.name);
    match message {
        "" => prefix,
        _ if message.starts_with(&prefix) => message.to_string(),
        _ => format!("{prefix}: {message}"),
    }
}
