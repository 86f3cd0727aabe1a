//! What a handler hands back to the CLI for rendering.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

impl CommandStatus {
    /// Status string used in `--json` envelopes.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CommandStatus::Ok => "ok",
            CommandStatus::UserError => "user-error",
            CommandStatus::Failure => "error",
        }
    }

    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    #[serde(default)]
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self::with_status(CommandStatus::Ok, message, details)
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self::with_status(CommandStatus::Failure, message, details)
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self::with_status(CommandStatus::UserError, message, details)
    }

    /// A successful result whose message is printed bare, the way the
    /// underlying tool would print it.
    pub fn passthrough(message: impl Into<String>, details: Value) -> Self {
        let mut details = match details {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("value".to_string(), other);
                map
            }
        };
        details.insert("passthrough".to_string(), Value::Bool(true));
        Self::success(message, Value::Object(details))
    }

    fn with_status(status: CommandStatus, message: impl Into<String>, details: Value) -> Self {
        Self {
            status,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == CommandStatus::Ok
    }

    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.details
            .get("passthrough")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }

    /// Process exit code; a failed script propagates its own non-zero code.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        if self.status == CommandStatus::Failure {
            if let Some(code) = self
                .details
                .get("exit_code")
                .and_then(Value::as_i64)
                .and_then(|code| i32::try_from(code).ok())
                .filter(|code| *code > 0)
            {
                return code;
            }
        }
        self.status.exit_code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn passthrough_marks_details() {
        let outcome = ExecutionOutcome::passthrough("flask==3.0.0", json!({ "packages": [] }));
        assert!(outcome.is_ok());
        assert!(outcome.is_passthrough());
        assert_eq!(outcome.details["packages"], json!([]));

        let bare = ExecutionOutcome::passthrough("pyp CLI 0.1.0", Value::Null);
        assert!(bare.is_passthrough());
        assert!(!ExecutionOutcome::success("done", Value::Null).is_passthrough());
    }

    #[test]
    fn exit_code_forwards_script_status() {
        let failed = ExecutionOutcome::failure("script failed", json!({ "exit_code": 3 }));
        assert_eq!(failed.exit_code(), 3);

        let signalled = ExecutionOutcome::failure("script failed", json!({ "exit_code": -1 }));
        assert_eq!(signalled.exit_code(), 2);

        let user = ExecutionOutcome::user_error("missing", json!({ "exit_code": 9 }));
        assert_eq!(user.exit_code(), 1);
        assert_eq!(ExecutionOutcome::success("ok", Value::Null).exit_code(), 0);
    }
}
