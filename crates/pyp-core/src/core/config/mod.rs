//! Configuration, settings, and per-command context assembly.

pub mod context;

use std::collections::HashMap;
use std::env;

use serde::{Deserialize, Serialize};

pub(crate) const PYTHON_ENV: &str = "PYP_PYTHON";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalOptions {
    pub quiet: bool,
    pub verbose: u8,
    pub trace: bool,
    pub json: bool,
    /// Runtime executable chosen with `--python`.
    pub python: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct EnvVars {
    vars: HashMap<String, String>,
}

impl EnvVars {
    pub(crate) fn capture() -> Self {
        Self {
            vars: env::vars_os()
                .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
                .collect(),
        }
    }

    pub(crate) fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    #[cfg(test)]
    pub(crate) fn testing(pairs: &[(&str, &str)]) -> Self {
        let vars = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Self { vars }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    python: Option<String>,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_vars(&EnvVars::capture())
    }

    pub(crate) fn from_vars(vars: &EnvVars) -> Self {
        Self {
            python: vars
                .var(PYTHON_ENV)
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(ToOwned::to_owned),
        }
    }

    /// Interpreter requested through `PYP_PYTHON`.
    #[must_use]
    pub fn python(&self) -> Option<&str> {
        self.python.as_deref()
    }
}
