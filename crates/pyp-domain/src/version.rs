use std::str::FromStr;

use anyhow::{anyhow, Result};

/// First line of a `--version` banner such as `Python 3.12.1` or
/// `pip 24.0 from /usr/lib/python3/site-packages/pip (python 3.12)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionBanner {
    pub program: String,
    pub version: String,
}

impl FromStr for VersionBanner {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        let line = raw
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| anyhow!("empty version output"))?;
        let mut tokens = line.split_whitespace();
        let program = tokens.next();
        let version = tokens.next();
        match (program, version) {
            (Some(program), Some(version)) if version.starts_with(|c: char| c.is_ascii_digit()) => {
                Ok(Self {
                    program: program.to_string(),
                    version: version.to_string(),
                })
            }
            _ => Err(anyhow!("unexpected version output: {line:?}")),
        }
    }
}
