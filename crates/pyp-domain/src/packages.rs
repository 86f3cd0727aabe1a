/// One `name==version` line of `pip list --format=freeze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRecord {
    pub name: String,
    pub version: Option<String>,
}

impl PackageRecord {
    pub fn parse(line: &str) -> Self {
        match line.split_once("==") {
            Some((name, version)) => Self {
                name: name.to_string(),
                version: Some(version.to_string()),
            },
            None => Self {
                name: line.to_string(),
                version: None,
            },
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Splits freeze output into entries, dropping empty lines and keeping the
/// order pip emitted them in.
pub fn parse_freeze_output(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

pub fn is_listed(entries: &[String], name: &str) -> bool {
    entries
        .iter()
        .any(|entry| PackageRecord::parse(entry).matches_name(name))
}
