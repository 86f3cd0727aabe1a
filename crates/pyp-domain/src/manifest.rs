//! `pypconfig.toml`: the project's declarative config file.
//!
//! Whole-file reads and fresh writes go through the serde model
//! ([`PypConfig`]); dependency refreshes go through [`ManifestDocument`] so
//! that hand-written formatting and comments survive a resync.

use std::{collections::BTreeMap, str::FromStr};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use toml_edit::{Array, DocumentMut, Item, Table, Value as TomlValue};

pub const DEFAULT_PROJECT_NAME: &str = "my_project";
pub const DEFAULT_PROJECT_VERSION: &str = "0.1.0";
pub const DEFAULT_LICENSE: &str = "ISC";
pub const LICENSE_CHOICES: [&str; 3] = ["ISC", "MIT", "Apache-2.0"];
pub const DEFAULT_TEST_SCRIPT: &str = "echo \"Error: no test specified\" && exit 1";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PypConfig {
    pub python: PythonSection,
    pub project: ProjectSection,
    pub scripts: BTreeMap<String, String>,
    pub pyp: PypSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PythonSection {
    pub version: String,
    pub pip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ProjectSection {
    pub name: String,
    pub version: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    pub license: String,
    pub authors: Vec<String>,
    pub maintainers: Vec<String>,
    pub dependencies: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires_python: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PypSection {
    pub version: String,
}

/// Inputs collected by `pyp init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaffoldArgs {
    pub name: String,
    pub version: String,
    pub license: String,
}

impl Default for ScaffoldArgs {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROJECT_NAME.to_string(),
            version: DEFAULT_PROJECT_VERSION.to_string(),
            license: DEFAULT_LICENSE.to_string(),
        }
    }
}

impl PypConfig {
    /// Fresh manifest for a newly initialized project.
    pub fn scaffold(
        args: &ScaffoldArgs,
        python_version: &str,
        pip_version: &str,
        tool_version: &str,
        dependencies: Vec<String>,
    ) -> Self {
        let mut scripts = BTreeMap::new();
        scripts.insert("test".to_string(), DEFAULT_TEST_SCRIPT.to_string());
        Self {
            python: PythonSection {
                version: python_version.to_string(),
                pip: pip_version.to_string(),
            },
            project: ProjectSection {
                name: args.name.clone(),
                version: args.version.clone(),
                license: args.license.clone(),
                dependencies,
                ..ProjectSection::default()
            },
            scripts,
            pyp: PypSection {
                version: tool_version.to_string(),
            },
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml_edit::de::from_str(contents).map_err(|err| anyhow!("{}", err.to_string().trim_end()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml_edit::ser::to_string_pretty(self).context("encoding manifest")
    }

    /// Command registered under `key`; an empty command counts as absent.
    pub fn script(&self, key: &str) -> Option<&str> {
        self.scripts
            .get(key)
            .map(String::as_str)
            .filter(|command| !command.is_empty())
    }
}

/// Parsed manifest kept as an editable document.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
    doc: DocumentMut,
}

impl FromStr for ManifestDocument {
    type Err = anyhow::Error;

    fn from_str(contents: &str) -> Result<Self> {
        PypConfig::from_toml_str(contents)?;
        let doc: DocumentMut = contents.parse()?;
        Ok(Self { doc })
    }
}

impl ManifestDocument {
    pub fn dependencies(&self) -> Vec<String> {
        self.doc
            .get("project")
            .and_then(Item::as_table)
            .and_then(|table| table.get("dependencies"))
            .and_then(Item::as_array)
            .map(|array| {
                array
                    .iter()
                    .filter_map(|value| value.as_str().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Overwrite `project.dependencies` with `specs`.
    ///
    /// Returns `false` without touching the document when the array already
    /// holds exactly `specs` in order.
    pub fn replace_dependencies(&mut self, specs: &[String]) -> Result<bool> {
        let project = self
            .doc
            .entry("project")
            .or_insert(Item::Table(Table::new()))
            .as_table_mut()
            .ok_or_else(|| anyhow!("[project] must be a table"))?;
        if let Some(existing) = project.get("dependencies").and_then(Item::as_array) {
            if array_matches(existing, specs) {
                return Ok(false);
            }
        }
        project.insert(
            "dependencies",
            Item::Value(TomlValue::Array(dependency_array(specs))),
        );
        Ok(true)
    }

    pub fn render(&self) -> String {
        self.doc.to_string()
    }
}

fn dependency_array(specs: &[String]) -> Array {
    let mut array = Array::new();
    if specs.is_empty() {
        return array;
    }
    for spec in specs {
        let mut value = TomlValue::from(spec.as_str());
        value.decor_mut().set_prefix("\n    ");
        array.push_formatted(value);
    }
    array.set_trailing_comma(true);
    array.set_trailing("\n");
    array
}

fn array_matches(array: &Array, specs: &[String]) -> bool {
    array.len() == specs.len()
        && array
            .iter()
            .zip(specs)
            .all(|(value, spec)| value.as_str() == Some(spec.as_str()))
}
