#![deny(clippy::all)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod manifest;
pub mod packages;
pub mod project;
pub mod version;

pub use manifest::{
    ManifestDocument, ProjectSection, PypConfig, PypSection, PythonSection, ScaffoldArgs,
    DEFAULT_LICENSE, DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_VERSION, DEFAULT_TEST_SCRIPT,
    LICENSE_CHOICES,
};
pub use packages::{is_listed, parse_freeze_output, PackageRecord};
pub use project::{
    env_bin_dir, probe_path, ProjectLayout, ProjectReadiness, LOCK_FILE, MANIFEST_FILE, VENV_DIR,
};
pub use version::VersionBanner;
