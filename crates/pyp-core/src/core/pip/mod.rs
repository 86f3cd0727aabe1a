//! The pip executor: every package operation runs `pip` inside the project's
//! activated environment and then resyncs `project.dependencies`.

pub(crate) mod python;

use std::path::Path;

use anyhow::Result;
use pyp_domain::{
    is_listed, parse_freeze_output, ProjectLayout, PypConfig, ScaffoldArgs, VersionBanner,
    VENV_DIR,
};
use tracing::{debug, info, warn};

use crate::core::config::context::CommandContext;
use crate::core::env::Activation;
use crate::core::errors::{PackageOperation, PypError};
use crate::core::manifest::ManifestStore;
use crate::core::runtime::effects::{ProcessRunner, SharedEffects};
use crate::core::runtime::process::RunOutput;
use crate::PYP_VERSION;

const PIP: &str = "pip";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeVersions {
    pub python: String,
    pub pip: String,
}

/// Result of a mutating package operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageChange {
    /// Specs handed to pip.
    pub requested: Vec<String>,
    /// Installed set written to the manifest afterwards.
    pub dependencies: Vec<String>,
    pub manifest_changed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub name: String,
    pub command: String,
    pub output: String,
}

pub struct PipManager {
    effects: SharedEffects,
    python: String,
    versions: RuntimeVersions,
    layout: ProjectLayout,
    store: ManifestStore,
}

impl PipManager {
    /// Resolves the runtime and confirms both it and its pip answer
    /// `--version`.
    ///
    /// # Errors
    ///
    /// [`PypError::ToolNotFound`] names whichever tool is missing;
    /// [`PypError::VersionParse`] reports a banner that could not be read.
    pub fn connect(ctx: &CommandContext<'_>) -> Result<Self> {
        let python = match ctx.python_override() {
            Some(explicit) => explicit.to_string(),
            None => python::detect_interpreter(ctx.process(), ctx.layout().root())?,
        };
        let runner = ctx.process();
        let root = ctx.layout().root();
        let python_version = probe_version(
            runner,
            "python",
            &python,
            &["--version".to_string()],
            root,
        )?;
        let pip_version = probe_version(
            runner,
            "pip",
            &python,
            &["-m".to_string(), "pip".to_string(), "--version".to_string()],
            root,
        )?;
        debug!(%python, %python_version, %pip_version, "runtime ready");
        Ok(Self {
            effects: ctx.shared_effects(),
            python,
            versions: RuntimeVersions {
                python: python_version,
                pip: pip_version,
            },
            layout: ctx.layout().clone(),
            store: ManifestStore::new(ctx.layout().clone()),
        })
    }

    pub fn store(&self) -> &ManifestStore {
        &self.store
    }

    fn runner(&self) -> &dyn ProcessRunner {
        self.effects.process()
    }

    fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Runs `python -m venv .env` in the project root.
    ///
    /// # Errors
    ///
    /// Returns [`PypError::EnvironmentCreationFailed`] with the runtime's
    /// stderr.
    pub fn create_env(&self) -> Result<()> {
        let args = vec!["-m".to_string(), "venv".to_string(), VENV_DIR.to_string()];
        let output = self
            .runner()
            .run_command(&self.python, &args, self.root())
            .map_err(|err| PypError::EnvironmentCreationFailed {
                stderr: format!("{err:#}"),
            })?;
        if !output.success() {
            return Err(PypError::EnvironmentCreationFailed {
                stderr: output.stderr,
            }
            .into());
        }
        info!(env = %self.layout.env_dir().display(), "created virtual environment");
        Ok(())
    }

    /// Creates the environment when it is missing; returns whether it did.
    pub fn ensure_env(&self) -> Result<bool> {
        if self.store.readiness()?.environment {
            return Ok(false);
        }
        self.create_env()?;
        Ok(true)
    }

    pub fn activate(&self) -> Result<Activation> {
        Ok(Activation::activate(&self.layout.env_dir())?)
    }

    /// Writes a fresh manifest recording the runtime versions and the
    /// currently installed packages.
    pub fn create_manifest(&self, args: &ScaffoldArgs) -> Result<PypConfig> {
        let dependencies = self.list_installed()?;
        let config = PypConfig::scaffold(
            args,
            &self.versions.python,
            &self.versions.pip,
            PYP_VERSION,
            dependencies,
        );
        self.store.create(&config)?;
        Ok(config)
    }

    pub fn list_installed(&self) -> Result<Vec<String>> {
        let active = self.activate()?;
        self.list_in(&active)
    }

    /// Lists packages using an activation the caller already holds.
    pub fn list_in(&self, active: &Activation) -> Result<Vec<String>> {
        debug!(env = %active.path().display(), "listing installed packages");
        let output = self.pip(
            PackageOperation::List,
            &["list".to_string(), "--format=freeze".to_string()],
        )?;
        Ok(parse_freeze_output(&output.stdout))
    }

    pub fn is_installed(&self, name: &str) -> Result<bool> {
        let entries = self.list_installed()?;
        Ok(is_listed(&entries, name))
    }

    /// Installs `names`, or the manifest's declared dependencies when empty.
    pub fn install(&self, names: &[String]) -> Result<PackageChange> {
        let config = self.store.read()?;
        let requested = if names.is_empty() {
            config.project.dependencies
        } else {
            names.to_vec()
        };
        self.ensure_env()?;
        let active = self.activate()?;
        if requested.is_empty() {
            debug!("nothing to install");
        } else {
            let mut args = vec!["install".to_string()];
            args.extend(requested.iter().cloned());
            self.pip(PackageOperation::Install, &args)?;
        }
        self.finish_change(&active, requested)
    }

    pub fn uninstall(&self, name: &str) -> Result<PackageChange> {
        self.store.read()?;
        let active = self.activate()?;
        let args = vec!["uninstall".to_string(), "-y".to_string(), name.to_string()];
        self.pip(PackageOperation::Uninstall, &args)?;
        self.finish_change(&active, vec![name.to_string()])
    }

    pub fn update(&self, name: &str) -> Result<PackageChange> {
        self.store.read()?;
        let active = self.activate()?;
        let args = vec![
            "install".to_string(),
            "--upgrade".to_string(),
            name.to_string(),
        ];
        self.pip(PackageOperation::Upgrade, &args)?;
        self.finish_change(&active, vec![name.to_string()])
    }

    /// Rewrites `project.dependencies` from the live package list.
    pub fn sync_dependencies(&self, active: &Activation) -> Result<(Vec<String>, bool)> {
        let dependencies = self.list_in(active)?;
        let changed = self.store.sync_dependencies(&dependencies)?;
        Ok((dependencies, changed))
    }

    fn finish_change(&self, active: &Activation, requested: Vec<String>) -> Result<PackageChange> {
        let (dependencies, manifest_changed) = self.sync_dependencies(active)?;
        Ok(PackageChange {
            requested,
            dependencies,
            manifest_changed,
        })
    }

    /// Runs the `[scripts]` entry `key` through the host shell.
    ///
    /// # Errors
    ///
    /// [`PypError::ScriptNotFound`] is returned before anything is spawned;
    /// a non-zero exit becomes [`PypError::ScriptFailed`] with the output.
    pub fn run_script(&self, key: &str) -> Result<ScriptRun> {
        let config = self.store.read()?;
        let Some(command) = config.script(key).map(ToOwned::to_owned) else {
            let available = config
                .scripts
                .iter()
                .filter(|(_, command)| !command.is_empty())
                .map(|(name, _)| name.clone())
                .collect();
            return Err(PypError::ScriptNotFound {
                name: key.to_string(),
                available,
            }
            .into());
        };

        let _active = self.activate()?;
        let (shell, args) = shell_invocation(&command);
        debug!(script = key, %command, "running script");
        let output = self.runner().run_command_combined(shell, &args, self.root())?;
        if !output.success() {
            warn!(script = key, code = output.code, "script failed");
            return Err(PypError::ScriptFailed {
                name: key.to_string(),
                code: output.code,
                output: output.stdout,
            }
            .into());
        }
        Ok(ScriptRun {
            name: key.to_string(),
            command,
            output: output.stdout,
        })
    }

    fn pip(&self, operation: PackageOperation, args: &[String]) -> Result<RunOutput> {
        let output = self.runner().run_command(PIP, args, self.root())?;
        if output.success() {
            Ok(output)
        } else {
            Err(PypError::PackageOperationFailed {
                operation,
                code: output.code,
                stderr: output.stderr,
            }
            .into())
        }
    }
}

fn shell_invocation(command: &str) -> (&'static str, Vec<String>) {
    if cfg!(windows) {
        ("cmd.exe", vec!["/C".to_string(), command.to_string()])
    } else {
        ("bash", vec!["-c".to_string(), command.to_string()])
    }
}

fn probe_version(
    runner: &dyn ProcessRunner,
    tool: &str,
    python: &str,
    args: &[String],
    cwd: &Path,
) -> Result<String> {
    let not_found = |detail: String| PypError::ToolNotFound {
        tool: tool.to_string(),
        detail,
    };
    let output = runner
        .run_command(python, args, cwd)
        .map_err(|err| not_found(format!("{err:#}")))?;
    if !output.success() {
        return Err(not_found(output.stderr.trim().to_string()).into());
    }
    // Older interpreters print the banner on stderr.
    let banner = if output.stdout.trim().is_empty() {
        &output.stderr
    } else {
        &output.stdout
    };
    let parsed: VersionBanner = banner.parse().map_err(|_| PypError::VersionParse {
        tool: tool.to_string(),
        output: banner.trim().to_string(),
    })?;
    Ok(parsed.version)
}
