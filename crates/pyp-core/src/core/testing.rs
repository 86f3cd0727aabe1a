//! Recording stand-ins for the process seam used by handler tests.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tempfile::TempDir;

use crate::core::config::context::CommandContext;
use crate::core::config::GlobalOptions;
use crate::core::runtime::effects::{Effects, ProcessRunner, SharedEffects};
use crate::core::runtime::process::RunOutput;

pub(crate) const BROKEN_SPEC: &str = "broken";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Default)]
struct FakeState {
    calls: Vec<Call>,
    installed: Vec<String>,
    scripts: BTreeMap<String, (i32, String)>,
    missing_pip: bool,
    broken_runtimes: Vec<String>,
    absent_programs: Vec<String>,
}

/// Simulates a python runtime with pip, keeping the installed set in memory.
#[derive(Default)]
pub(crate) struct FakeRunner {
    state: Mutex<FakeState>,
}

impl FakeRunner {
    pub(crate) fn with_installed(entries: &[&str]) -> Self {
        let runner = Self::default();
        runner.state().installed = entries.iter().map(|entry| (*entry).to_string()).collect();
        runner
    }

    fn state(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub(crate) fn script_result(&self, command: &str, code: i32, output: &str) {
        self.state()
            .scripts
            .insert(command.to_string(), (code, output.to_string()));
    }

    pub(crate) fn without_pip(self) -> Self {
        self.state().missing_pip = true;
        self
    }

    /// `program` resolves on `PATH` but fails `--version`.
    pub(crate) fn with_broken_runtime(self, program: &str) -> Self {
        self.state().broken_runtimes.push(program.to_string());
        self
    }

    pub(crate) fn without_program(self, program: &str) -> Self {
        self.state().absent_programs.push(program.to_string());
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub(crate) fn pip_calls(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|call| call.program == "pip")
            .map(|call| call.args)
            .collect()
    }

    pub(crate) fn installed(&self) -> Vec<String> {
        self.state().installed.clone()
    }

    fn respond_pip(state: &mut FakeState, args: &[String]) -> RunOutput {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["list", "--format=freeze"] => {
                let mut stdout = state.installed.join("\n");
                stdout.push('\n');
                ok(&stdout)
            }
            ["install", "--upgrade", name] => {
                if let Some(entry) = state
                    .installed
                    .iter_mut()
                    .find(|entry| package_name(entry).eq_ignore_ascii_case(name))
                {
                    *entry = format!("{}==99.0.0", package_name(entry));
                    ok("")
                } else {
                    fail(1, &format!("ERROR: No matching distribution found for {name}"))
                }
            }
            ["install", specs @ ..] => {
                if let Some(bad) = specs.iter().find(|spec| **spec == BROKEN_SPEC) {
                    return fail(1, &format!("ERROR: No matching distribution found for {bad}"));
                }
                for spec in specs {
                    let entry = if spec.contains("==") {
                        (*spec).to_string()
                    } else {
                        format!("{spec}==1.0.0")
                    };
                    let name = package_name(&entry).to_string();
                    state
                        .installed
                        .retain(|existing| !package_name(existing).eq_ignore_ascii_case(&name));
                    state.installed.push(entry);
                }
                ok("")
            }
            ["uninstall", "-y", name] => {
                state
                    .installed
                    .retain(|existing| !package_name(existing).eq_ignore_ascii_case(name));
                ok("")
            }
            other => fail(2, &format!("unsupported pip invocation: {other:?}")),
        }
    }
}

impl ProcessRunner for FakeRunner {
    fn locate(&self, program: &str) -> Option<String> {
        let absent = self.state().absent_programs.iter().any(|name| name == program);
        (!absent).then(|| program.to_string())
    }

    fn run_command(&self, program: &str, args: &[String], cwd: &Path) -> Result<RunOutput> {
        let mut state = self.state();
        state.calls.push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });
        if program == "pip" {
            return Ok(Self::respond_pip(&mut state, args));
        }
        if state.broken_runtimes.iter().any(|name| name == program) {
            return Ok(fail(127, "error while loading shared libraries"));
        }
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        match args.as_slice() {
            ["--version"] => Ok(ok("Python 3.11.4\n")),
            ["-m", "pip", "--version"] if state.missing_pip => {
                Ok(fail(1, "No module named pip"))
            }
            ["-m", "pip", "--version"] => Ok(ok(
                "pip 23.2.1 from /fake/site-packages/pip (python 3.11)\n",
            )),
            ["-m", "venv", dir] => {
                fs::create_dir_all(cwd.join(dir))?;
                Ok(ok(""))
            }
            other => Err(anyhow!("unexpected runtime invocation: {other:?}")),
        }
    }

    fn run_command_combined(
        &self,
        program: &str,
        args: &[String],
        _cwd: &Path,
    ) -> Result<RunOutput> {
        let mut state = self.state();
        state.calls.push(Call {
            program: program.to_string(),
            args: args.to_vec(),
        });
        let command = args.last().cloned().unwrap_or_default();
        let (code, output) = state.scripts.get(&command).cloned().unwrap_or_default();
        Ok(RunOutput {
            code,
            stdout: output,
            stderr: String::new(),
        })
    }
}

pub(crate) struct FakeEffects {
    runner: FakeRunner,
}

impl Effects for FakeEffects {
    fn process(&self) -> &dyn ProcessRunner {
        &self.runner
    }
}

/// A temporary project directory wired to a [`FakeRunner`].
pub(crate) struct FakeProject {
    pub dir: TempDir,
    pub global: GlobalOptions,
    effects: Arc<FakeEffects>,
}

impl FakeProject {
    pub(crate) fn new(runner: FakeRunner) -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
            global: GlobalOptions {
                python: Some("python3".to_string()),
                ..GlobalOptions::default()
            },
            effects: Arc::new(FakeEffects { runner }),
        }
    }

    pub(crate) fn ctx(&self) -> CommandContext<'_> {
        let effects: SharedEffects = self.effects.clone();
        CommandContext::with_root(&self.global, effects, self.dir.path().to_path_buf())
    }

    pub(crate) fn runner(&self) -> &FakeRunner {
        &self.effects.runner
    }

    pub(crate) fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }
}

fn package_name(entry: &str) -> &str {
    entry.split_once("==").map_or(entry, |(name, _)| name)
}

fn ok(stdout: &str) -> RunOutput {
    RunOutput {
        code: 0,
        stdout: stdout.to_string(),
        stderr: String::new(),
    }
}

fn fail(code: i32, stderr: &str) -> RunOutput {
    RunOutput {
        code,
        stdout: String::new(),
        stderr: stderr.to_string(),
    }
}
