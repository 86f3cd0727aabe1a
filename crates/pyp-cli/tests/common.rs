#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    process::Output,
};

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;
use toml_edit::DocumentMut;

const FAKE_PYTHON: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "Python 3.11.4"
    exit 0
    ;;
  -m)
    case "$2" in
      pip)
        if [ "$3" = "--version" ]; then
          echo "pip 23.2.1 from /fake/site-packages/pip (python 3.11)"
          exit 0
        fi
        ;;
      venv)
        mkdir -p "$3/bin" && cp "@FAKE_PIP@" "$3/bin/pip" && chmod 755 "$3/bin/pip"
        exit $?
        ;;
    esac
    ;;
esac
echo "fake python: unsupported arguments: $*" >&2
exit 2
"#;

const FAKE_PIP: &str = r#"#!/bin/sh
state="$VIRTUAL_ENV/installed.txt"
touch "$state"
echo "$*" >> "$VIRTUAL_ENV/pip.log"
drop() {
  grep -vi "^$1==" "$state" > "$state.tmp"
  mv "$state.tmp" "$state"
}
case "$1" in
  list)
    cat "$state"
    exit 0
    ;;
  install)
    shift
    if [ "$1" = "--upgrade" ]; then
      if grep -qi "^$2==" "$state"; then
        drop "$2"
        echo "$2==99.0.0" >> "$state"
        exit 0
      fi
      echo "ERROR: No matching distribution found for $2" >&2
      exit 1
    fi
    for spec in "$@"; do
      if [ "$spec" = "broken" ]; then
        echo "ERROR: No matching distribution found for broken" >&2
        exit 1
      fi
    done
    for spec in "$@"; do
      case "$spec" in
        *==*) entry="$spec" ;;
        *) entry="$spec==1.0.0" ;;
      esac
      drop "${entry%%==*}"
      echo "$entry" >> "$state"
    done
    exit 0
    ;;
  uninstall)
    drop "$3"
    exit 0
    ;;
esac
echo "fake pip: unsupported arguments: $*" >&2
exit 2
"#;

/// A project directory plus a fake `python` whose venvs carry a fake `pip`.
pub struct Sandbox {
    _temp: TempDir,
    pub project: PathBuf,
    pub python: PathBuf,
}

pub fn sandbox() -> Sandbox {
    let temp = tempfile::Builder::new()
        .prefix("pyp-cli")
        .tempdir()
        .expect("tempdir");
    let tools = temp.path().join("tools");
    let project = temp.path().join("project");
    fs::create_dir_all(&tools).expect("tools dir");
    fs::create_dir_all(&project).expect("project dir");

    let pip = tools.join("fake-pip");
    write_executable(&pip, FAKE_PIP);
    let python = tools.join("python");
    let script = FAKE_PYTHON.replace("@FAKE_PIP@", &pip.display().to_string());
    write_executable(&python, &script);

    Sandbox {
        _temp: temp,
        project,
        python,
    }
}

fn write_executable(path: &Path, contents: &str) {
    fs::write(path, contents).expect("write script");
    let mut perms = fs::metadata(path).expect("metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("chmod");
}

impl Sandbox {
    pub fn pyp(&self) -> assert_cmd::Command {
        let mut cmd = cargo_bin_cmd!("pyp");
        cmd.current_dir(&self.project)
            .env("PYP_PYTHON", &self.python)
            .env("NO_COLOR", "1")
            .env_remove("VIRTUAL_ENV")
            .env_remove("PYTHONHOME");
        cmd
    }

    pub fn init(&self) {
        self.pyp()
            .args(["init", "--name", "demo", "--version", "1.0.0", "--license", "MIT"])
            .assert()
            .success();
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.project.join("pypconfig.toml")
    }

    pub fn manifest(&self) -> DocumentMut {
        fs::read_to_string(self.manifest_path())
            .expect("read manifest")
            .parse()
            .expect("valid toml")
    }

    pub fn dependencies(&self) -> Vec<String> {
        self.manifest()["project"]["dependencies"]
            .as_array()
            .expect("dependencies array")
            .iter()
            .map(|value| value.as_str().expect("string spec").to_string())
            .collect()
    }

    pub fn pip_log(&self) -> String {
        fs::read_to_string(self.project.join(".env").join("pip.log")).unwrap_or_default()
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn parse_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("valid json")
}
