#![cfg(unix)]

use std::fs;

mod common;

use common::{parse_json, sandbox, stdout};

#[test]
fn version_prints_cli_banner() {
    let sandbox = sandbox();
    let output = sandbox.pyp().arg("version").output().expect("run pyp");
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("pyp CLI "), "{}", stdout(&output));
}

#[test]
fn init_creates_environment_and_manifest() {
    let sandbox = sandbox();
    let output = sandbox
        .pyp()
        .args(["init", "--name", "demo", "--version", "1.0.0", "--license", "MIT"])
        .output()
        .expect("run pyp");
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("Environment created successfully"));
    assert!(sandbox.project.join(".env").is_dir());

    let manifest = sandbox.manifest();
    assert_eq!(manifest["project"]["name"].as_str(), Some("demo"));
    assert_eq!(manifest["project"]["version"].as_str(), Some("1.0.0"));
    assert_eq!(manifest["project"]["license"].as_str(), Some("MIT"));
    assert_eq!(manifest["python"]["version"].as_str(), Some("3.11.4"));
    assert!(manifest["scripts"]["test"].as_str().is_some());
    assert!(sandbox.dependencies().is_empty());
    assert!(manifest["project"].get("homepage").is_none());
}

#[test]
fn second_init_reports_existing_project() {
    let sandbox = sandbox();
    sandbox.init();
    fs::remove_dir_all(sandbox.project.join(".env")).expect("remove env");

    let output = sandbox.pyp().arg("init").output().expect("run pyp");
    assert!(output.status.success());
    assert!(stdout(&output).contains("Project already initialized"));
    assert!(sandbox.project.join(".env").is_dir());
    assert_eq!(sandbox.manifest()["project"]["name"].as_str(), Some("demo"));
}

#[test]
fn package_lifecycle_keeps_manifest_in_sync() {
    let sandbox = sandbox();
    sandbox.init();

    sandbox.pyp().args(["install", "flask"]).assert().success();
    assert_eq!(sandbox.dependencies(), vec!["flask==1.0.0"]);

    let check = sandbox.pyp().args(["check", "Flask"]).output().expect("run pyp");
    assert_eq!(stdout(&check), "Package Flask is installed\n");

    let list = sandbox.pyp().arg("list").output().expect("run pyp");
    assert_eq!(stdout(&list), "flask==1.0.0\n");

    sandbox.pyp().args(["upgrade", "flask"]).assert().success();
    assert_eq!(sandbox.dependencies(), vec!["flask==99.0.0"]);

    sandbox.pyp().args(["rm", "flask"]).assert().success();
    assert!(sandbox.dependencies().is_empty());
    let check = sandbox.pyp().args(["check", "flask"]).output().expect("run pyp");
    assert_eq!(stdout(&check), "Package flask is not installed\n");

    let log = sandbox.pip_log();
    assert!(log.contains("install --upgrade flask"));
    assert!(log.contains("uninstall -y flask"));
}

#[test]
fn install_without_arguments_uses_declared_dependencies() {
    let sandbox = sandbox();
    sandbox.init();
    let contents = fs::read_to_string(sandbox.manifest_path()).expect("read manifest");
    let mut doc: toml_edit::DocumentMut = contents.parse().expect("toml");
    let mut deps = toml_edit::Array::new();
    deps.push("requests==2.31.0");
    doc["project"]["dependencies"] = toml_edit::value(deps);
    fs::write(sandbox.manifest_path(), doc.to_string()).expect("write manifest");

    sandbox.pyp().arg("install").assert().success();
    assert!(sandbox.pip_log().lines().any(|line| line == "install requests==2.31.0"));
    assert_eq!(sandbox.dependencies(), vec!["requests==2.31.0"]);
}

#[test]
fn failed_install_explains_why() {
    let sandbox = sandbox();
    sandbox.init();
    let output = sandbox
        .pyp()
        .args(["install", "broken"])
        .output()
        .expect("run pyp");
    assert_eq!(output.status.code(), Some(2));
    let text = stdout(&output);
    assert!(text.contains("pip install failed"), "{text}");
    assert!(text.contains("Why:"));
    assert!(text.contains("No matching distribution found for broken"));
    assert!(sandbox.dependencies().is_empty());
}

#[test]
fn commands_outside_a_project_point_at_init() {
    let sandbox = sandbox();
    let output = sandbox
        .pyp()
        .args(["install", "flask"])
        .output()
        .expect("run pyp");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("pypconfig.toml not found"), "{text}");
    assert!(text.contains("pyp init"));
}

#[test]
fn run_script_prints_combined_output() {
    let sandbox = sandbox();
    sandbox.init();
    let contents = fs::read_to_string(sandbox.manifest_path()).expect("read manifest");
    let mut doc: toml_edit::DocumentMut = contents.parse().expect("toml");
    doc["scripts"]["greet"] = toml_edit::value("echo hello && echo warn >&2 && echo $VIRTUAL_ENV");
    doc["scripts"]["fail"] = toml_edit::value("echo partial && exit 3");
    fs::write(sandbox.manifest_path(), doc.to_string()).expect("write manifest");

    let output = sandbox
        .pyp()
        .args(["run-script", "greet"])
        .output()
        .expect("run pyp");
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("hello\nwarn\n"), "{text}");
    assert!(text.contains(".env"));

    let output = sandbox.pyp().args(["run", "fail"]).output().expect("run pyp");
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).starts_with("partial\n"));

    let output = sandbox
        .pyp()
        .args(["run-script", "deploy"])
        .output()
        .expect("run pyp");
    assert_eq!(output.status.code(), Some(1));
    let text = stdout(&output);
    assert!(text.contains("script `deploy` is not defined"), "{text}");
    assert!(text.contains("Available scripts: fail, greet, test"));
}

#[test]
fn json_envelope_wraps_outcome() {
    let sandbox = sandbox();
    sandbox.init();
    let output = sandbox
        .pyp()
        .args(["--json", "check", "requests"])
        .output()
        .expect("run pyp");
    assert!(output.status.success());
    let payload = parse_json(&output);
    assert_eq!(payload["status"], "ok");
    assert_eq!(
        payload["message"],
        "pyp check: Package requests is not installed"
    );
    assert_eq!(payload["details"]["installed"], false);
}

#[test]
fn missing_runtime_is_reported_as_failure() {
    let sandbox = sandbox();
    let output = sandbox
        .pyp()
        .env("PYP_PYTHON", sandbox.project.join("no-such-python"))
        .args(["--json", "list"])
        .output()
        .expect("run pyp");
    assert_eq!(output.status.code(), Some(2));
    let payload = parse_json(&output);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["details"]["reason"], "tool_not_found");
    assert_eq!(payload["details"]["tool"], "python");
}

#[test]
fn quiet_suppresses_human_output() {
    let sandbox = sandbox();
    let output = sandbox
        .pyp()
        .args(["-q", "version"])
        .output()
        .expect("run pyp");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}
