//! CLI integration tests
//!
//! These run the built `nbparam` binary and check exit codes, stdout
//! reports and the files it writes.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const NBPARAM_VARS: &[&str] = &[
    "NBPARAM_LOG_LEVEL",
    "NBPARAM_LOG_JSON",
    "NBPARAM_HEADER_TAG",
    "NBPARAM_SNIPPET_TAG",
    "NBPARAM_FILE_EXTENSIONS",
    "NBPARAM_KERNEL_NAME",
    "NBPARAM_NBRUN_SCRIPT_URI",
    "NBPARAM_NBRUN_UTILS_URI",
    "NBPARAM_NBRUN_INSTANCE_TYPE",
    "NBPARAM_NBRUN_IMAGE",
    "RUST_LOG",
];

/// A command for the binary with a clean NBPARAM_* environment
fn nbparam() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_nbparam"));
    for var in NBPARAM_VARS {
        cmd.env_remove(var);
    }
    cmd
}

fn copy_fixture(dir: &TempDir, name: &str) -> PathBuf {
    let source = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/notebooks")
        .join(name);
    let target = dir.path().join(name);
    fs::copy(source, &target).expect("Failed to copy fixture");
    target
}

fn run(cmd: &mut Command) -> Output {
    cmd.output().expect("Failed to execute nbparam")
}

#[test]
fn test_cli_help() {
    let output = run(nbparam().arg("--help"));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nbparam"));
    assert!(stdout.contains("parameterize"));
    assert!(stdout.contains("scan"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_cli_version() {
    let output = run(nbparam().arg("--version"));

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("nbparam"));
}

#[test]
fn test_parameterize_json_report() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam()
        .arg("parameterize")
        .arg(&input)
        .args(["--format", "json", "-q"]));

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["parameters"]["PARAM_BUCKET"], "ml-data");
    assert_eq!(report["new_parameters"], 6);
    assert!(dir.path().join("training-parameterized.ipynb").exists());
}

#[test]
fn test_parameterize_explicit_output_and_snippet() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");
    let target = dir.path().join("run-me.ipynb");

    let output = run(nbparam()
        .arg("parameterize")
        .arg(&input)
        .arg("-o")
        .arg(&target)
        .args(["--snippet", "papermill"]));

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Notebook Parameterized"));
    assert!(stdout.contains("PARAM_S3_URI"));

    let written = fs::read_to_string(&target).unwrap();
    assert!(written.contains("# PAPERMILL SNIPPET"));
}

#[test]
fn test_nbrun_requires_configuration() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam()
        .arg("parameterize")
        .arg(&input)
        .args(["--snippet", "nbrun"]));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("NBPARAM_NBRUN_SCRIPT_URI"));
    assert!(!dir.path().join("training-parameterized.ipynb").exists());
}

#[test]
fn test_nbrun_with_configuration() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam()
        .env("NBPARAM_NBRUN_SCRIPT_URI", "s3://tools/NBRun.py")
        .env("NBPARAM_NBRUN_UTILS_URI", "s3://tools/nbrun_utils.py")
        .arg("parameterize")
        .arg(&input)
        .args(["--snippet", "nbrun", "-f", "yaml"]));

    assert!(output.status.success());
    let report: serde_yaml::Value = serde_yaml::from_slice(&output.stdout).unwrap();
    assert_eq!(report["snippet"].as_str(), Some("nbrun"));

    let written = fs::read_to_string(dir.path().join("training-parameterized.ipynb")).unwrap();
    assert!(written.contains("params_uri = \\\"\\\""));
}

#[test]
fn test_scan_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam().arg("scan").arg(&input).args(["-f", "json"]));

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["output"].is_null());
    assert_eq!(report["parameters"]["PARAM_AWS_REGION"], "us-east-1");

    let entries = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(entries, 1);
}

#[test]
fn test_malformed_input_fails() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "malformed.ipynb");

    let output = run(nbparam().arg("parameterize").arg(&input));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Malformed notebook"));
    assert!(!dir.path().join("malformed-parameterized.ipynb").exists());
}

#[test]
fn test_missing_input_fails() {
    let output = run(nbparam().args(["scan", "/definitely/not/here.ipynb"]));
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_configuration_fails() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam()
        .env("NBPARAM_HEADER_TAG", "two words")
        .arg("scan")
        .arg(&input));

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Configuration error"));
}

#[test]
fn test_config_command() {
    let output = run(nbparam()
        .env("NBPARAM_KERNEL_NAME", "ir")
        .args(["config", "--format", "json"]));

    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["kernel_name"], "ir");
    assert_eq!(config["header_tag"], "parameters");
}

#[test]
fn test_logs_stay_off_stdout() {
    let dir = TempDir::new().unwrap();
    let input = copy_fixture(&dir, "training.ipynb");

    let output = run(nbparam()
        .arg("--verbose")
        .arg("scan")
        .arg(&input)
        .args(["-f", "json"]));

    assert!(output.status.success());
    // stdout is exactly one JSON document even with debug logging on
    let _report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(!output.stderr.is_empty());
}
