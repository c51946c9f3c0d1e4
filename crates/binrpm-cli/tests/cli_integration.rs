//! CLI subprocess integration tests.
//!
//! These tests invoke the `binrpm` binary as a subprocess and verify exit
//! codes, stdout content, and filesystem effects of a full mock-builder run.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

fn binrpm_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_binrpm"))
}

fn write_descriptor(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("rpm.json");
    fs::write(&path, content).unwrap();
    path
}

fn demo_descriptor(dir: &Path, source: &Path) -> PathBuf {
    write_descriptor(
        dir,
        &format!(
            r#"{{
  "name": "demo",
  "version": "1.0",
  "files": [{{"source": "{}", "dest": "/usr/bin/demo"}}]
}}"#,
            source.display()
        ),
    )
}

#[test]
fn cli_version_exits_zero() {
    let output = binrpm_bin().arg("--version").output().unwrap();
    assert!(output.status.success(), "binrpm --version must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("binrpm"),
        "version output must contain 'binrpm': {stdout}"
    );
}

#[test]
fn cli_help_lists_commands() {
    let output = binrpm_bin().arg("--help").output().unwrap();
    assert!(output.status.success(), "binrpm --help must exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("generate-spec"));
    assert!(stdout.contains("generate"));
    assert!(stdout.contains("test"));
}

#[test]
fn test_command_confirms_valid_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_descriptor(dir.path(), r#"{"name": "demo"}"#);

    let output = binrpm_bin()
        .args(["test", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("File is correct"));
}

#[test]
fn test_command_fails_on_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_descriptor(dir.path(), "{not json");

    let output = binrpm_bin()
        .args(["test", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_command_fails_on_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let output = binrpm_bin()
        .args(["test", "--file"])
        .arg(dir.path().join("absent.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not found"));
}

// Scenario A: the rendered header leads with the identity triple.
#[test]
fn generate_spec_header_triple() {
    let dir = tempfile::tempdir().unwrap();
    let file = demo_descriptor(dir.path(), Path::new("./bin/demo"));

    let output = binrpm_bin()
        .args(["generate-spec", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "Name: demo");
    assert_eq!(lines[1], "Version: 1.0");
    assert_eq!(lines[2], "Release: 1");
}

#[test]
fn generate_spec_arch_override_beats_file_value() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_descriptor(
        dir.path(),
        r#"{
  "name": "demo",
  "version": "1.0",
  "arch": "x86",
  "files": [{"source": "./bin/demo", "dest": "/usr/bin/demo"}]
}"#,
    );

    let output = binrpm_bin()
        .args(["generate-spec", "--arch", "arm64", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BuildArch: arm64\n"));
    assert!(!stdout.contains("BuildArch: x86\n"));
}

#[test]
fn generate_spec_fails_without_name() {
    let dir = tempfile::tempdir().unwrap();
    let file = write_descriptor(
        dir.path(),
        r#"{"files": [{"source": "./bin/demo", "dest": "/usr/bin/demo"}]}"#,
    );

    let output = binrpm_bin()
        .args(["generate-spec", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("name"));
}

#[test]
fn generate_requires_output_flag() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("demo-bin");
    fs::write(&source, b"x").unwrap();
    let file = demo_descriptor(dir.path(), &source);

    let output = binrpm_bin()
        .args(["generate", "--builder", "mock", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--output"));
}

// Scenario B: a full mock build creates the output directory and delivers
// exactly one artifact whose name embeds name, version, and architecture.
#[test]
fn generate_delivers_artifact_into_created_output_dir() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("demo-bin");
    fs::write(&source, b"#!/bin/sh\nexit 0\n").unwrap();
    let file = demo_descriptor(dir.path(), &source);
    let output_dir = dir.path().join("dist");

    let output = binrpm_bin()
        .args(["generate", "--builder", "mock", "--arch", "x86_64", "--file"])
        .arg(&file)
        .arg("--build-area")
        .arg(dir.path().join("pkg-build"))
        .arg("--output")
        .arg(&output_dir)
        .output()
        .unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "generate failed: {stderr}");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("All done!"));

    let entries: Vec<_> = fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(entries.len(), 1, "expected one artifact, got {entries:?}");
    assert!(entries[0].contains("demo"));
    assert!(entries[0].contains("1.0"));
    assert!(entries[0].contains("x86_64"));
}

// Scenario C: a relative destination fails validation before the build area
// is created.
#[test]
fn generate_validation_failure_precedes_build_area_creation() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("demo-bin");
    fs::write(&source, b"x").unwrap();
    let file = write_descriptor(
        dir.path(),
        &format!(
            r#"{{
  "name": "demo",
  "version": "1.0",
  "files": [{{"source": "{}", "dest": "usr/bin/demo"}}]
}}"#,
            source.display()
        ),
    );
    let build_area = dir.path().join("pkg-build");

    let output = binrpm_bin()
        .args(["generate", "--builder", "mock", "--file"])
        .arg(&file)
        .arg("--build-area")
        .arg(&build_area)
        .arg("--output")
        .arg(dir.path().join("dist"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("absolute"));
    assert!(!build_area.exists(), "build area must not be created");
}

#[test]
fn generate_unknown_builder_fails() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("demo-bin");
    fs::write(&source, b"x").unwrap();
    let file = demo_descriptor(dir.path(), &source);

    let output = binrpm_bin()
        .args(["generate", "--builder", "makepkg", "--file"])
        .arg(&file)
        .arg("--output")
        .arg(dir.path().join("dist"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown builder"));
}

#[test]
fn generate_spec_honors_env_arch_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let file = demo_descriptor(dir.path(), Path::new("./bin/demo"));

    let output = binrpm_bin()
        .env("BINRPM_ARCH", "ppc64le")
        .args(["generate-spec", "--file"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("BuildArch: ppc64le\n"));
}
