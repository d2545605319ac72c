// Integration tests for the bubblexan CLI surface.
//
// These tests use assert_cmd to invoke the binary and verify
// exit codes, stdout/stderr output, and argument validation.
//
// Prerequisites: tempfile, assert_cmd, predicates (dev-dependencies).
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Builds a Command for the bubblexan binary rooted in `dir`, isolated from
/// any user-level configuration.
fn bubblexan(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("bubblexan").expect("binary should exist");
    cmd.current_dir(dir.path()).env("HOME", dir.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_version_flag() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("bubblexan"));
}

#[test]
fn cli_help_flag() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Bubble-sheet"))
        .stdout(predicate::str::contains("give-back"));
}

#[test]
fn generate_requires_question_count() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .args(["generate", "--output", "exam"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn generate_rejects_out_of_range_questions() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .args(["generate", "--questions", "51", "--output", "exam"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "error: questions must be between 1 and 50",
        ));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn generate_rejects_unknown_paper_size() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .args(["generate", "--questions", "5", "--output", "exam"])
        .args(["--paper-size", "legal"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn grade_without_inputs_or_session_fails() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .arg("grade")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("RESPONSES is required"));
}

#[test]
fn give_back_rejects_bad_version_label() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .args(["give-back", "--results", "r.csv", "--key", "k.csv"])
        .args(["--give-back", "Q1", "--version", "v 1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("version label"));
}

#[test]
fn analyze_rejects_partial_threshold_above_one() {
    let dir = TempDir::new().expect("temp dir should be created");
    bubblexan(&dir)
        .args(["analyze", "--results", "r.csv", "--key", "k.csv"])
        .args(["--output", "miss.csv", "--partial-threshold", "1.5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("partial-threshold"));
}

#[test]
fn invalid_config_is_reported() {
    let dir = TempDir::new().expect("temp dir should be created");
    std::fs::write(
        dir.path().join("bubblexan.toml"),
        "[layout]\nid_length = 20\n",
    )
    .expect("config should be written");
    bubblexan(&dir)
        .args(["session", "list"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config parse error"));
}
