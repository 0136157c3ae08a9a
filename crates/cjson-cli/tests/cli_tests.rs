//! Integration tests for the `cjson` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the format, check,
//! and stats subcommands through the actual binary, including stdin/stdout piping,
//! file I/O, error reporting, and log verbosity.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper: path to the sample.json fixture.
fn sample_json_path() -> &'static str {
    concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/sample.json")
}

/// Helper: a scratch path under the system temp dir, unique per test name.
fn scratch_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("cjson-cli-test-{}-{}", std::process::id(), name))
}

fn cjson() -> Command {
    let mut cmd = Command::cargo_bin("cjson").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Format subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_stdin_to_stdout() {
    cjson()
        .arg("format")
        .write_stdin(r#"{"name":"Alice","age":30}"#)
        .assert()
        .success()
        .stdout("{\"name\": \"Alice\", \"age\": 30}\n");
}

#[test]
fn format_file_to_stdout() {
    cjson()
        .args(["format", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(r#"{"name": "Alice", "age": 30, "scores": [95, 87.5, 100]"#))
        .stdout(predicate::str::contains(r#""zip": null"#));
}

#[test]
fn format_file_to_file() {
    let output_path = scratch_path("format.json");
    let _ = std::fs::remove_file(&output_path);

    cjson()
        .args(["format", "-i", sample_json_path(), "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let ours: serde_json::Value = serde_json::from_str(&content).unwrap();
    let original: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(sample_json_path()).unwrap()).unwrap();
    assert_eq!(ours, original, "formatting must not change the document");

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn format_is_idempotent() {
    let once = cjson()
        .args(["format", "-i", sample_json_path()])
        .output()
        .expect("format should run");
    assert!(once.status.success());

    cjson()
        .arg("format")
        .write_stdin(once.stdout.clone())
        .assert()
        .success()
        .stdout(once.stdout);
}

#[test]
fn format_collapses_integral_floats() {
    cjson()
        .arg("format")
        .write_stdin("[1.0, 2.50, 1e3]")
        .assert()
        .success()
        .stdout("[1, 2.5, 1000]\n");
}

#[test]
fn format_invalid_json_fails() {
    cjson()
        .arg("format")
        .write_stdin("this is not valid json {{{")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to decode JSON"))
        .stderr(predicate::str::contains("syntax error at byte 0"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Check subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_accepts_valid_document() {
    cjson()
        .args(["check", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn check_accepts_lenient_forms() {
    cjson()
        .arg("check")
        .write_stdin("{\"n\": -.5, \"m\": 1., \"s\": \"\\q\"}\x0b")
        .assert()
        .success();
}

#[test]
fn check_reports_trailing_data() {
    cjson()
        .arg("check")
        .write_stdin("{} []")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected trailing characters at byte 3"));
}

#[test]
fn check_reports_invalid_utf8() {
    cjson()
        .arg("check")
        .write_stdin(b"\"ab\xff\"".to_vec())
        .assert()
        .failure()
        .stderr(predicate::str::contains("syntax error at byte 3"));
}

#[test]
fn check_missing_file_fails() {
    cjson()
        .args(["check", "-i", "/nonexistent/cjson/input.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stats_from_file() {
    let size = std::fs::metadata(sample_json_path()).unwrap().len();
    cjson()
        .args(["stats", "-i", sample_json_path()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("Size:      {} bytes", size)))
        .stdout(predicate::str::contains("Nodes:     11"))
        .stdout(predicate::str::contains("  objects: 2"))
        .stdout(predicate::str::contains("  arrays:  1"))
        .stdout(predicate::str::contains("  strings: 2"))
        .stdout(predicate::str::contains("  numbers: 4"))
        .stdout(predicate::str::contains("  bools:   1"))
        .stdout(predicate::str::contains("  nulls:   1"))
        .stdout(predicate::str::contains("Max depth: 2"));
}

#[test]
fn stats_on_scalar() {
    cjson()
        .arg("stats")
        .write_stdin("42")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nodes:     1"))
        .stdout(predicate::str::contains("Max depth: 0"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging and usage
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn verbose_logs_decode_failures() {
    cjson()
        .args(["--verbose", "check"])
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode failed"));
}

#[test]
fn verbose_logs_input_size() {
    cjson()
        .args(["--verbose", "check"])
        .write_stdin("[1, 2]")
        .assert()
        .success()
        .stdout("ok\n")
        .stderr(predicate::str::contains("read input"));
}

#[test]
fn quiet_by_default() {
    cjson()
        .arg("check")
        .write_stdin("[1,")
        .assert()
        .failure()
        .stderr(predicate::str::contains("decode failed").not())
        .stderr(predicate::str::contains("read input").not());
}

#[test]
fn help_flag_shows_usage() {
    cjson()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("stats"));
}

#[test]
fn unknown_subcommand_fails() {
    cjson()
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
