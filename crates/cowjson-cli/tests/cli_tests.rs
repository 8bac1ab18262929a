//! Integration tests for the `cowjson` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the format,
//! validate and stats subcommands through the actual binary, including
//! stdin/stdout piping, file I/O, parse options and error reporting.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn cowjson() -> Command {
    Command::cargo_bin("cowjson").unwrap()
}

/// Helper: a per-test path under the system temp dir, removed up front.
fn temp_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("cowjson-cli-{}-{name}", std::process::id()));
    let _ = std::fs::remove_file(&path);
    path
}

// ─────────────────────────────────────────────────────────────────────────────
// Format subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn format_stdin_to_stdout() {
    cowjson()
        .arg("format")
        .write_stdin(r#"{"name":"Cain","age":23,"sex":"hahah"}"#)
        .assert()
        .success()
        .stdout("{\"age\":23,\"name\":\"Cain\",\"sex\":\"hahah\"}\n");
}

#[test]
fn format_compacts_whitespace() {
    cowjson()
        .arg("format")
        .write_stdin("[ 1 ,\n [ 2 , 3 ] ,\t4 ]\n")
        .assert()
        .success()
        .stdout("[1,[2,3],4]\n");
}

#[test]
fn format_output_is_valid_json() {
    let output = cowjson()
        .arg("format")
        .write_stdin(r#"{"list":[true,null,2.0,"x\ny"],"nested":{"k":{}}}"#)
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("must be valid JSON");
    assert_eq!(value["list"][3], "x\ny");
    assert!(value["nested"]["k"].is_object());
}

#[test]
fn format_file_to_file() {
    let input = temp_path("in.json");
    let output = temp_path("out.json");
    std::fs::write(&input, r#"{ "b" : [ ] , "a" : 1 }"#).unwrap();

    cowjson()
        .args(["format", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = std::fs::read_to_string(&output).unwrap();
    assert_eq!(written, "{\"a\":1,\"b\":[]}\n");

    let _ = std::fs::remove_file(input);
    let _ = std::fs::remove_file(output);
}

#[test]
fn format_empty_input_is_null() {
    cowjson()
        .arg("format")
        .write_stdin("")
        .assert()
        .success()
        .stdout("null\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse options
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn trailing_content_rejected_by_default() {
    cowjson()
        .arg("format")
        .write_stdin("[1] [2]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("trailing characters"));
}

#[test]
fn lenient_ignores_trailing_content() {
    cowjson()
        .args(["format", "--lenient"])
        .write_stdin("[1] [2]")
        .assert()
        .success()
        .stdout("[1]\n");
}

#[test]
fn max_depth_limits_nesting() {
    cowjson()
        .args(["format", "--max-depth", "2"])
        .write_stdin("[[1]]")
        .assert()
        .success();

    cowjson()
        .args(["format", "--max-depth", "2"])
        .write_stdin("[[[1]]]")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nesting deeper than 2 levels"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Validate subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn validate_accepts_valid_json() {
    cowjson()
        .arg("validate")
        .write_stdin(r#"{"ok":[1,2,3]}"#)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn validate_rejects_unquoted_key() {
    cowjson()
        .arg("validate")
        .write_stdin("{a:1}")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse stdin"))
        .stderr(predicate::str::contains(
            "format error at byte 1: the key must be a string",
        ));
}

#[test]
fn validate_rejects_trailing_comma() {
    cowjson()
        .arg("validate")
        .write_stdin(r#"{"a":1,}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("format error at byte 7"));
}

#[test]
fn validate_names_the_input_file() {
    let input = temp_path("broken.json");
    std::fs::write(&input, "[1 2]").unwrap();

    cowjson()
        .args(["validate", "-i"])
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.json"))
        .stderr(predicate::str::contains("expected `,` or `]`"));

    let _ = std::fs::remove_file(input);
}

// ─────────────────────────────────────────────────────────────────────────────
// Stats subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn stats_reports_types_and_depth() {
    cowjson()
        .arg("stats")
        .write_stdin(r#"{"a":[1,2.5,{"b":null}],"c":"s"}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("Root type:     object"))
        .stdout(predicate::str::contains("Max depth:     3"))
        .stdout(predicate::str::contains("Values:        7"))
        .stdout(predicate::str::contains("object:"))
        .stdout(predicate::str::contains("double:"));
}

#[test]
fn stats_reports_sizes() {
    cowjson()
        .arg("stats")
        .write_stdin("[ 1 , 2 ]")
        .assert()
        .success()
        .stdout(predicate::str::contains("Input size:    9 bytes"))
        .stdout(predicate::str::contains("Compact size:  5 bytes"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Error handling and logging
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn missing_input_file_fails() {
    cowjson()
        .args(["format", "-i", "/nonexistent/path/does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

#[test]
fn no_subcommand_shows_usage() {
    cowjson()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn verbose_logs_to_stderr_only() {
    cowjson()
        .args(["--verbose", "format"])
        .env_remove("RUST_LOG")
        .write_stdin("[true]")
        .assert()
        .success()
        .stdout("[true]\n")
        .stderr(predicate::str::contains("parsing input"));
}

#[test]
fn help_lists_subcommands() {
    cowjson()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("format"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("stats"));
}
