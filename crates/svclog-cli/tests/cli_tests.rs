//! Integration tests for the svclog CLI binary.
//!
//! These tests exercise the actual compiled binary using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use svclog_test_utils::TestConfigDir;

/// Get a Command for the svclog binary with colors disabled
fn svclog_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("svclog"));
    cmd.env("NO_COLOR", "1");
    cmd
}

// ============================================================================
// Help
// ============================================================================

#[test]
fn test_help_output() {
    svclog_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("emit"));
}

// ============================================================================
// Configuration failures exit with status 2
// ============================================================================

#[test]
fn test_missing_default_exits_2() {
    let dir = TestConfigDir::new();

    svclog_cmd()
        .arg("check")
        .arg(dir.hint())
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with("error: "))
        .stderr(predicate::str::contains("config.logger.yml"));
}

#[test]
fn test_malformed_default_exits_2() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  level: [info\n");

    svclog_cmd()
        .arg("check")
        .arg(dir.hint())
        .assert()
        .code(2)
        .stderr(predicate::str::starts_with("error: "));
}

#[test]
fn test_invalid_level_exits_2() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  level: loud\n");

    svclog_cmd()
        .arg("check")
        .arg(dir.hint())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("loud"));
}

#[test]
fn test_emit_without_config_exits_2() {
    let dir = TestConfigDir::new();

    svclog_cmd()
        .args(["emit"])
        .arg(dir.hint())
        .arg("hello")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "svclog: failed to initialize logger: ",
        ))
        .stderr(predicate::str::contains("config.logger.yml"));
}

#[test]
fn test_emit_with_malformed_default_exits_2() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  level: [info\n");

    svclog_cmd()
        .args(["emit"])
        .arg(dir.hint())
        .arg("hello")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::starts_with(
            "svclog: failed to initialize logger: ",
        ));
}

#[test]
fn test_emit_with_unbuildable_config_exits_2() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  output_paths: [\"s3://bucket/app.log\"]\n");

    svclog_cmd()
        .args(["emit"])
        .arg(dir.hint())
        .arg("hello")
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("failed to initialize logger"));
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_lists_sources() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  level: warn\n");
    dir.write_override("engine:\n  level: debug\n");

    svclog_cmd()
        .arg("check")
        .arg(dir.hint())
        .assert()
        .success()
        .stdout(predicate::str::contains("config.logger.yml"))
        .stdout(predicate::str::contains("config.logger.override.yml"))
        .stdout(predicate::str::contains("level: debug"));
}

#[test]
fn test_check_json_output() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  encoding: console\nrotation:\n  max_backups: 4\n");

    let output = svclog_cmd()
        .args(["check", "--json"])
        .arg(dir.hint())
        .output()
        .unwrap();

    assert!(output.status.success());
    let resolved: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(resolved["descriptor"]["engine"]["encoding"], "console");
    assert_eq!(resolved["descriptor"]["rotation"]["max_backups"], 4);
    assert_eq!(resolved["sources"].as_array().unwrap().len(), 1);
}

// ============================================================================
// emit
// ============================================================================

#[test]
fn test_emit_writes_record() {
    let dir = TestConfigDir::new();
    dir.write_file_logger("info", "app.log");

    svclog_cmd()
        .args(["emit", "--level", "warn", "--name", "deploy", "-f", "attempt=2", "-f", "user=ann"])
        .arg(dir.hint())
        .arg("rolled back")
        .assert()
        .success();

    let records = dir.read_records("app.log");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "rolled back");
    assert_eq!(records[0]["level"], "warn");
    assert_eq!(records[0]["logger"], "deploy");
    assert_eq!(records[0]["attempt"], 2);
    assert_eq!(records[0]["user"], "ann");
}

#[test]
fn test_emit_below_level_writes_nothing() {
    let dir = TestConfigDir::new();
    dir.write_file_logger("error", "app.log");

    svclog_cmd()
        .args(["emit", "--level", "debug"])
        .arg(dir.hint())
        .arg("quiet")
        .assert()
        .success();

    assert_eq!(dir.read_log("app.log"), "");
}

#[test]
fn test_emit_fatal_exits_1_after_writing() {
    let dir = TestConfigDir::new();
    dir.write_file_logger("info", "app.log");

    svclog_cmd()
        .args(["emit", "--level", "fatal"])
        .arg(dir.hint())
        .arg("giving up")
        .assert()
        .code(1);

    assert_eq!(dir.read_records("app.log")[0]["level"], "fatal");
}

#[test]
fn test_emit_rejects_unknown_level() {
    let dir = TestConfigDir::new();
    dir.write_file_logger("info", "app.log");

    svclog_cmd()
        .args(["emit", "--level", "loud"])
        .arg(dir.hint())
        .arg("hello")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid level"));
}

#[test]
fn test_emit_rejects_malformed_field() {
    let dir = TestConfigDir::new();
    dir.write_file_logger("info", "app.log");

    svclog_cmd()
        .args(["emit", "-f", "oops"])
        .arg(dir.hint())
        .arg("hello")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("key=value"));
}

#[test]
fn test_verbose_prints_diagnostics() {
    let dir = TestConfigDir::new();
    dir.write_default("engine:\n  level: info\n");

    svclog_cmd()
        .args(["-v", "check"])
        .arg(dir.hint())
        .assert()
        .success()
        .stderr(predicate::str::contains("loading default logger config"));
}
