//! Binary-level CLI tests.
//!
//! These exercise the command surface without touching Kafka: help and
//! version output, and argument validation for the watch command.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_watch_command() {
    Command::cargo_bin("bablwatch")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn version_flag_reports_version() {
    Command::cargo_bin("bablwatch")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn watch_requires_brokers() {
    Command::cargo_bin("bablwatch")
        .unwrap()
        .arg("watch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--brokers"));
}

#[test]
fn missing_command_is_usage_error() {
    Command::cargo_bin("bablwatch")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn watch_help_documents_debug_flag() {
    Command::cargo_bin("bablwatch")
        .unwrap()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--debug"));
}
