//! Daemon help and version specs
//!
//! Verify convoyd --help, --version, and related flags work without
//! acquiring the daemon lock (no startup attempt).

use crate::prelude::*;
use std::process::Command;

fn convoyd() -> Command {
    Command::new(convoyd_binary())
}

#[test]
fn convoyd_version_shows_version() {
    let output = convoyd().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("convoyd 0.1.0"),
        "expected version line, got: {stdout}"
    );
}

#[test]
fn convoyd_short_version_shows_version() {
    let output = convoyd().arg("-v").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("convoyd 0.1.0"),
        "expected version line, got: {stdout}"
    );
}

#[test]
fn convoyd_help_shows_usage() {
    let output = convoyd().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("USAGE:"),
        "expected USAGE section, got: {stdout}"
    );
    assert!(stdout.contains("--help"), "expected --help in output");
    assert!(stdout.contains("--version"), "expected --version in output");
}

#[test]
fn convoyd_unknown_argument_fails() {
    let output = convoyd().arg("--bogus").output().unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unexpected argument"),
        "expected unexpected-argument error, got: {stderr}"
    );
}

#[test]
fn convoyd_help_does_not_touch_state_dir() {
    let dir = tempfile::tempdir().unwrap();
    let output = convoyd()
        .env("CONVOY_STATE_DIR", dir.path())
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(
        !dir.path().join("convoyd.pid").exists(),
        "--help must not acquire the daemon lock"
    );
}
