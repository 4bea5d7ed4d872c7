//! Daemon startup/shutdown specs

use crate::prelude::*;
use std::process::{Command, Stdio};

#[test]
fn daemon_starts_and_stops_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let mut daemon = DaemonUnderTest::spawn(dir.path());

    // PID file holds our child's pid while running.
    let pid = std::fs::read_to_string(daemon.pid_file()).unwrap();
    assert_eq!(pid.trim(), daemon.child.id().to_string());

    daemon.terminate();

    assert!(
        !daemon.pid_file().exists(),
        "pid file removed on graceful shutdown"
    );
}

#[test]
fn daemon_writes_startup_marker_to_log() {
    let dir = tempfile::tempdir().unwrap();
    let mut daemon = DaemonUnderTest::spawn(dir.path());

    let log = std::fs::read_to_string(daemon.log_file()).unwrap();
    assert!(
        log.contains("--- convoyd: starting (pid: "),
        "expected startup marker, got: {log}"
    );

    daemon.terminate();
}

#[test]
fn second_daemon_refuses_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let mut daemon = DaemonUnderTest::spawn(dir.path());

    let output = Command::new(convoyd_binary())
        .env("CONVOY_STATE_DIR", dir.path())
        .env("CONVOY_TOWN_ROOT", dir.path())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .unwrap();

    assert!(!output.status.success(), "second instance must exit nonzero");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("already running"),
        "expected already-running message, got: {stderr}"
    );
    assert!(
        stderr.contains(&daemon.child.id().to_string()),
        "expected first daemon's pid in message, got: {stderr}"
    );

    daemon.terminate();
}

#[test]
fn daemon_restarts_after_clean_shutdown() {
    let dir = tempfile::tempdir().unwrap();

    let mut first = DaemonUnderTest::spawn(dir.path());
    first.terminate();

    let mut second = DaemonUnderTest::spawn(dir.path());
    second.terminate();
}

#[test]
fn unparsable_config_fails_startup() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path()).unwrap();
    std::fs::write(dir.path().join("convoy.toml"), "stores = [broken").unwrap();

    let output = Command::new(convoyd_binary())
        .env("CONVOY_STATE_DIR", dir.path())
        .env("CONVOY_TOWN_ROOT", dir.path())
        .output()
        .unwrap();

    assert!(!output.status.success());
    // PID file is cleaned up by the failed startup path.
    assert!(!dir.path().join("convoyd.pid").exists());
}
