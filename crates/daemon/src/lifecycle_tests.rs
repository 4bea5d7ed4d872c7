// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::path::Path;

fn test_config(dir: &Path) -> Config {
    Config {
        state_dir: dir.to_path_buf(),
        lock_path: dir.join("convoyd.pid"),
        log_path: dir.join("convoyd.log"),
        config_path: dir.join("convoy.toml"),
    }
}

#[test]
fn startup_writes_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let _daemon = startup(&config).unwrap();

    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
}

#[test]
fn second_startup_fails_while_lock_held() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let _daemon = startup(&config).unwrap();
    let err = startup(&config).unwrap_err();
    assert!(matches!(err, LifecycleError::LockFailed(_)));
}

#[test]
fn lock_released_after_daemon_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    {
        let _daemon = startup(&config).unwrap();
    }
    // Lock was dropped with the DaemonState; a new daemon can start.
    let _daemon = startup(&config).unwrap();
}

#[test]
fn shutdown_removes_pid_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut daemon = startup(&config).unwrap();
    assert!(config.lock_path.exists());

    daemon.shutdown().unwrap();
    assert!(!config.lock_path.exists());
}

#[test]
fn shutdown_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());

    let mut daemon = startup(&config).unwrap();
    daemon.shutdown().unwrap();
    daemon.shutdown().unwrap();
}
