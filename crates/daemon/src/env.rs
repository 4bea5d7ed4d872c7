// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: CONVOY_STATE_DIR > XDG_STATE_HOME/convoy > ~/.local/state/convoy
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("CONVOY_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("convoy"));
    }
    let home = std::env::var("HOME").map_err(|_| LifecycleError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/convoy"))
}

/// Town root override (defaults to the daemon's working directory)
pub fn town_root() -> Option<PathBuf> {
    std::env::var("CONVOY_TOWN_ROOT").ok().map(PathBuf::from)
}

/// Stranded scan interval override (used by tests for fast cycles)
pub fn scan_interval_ms() -> Option<Duration> {
    std::env::var("CONVOY_SCAN_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Event poll interval override (used by tests for fast cycles)
pub fn event_poll_ms() -> Option<Duration> {
    std::env::var("CONVOY_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}
