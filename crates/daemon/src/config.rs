// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation configuration
//!
//! Loaded from `convoy.toml` in the state directory. Store names double
//! as issue-id prefixes: `[stores]` maps each prefix to its database
//! directory and `[rigs]` maps each prefix to the rig that receives its
//! dispatches.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::warn;

/// Default stranded-scan interval.
pub const DEFAULT_SCAN_INTERVAL: Duration = Duration::from_secs(120);

/// Default event feed poll interval.
pub const DEFAULT_EVENT_POLL: Duration = Duration::from_secs(5);

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk shape of `convoy.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    town_root: Option<PathBuf>,
    #[serde(default)]
    scan_interval_secs: Option<i64>,
    #[serde(default)]
    event_poll_secs: Option<i64>,
    #[serde(default)]
    stores: HashMap<String, PathBuf>,
    #[serde(default)]
    rigs: HashMap<String, String>,
}

/// Validated reconciliation configuration.
#[derive(Debug, Clone)]
pub struct ReconcileConfig {
    /// Root directory the store/dispatch CLIs run in.
    pub town_root: Option<PathBuf>,
    pub scan_interval: Duration,
    pub event_poll: Duration,
    /// Issue-id prefix -> store database directory.
    pub stores: HashMap<String, PathBuf>,
    /// Issue-id prefix -> rig name.
    pub rigs: HashMap<String, String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            town_root: None,
            scan_interval: DEFAULT_SCAN_INTERVAL,
            event_poll: DEFAULT_EVENT_POLL,
            stores: HashMap::new(),
            rigs: HashMap::new(),
        }
    }
}

impl ReconcileConfig {
    /// Load configuration from a `convoy.toml` file. A missing file
    /// yields the defaults; an unreadable or unparsable file is an
    /// error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str::<RawConfig>(&contents).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => RawConfig::default(),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        Self {
            town_root: raw.town_root,
            scan_interval: coerce_interval(
                raw.scan_interval_secs,
                DEFAULT_SCAN_INTERVAL,
                "scan_interval_secs",
            ),
            event_poll: coerce_interval(
                raw.event_poll_secs,
                DEFAULT_EVENT_POLL,
                "event_poll_secs",
            ),
            stores: raw.stores,
            rigs: raw.rigs,
        }
    }
}

/// Non-positive intervals are corrected to the default rather than
/// surfaced as errors.
fn coerce_interval(value: Option<i64>, default: Duration, field: &str) -> Duration {
    match value {
        None => default,
        Some(secs) if secs <= 0 => {
            warn!(field, secs, default_secs = default.as_secs(), "non-positive interval, using default");
            default
        }
        Some(secs) => Duration::from_secs(secs as u64),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
