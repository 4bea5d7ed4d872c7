// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bd` CLI event feed adapter

use super::{EventFeed, FeedError};
use crate::subprocess::{run_with_timeout, BD_TIMEOUT};
use async_trait::async_trait;
use convoy_core::StoreEvent;
use std::path::PathBuf;
use tokio::process::Command;

/// Event feed backed by one store's `bd event` log.
#[derive(Clone)]
pub struct BdEventFeed {
    store: String,
    dir: PathBuf,
}

impl BdEventFeed {
    pub fn new(store: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            dir: dir.into(),
        }
    }

    /// Name of the backing store this feed reads.
    pub fn store(&self) -> &str {
        &self.store
    }

    async fn run_bd(&self, args: &[&str]) -> Result<String, FeedError> {
        let mut cmd = Command::new("bd");
        cmd.args(args).arg("--json").current_dir(&self.dir);
        let output = run_with_timeout(cmd, BD_TIMEOUT, "bd event")
            .await
            .map_err(FeedError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FeedError::CommandFailed(format!(
                "bd {} ({}): {}",
                args.join(" "),
                self.store,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl EventFeed for BdEventFeed {
    async fn latest_id(&self) -> Result<u64, FeedError> {
        let stdout = self.run_bd(&["event", "list", "--limit", "1"]).await?;
        let events = parse_events(&stdout)?;
        Ok(events.iter().map(|e| e.id).max().unwrap_or(0))
    }

    async fn events_since(&self, since: u64) -> Result<Vec<StoreEvent>, FeedError> {
        let since_arg = format!("--since={since}");
        let stdout = self.run_bd(&["event", "list", &since_arg]).await?;
        let mut events = parse_events(&stdout)?;
        // Consumers require ascending id order
        events.sort_by_key(|e| e.id);
        Ok(events)
    }
}

/// Parse `bd event list --json` output.
fn parse_events(stdout: &str) -> Result<Vec<StoreEvent>, FeedError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| FeedError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "bd_tests.rs"]
mod tests;
