// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `bd` CLI issue store adapter
//!
//! Each rig keeps its own store database; issue ids are routed to the
//! right database directory by prefix, falling back to the town root.

use super::{IssueStore, StoreError};
use crate::subprocess::{run_with_timeout, BD_TIMEOUT};
use async_trait::async_trait;
use convoy_core::{DepKind, Dependency, Issue, IssueId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::process::Command;

/// Issue store backed by the `bd` CLI.
#[derive(Clone)]
pub struct BdIssueStore {
    town_root: PathBuf,
    /// Issue-id prefix -> store database directory.
    stores: Arc<HashMap<String, PathBuf>>,
}

impl BdIssueStore {
    pub fn new(town_root: impl Into<PathBuf>, stores: HashMap<String, PathBuf>) -> Self {
        Self {
            town_root: town_root.into(),
            stores: Arc::new(stores),
        }
    }

    /// Database directory for an issue id: its prefix's store, or the
    /// town root when the prefix is unknown.
    fn dir_for(&self, id: &IssueId) -> &Path {
        self.stores
            .get(id.prefix())
            .map(PathBuf::as_path)
            .unwrap_or(&self.town_root)
    }

    async fn run_bd(&self, dir: &Path, args: &[&str]) -> Result<String, StoreError> {
        let mut cmd = Command::new("bd");
        cmd.args(args).arg("--json").current_dir(dir);
        let output = run_with_timeout(cmd, BD_TIMEOUT, "bd")
            .await
            .map_err(StoreError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StoreError::CommandFailed(format!(
                "bd {}: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl IssueStore for BdIssueStore {
    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError> {
        let dir = self.dir_for(id);
        let stdout = self.run_bd(dir, &["show", id.as_str()]).await?;
        parse_issues(&stdout)?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_issues(&self, ids: &[IssueId]) -> Result<Vec<Issue>, StoreError> {
        // Ids may span store databases, so fetch one at a time and drop
        // the ones that no longer resolve.
        let mut issues = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get_issue(id).await {
                Ok(issue) => issues.push(issue),
                Err(StoreError::NotFound(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(issues)
    }

    async fn dependencies_of(&self, id: &IssueId) -> Result<Vec<Dependency>, StoreError> {
        let dir = self.dir_for(id);
        let stdout = self
            .run_bd(dir, &["dep", "list", id.as_str(), "--direction=down"])
            .await?;
        parse_deps(&stdout)
    }

    async fn dependents_of(&self, id: &IssueId, kind: DepKind) -> Result<Vec<IssueId>, StoreError> {
        let dir = self.dir_for(id);
        let kind_arg = format!("--type={}", kind.as_str());
        let stdout = self
            .run_bd(dir, &["dep", "list", id.as_str(), "--direction=up", &kind_arg])
            .await?;
        Ok(parse_deps(&stdout)?
            .into_iter()
            .map(|d| d.target_id)
            .collect())
    }
}

/// Parse `bd show --json` output: a single issue object or an array.
fn parse_issues(stdout: &str) -> Result<Vec<Issue>, StoreError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if trimmed.starts_with('[') {
        serde_json::from_str(trimmed).map_err(|e| StoreError::Parse(e.to_string()))
    } else {
        let issue: Issue =
            serde_json::from_str(trimmed).map_err(|e| StoreError::Parse(e.to_string()))?;
        Ok(vec![issue])
    }
}

/// Parse `bd dep list --json` output. Either direction yields rows of
/// the issue on the far end of the edge plus the edge type.
fn parse_deps(stdout: &str) -> Result<Vec<Dependency>, StoreError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| StoreError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "bd_tests.rs"]
mod tests;
