// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `cv` town CLI dispatcher

use super::{DispatchError, Dispatcher, StrandedConvoy};
use crate::subprocess::{run_with_timeout, CV_TIMEOUT};
use async_trait::async_trait;
use convoy_core::IssueId;
use std::path::PathBuf;
use tokio::process::Command;

/// Dispatcher backed by the `cv` town CLI.
#[derive(Clone)]
pub struct CvDispatcher {
    town_root: PathBuf,
}

impl CvDispatcher {
    pub fn new(town_root: impl Into<PathBuf>) -> Self {
        Self {
            town_root: town_root.into(),
        }
    }

    async fn run_cv(&self, args: &[&str]) -> Result<String, DispatchError> {
        let mut cmd = Command::new("cv");
        cmd.args(args).current_dir(&self.town_root);
        let output = run_with_timeout(cmd, CV_TIMEOUT, "cv")
            .await
            .map_err(DispatchError::CommandFailed)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DispatchError::CommandFailed(format!(
                "cv {}: {}",
                args.join(" "),
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[async_trait]
impl Dispatcher for CvDispatcher {
    async fn sling(&self, issue: &IssueId, rig: &str) -> Result<(), DispatchError> {
        self.run_cv(&["sling", issue.as_str(), "--rig", rig]).await?;
        Ok(())
    }

    async fn check_convoy(&self, convoy: &IssueId) -> Result<(), DispatchError> {
        self.run_cv(&["convoy", "check", convoy.as_str()]).await?;
        Ok(())
    }

    async fn close_convoy(&self, convoy: &IssueId, reason: &str) -> Result<(), DispatchError> {
        self.run_cv(&["convoy", "close", convoy.as_str(), "--reason", reason])
            .await?;
        Ok(())
    }

    async fn list_stranded(&self) -> Result<Vec<StrandedConvoy>, DispatchError> {
        let stdout = self.run_cv(&["convoy", "stranded", "--json"]).await?;
        parse_stranded(&stdout)
    }
}

/// Parse `cv convoy stranded --json` output.
fn parse_stranded(stdout: &str) -> Result<Vec<StrandedConvoy>, DispatchError> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(trimmed).map_err(|e| DispatchError::Parse(e.to_string()))
}

#[cfg(test)]
#[path = "cv_tests.rs"]
mod tests;
