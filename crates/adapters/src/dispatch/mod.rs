// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch boundary adapters
//!
//! The dispatch boundary is the town CLI: it assigns issues to rigs,
//! runs the town-side convoy check, closes convoys, and reports
//! stranded convoys. The daemon treats all of it as untrusted I/O.

mod cv;

pub use cv::CvDispatcher;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{DispatchCall, FakeDispatcher};

use async_trait::async_trait;
use convoy_core::IssueId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from dispatch boundary operations
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("dispatch command failed: {0}")]
    CommandFailed(String),
    #[error("unparsable dispatch response: {0}")]
    Parse(String),
}

/// One stranded convoy entry from the town's stranded query.
///
/// `ready_issues` is pre-filtered for slingability upstream; an empty
/// list marks the convoy as a closure candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrandedConvoy {
    #[serde(rename = "id")]
    pub convoy_id: IssueId,
    #[serde(default)]
    pub ready_count: usize,
    #[serde(default)]
    pub ready_issues: Vec<IssueId>,
}

/// Adapter for assigning work and managing convoys through the town CLI.
#[async_trait]
pub trait Dispatcher: Clone + Send + Sync + 'static {
    /// Assign an issue to a rig's worker pool.
    async fn sling(&self, issue: &IssueId, rig: &str) -> Result<(), DispatchError>;

    /// Town-side convoy check, distinct from the engine's internal
    /// check. Exposed for operators and external tooling; the
    /// reconciliation loops use the engine's own check.
    async fn check_convoy(&self, convoy: &IssueId) -> Result<(), DispatchError>;

    /// Close a convoy with a machine-readable reason.
    async fn close_convoy(&self, convoy: &IssueId, reason: &str) -> Result<(), DispatchError>;

    /// Open convoys with ready work and no active worker, or with no
    /// ready work at all.
    async fn list_stranded(&self) -> Result<Vec<StrandedConvoy>, DispatchError>;
}
