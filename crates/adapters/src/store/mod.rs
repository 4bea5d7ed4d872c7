// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency/issue store adapters

mod bd;

pub use bd::BdIssueStore;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeIssueStore, StoreCall};

use async_trait::async_trait;
use convoy_core::{DepKind, Dependency, Issue, IssueId};
use thiserror::Error;

/// Errors from issue store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("issue not found: {0}")]
    NotFound(String),
    #[error("store command failed: {0}")]
    CommandFailed(String),
    #[error("unparsable store response: {0}")]
    Parse(String),
}

/// Adapter for the dependency/issue store (`bd`, etc.)
#[async_trait]
pub trait IssueStore: Clone + Send + Sync + 'static {
    /// Fetch a single issue by id.
    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError>;

    /// Fetch a batch of issues. Ids that no longer resolve are omitted
    /// from the result, not treated as errors.
    async fn get_issues(&self, ids: &[IssueId]) -> Result<Vec<Issue>, StoreError>;

    /// Outgoing dependency edges of an issue, each with the target's
    /// current status.
    async fn dependencies_of(&self, id: &IssueId) -> Result<Vec<Dependency>, StoreError>;

    /// Sources of incoming edges of the given kind, in creation order.
    /// The order carries through to dispatch candidate selection.
    async fn dependents_of(&self, id: &IssueId, kind: DepKind) -> Result<Vec<IssueId>, StoreError>;
}
