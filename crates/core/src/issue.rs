// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Issue data model
//!
//! Issues come from the backing store and are never created by this
//! daemon. A convoy is an ordinary issue whose type marks it as a
//! tracking container.

use serde::{Deserialize, Serialize};

crate::define_id! {
    /// Identifier of an issue in a backing store.
    ///
    /// Store ids are `<prefix>-<hash>` strings; the prefix names the
    /// rig/store the issue belongs to and drives dispatch routing.
    pub struct IssueId;
}

impl IssueId {
    /// The routing prefix of this id: everything before the final `-`
    /// segment. Returns an empty string for ids with no separator.
    pub fn prefix(&self) -> &str {
        match self.0.rsplit_once('-') {
            Some((prefix, _)) => prefix,
            None => "",
        }
    }
}

/// Lifecycle status of an issue.
///
/// Stores may grow new statuses; anything unrecognized round-trips
/// through `Other` rather than failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IssueStatus {
    Open,
    InProgress,
    Closed,
    /// Soft-deleted; terminal like `Closed`.
    Tombstone,
    Other(String),
}

impl IssueStatus {
    /// True for statuses that count as "closed" for convoy accounting.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Closed | Self::Tombstone)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Closed => "closed",
            Self::Tombstone => "tombstone",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for IssueStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "open" => Self::Open,
            "in_progress" => Self::InProgress,
            "closed" => Self::Closed,
            "tombstone" => Self::Tombstone,
            _ => Self::Other(s),
        }
    }
}

impl From<IssueStatus> for String {
    fn from(status: IssueStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An issue as returned by the backing store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub id: IssueId,
    /// Free-form type string; empty means "task".
    #[serde(default, alias = "type")]
    pub issue_type: String,
    pub status: IssueStatus,
    /// Empty if unassigned.
    #[serde(default)]
    pub assignee: String,
    #[serde(default)]
    pub title: String,
}

impl Issue {
    /// True if the issue counts as closed for convoy accounting.
    pub fn is_closed(&self) -> bool {
        self.status.is_terminal()
    }

    /// True if the issue is assigned to a worker.
    pub fn is_assigned(&self) -> bool {
        !self.assignee.is_empty()
    }
}

#[cfg(test)]
#[path = "issue_tests.rs"]
mod tests;
