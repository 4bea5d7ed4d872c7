// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dependency edges between issues
//!
//! Edge orientation: a membership edge runs member -> convoy with kind
//! `tracks`. The members of a convoy are the sources of its incoming
//! `tracks` edges; the convoys tracking an issue are the `tracks`-kind
//! targets among the issue's outgoing edges.

use crate::issue::{IssueId, IssueStatus};
use serde::{Deserialize, Serialize};

/// Kind of a dependency edge.
///
/// Unknown kinds round-trip through `Other` and are never blocking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DepKind {
    /// Convoy membership; never blocking.
    Tracks,
    Blocks,
    ConditionalBlocks,
    WaitsFor,
    /// Hierarchy only; a child task is dispatchable while its parent is open.
    ParentChild,
    Other(String),
}

impl DepKind {
    /// True for edge kinds that make the source issue not ready while
    /// the target is open.
    pub fn is_blocking(&self) -> bool {
        matches!(self, Self::Blocks | Self::ConditionalBlocks | Self::WaitsFor)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Tracks => "tracks",
            Self::Blocks => "blocks",
            Self::ConditionalBlocks => "conditional-blocks",
            Self::WaitsFor => "waits-for",
            Self::ParentChild => "parent-child",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for DepKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "tracks" => Self::Tracks,
            "blocks" => Self::Blocks,
            "conditional-blocks" => Self::ConditionalBlocks,
            "waits-for" => Self::WaitsFor,
            "parent-child" => Self::ParentChild,
            _ => Self::Other(s),
        }
    }
}

impl From<DepKind> for String {
    fn from(kind: DepKind) -> Self {
        kind.as_str().to_string()
    }
}

impl std::fmt::Display for DepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One outgoing dependency edge of an issue, as returned by the store's
/// dependency listing (target id, edge kind, and the target's status so
/// blocking checks need no second lookup).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    #[serde(rename = "id")]
    pub target_id: IssueId,
    #[serde(rename = "type")]
    pub kind: DepKind,
    #[serde(rename = "status")]
    pub target_status: IssueStatus,
}

impl Dependency {
    /// True if this edge currently blocks its source issue.
    pub fn blocks_source(&self) -> bool {
        self.kind.is_blocking() && !self.target_status.is_terminal()
    }
}

#[cfg(test)]
#[path = "dependency_tests.rs"]
mod tests;
