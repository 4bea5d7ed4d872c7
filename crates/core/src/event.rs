// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Store event feed entries

use serde::{Deserialize, Serialize};

/// Event kind that marks issue completion. Every other kind is ignored
/// by the reconciliation paths.
pub const EVENT_CLOSED: &str = "closed";

/// One entry from a backing store's event feed.
///
/// Ids are monotonically increasing within a store; no ordering is
/// guaranteed across stores. `issue_id` may be empty (store-level
/// events) and must be tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEvent {
    pub id: u64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub issue_id: String,
    #[serde(default)]
    pub timestamp: String,
}

impl StoreEvent {
    /// True if this event marks an issue reaching a closed state.
    pub fn is_completion(&self) -> bool {
        self.kind == EVENT_CLOSED
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
