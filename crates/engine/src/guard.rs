// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch safety guards
//!
//! Pure predicates shared by both reconciliation paths. Only leaf work
//! units are ever auto-dispatched; containers and planning artifacts
//! (epics, convoys, decisions) must not be.

use convoy_adapters::IssueStore;
use convoy_core::IssueId;
use tracing::warn;

/// Issue types eligible for automatic dispatch. The empty string
/// defaults to "task". Closed set: anything else is refused.
const SLINGABLE_TYPES: &[&str] = &["", "task", "bug", "feature", "chore"];

/// True if issues of this type may be auto-dispatched to a worker.
pub fn is_slingable(issue_type: &str) -> bool {
    SLINGABLE_TYPES.contains(&issue_type)
}

/// True iff any blocking-kind edge points at a non-closed issue.
///
/// `parent-child` edges never block: a child task is dispatchable while
/// its parent remains open. A store read error returns `false`
/// (fail-open) so a transient outage cannot permanently stall a convoy;
/// the next reconciliation pass re-evaluates with fresh state.
pub async fn is_blocked<S: IssueStore>(issue: &IssueId, store: &S) -> bool {
    let deps = match store.dependencies_of(issue).await {
        Ok(deps) => deps,
        Err(e) => {
            warn!(issue = %issue, error = %e, "dependency lookup failed, treating as unblocked");
            return false;
        }
    };
    deps.iter().any(|dep| dep.blocks_source())
}

#[cfg(test)]
#[path = "guard_tests.rs"]
mod tests;
