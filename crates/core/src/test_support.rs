// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{Dependency, DepKind, Issue, IssueId, IssueStatus, StoreEvent};

/// Build an open, unassigned issue of the given type.
pub fn issue(id: &str, issue_type: &str) -> Issue {
    Issue {
        id: IssueId::new(id),
        issue_type: issue_type.to_string(),
        status: IssueStatus::Open,
        assignee: String::new(),
        title: format!("test issue {id}"),
    }
}

/// Build an issue with an explicit status.
pub fn issue_with_status(id: &str, issue_type: &str, status: IssueStatus) -> Issue {
    Issue {
        status,
        ..issue(id, issue_type)
    }
}

/// Build a closed issue.
pub fn closed_issue(id: &str, issue_type: &str) -> Issue {
    issue_with_status(id, issue_type, IssueStatus::Closed)
}

/// Build an assigned issue.
pub fn assigned_issue(id: &str, issue_type: &str, assignee: &str) -> Issue {
    Issue {
        assignee: assignee.to_string(),
        ..issue(id, issue_type)
    }
}

/// Build a convoy container issue.
pub fn convoy(id: &str) -> Issue {
    issue(id, "convoy")
}

/// Build a dependency edge record.
pub fn dep(target_id: &str, kind: DepKind, target_status: IssueStatus) -> Dependency {
    Dependency {
        target_id: IssueId::new(target_id),
        kind,
        target_status,
    }
}

/// Build a completion event.
pub fn closed_event(id: u64, issue_id: &str) -> StoreEvent {
    StoreEvent {
        id,
        kind: crate::EVENT_CLOSED.to_string(),
        issue_id: issue_id.to_string(),
        timestamp: "2026-01-02T03:04:05Z".to_string(),
    }
}

/// Build an event of an arbitrary kind.
pub fn event(id: u64, kind: &str, issue_id: &str) -> StoreEvent {
    StoreEvent {
        id,
        kind: kind.to_string(),
        issue_id: issue_id.to_string(),
        timestamp: "2026-01-02T03:04:05Z".to_string(),
    }
}
