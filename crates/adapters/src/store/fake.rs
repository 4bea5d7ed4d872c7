// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake issue store for testing

use super::{IssueStore, StoreError};
use async_trait::async_trait;
use convoy_core::{DepKind, Dependency, Issue, IssueId, IssueStatus};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Recorded store call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    GetIssue { id: IssueId },
    GetIssues { ids: Vec<IssueId> },
    DependenciesOf { id: IssueId },
    DependentsOf { id: IssueId, kind: DepKind },
}

#[derive(Debug, Clone)]
struct Edge {
    from: IssueId,
    to: IssueId,
    kind: DepKind,
}

struct FakeStoreState {
    issues: HashMap<IssueId, Issue>,
    /// Insertion order stands in for creation order.
    edges: Vec<Edge>,
    calls: Vec<StoreCall>,
    fail_dependencies_of: HashSet<IssueId>,
    fail_all: bool,
}

/// Fake issue store for testing.
///
/// Edges are returned in insertion order, matching the creation-order
/// contract of the real store.
#[derive(Clone)]
pub struct FakeIssueStore {
    inner: Arc<Mutex<FakeStoreState>>,
}

impl Default for FakeIssueStore {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeStoreState {
                issues: HashMap::new(),
                edges: Vec::new(),
                calls: Vec::new(),
                fail_dependencies_of: HashSet::new(),
                fail_all: false,
            })),
        }
    }
}

impl FakeIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_issue(&self, issue: Issue) {
        self.inner.lock().issues.insert(issue.id.clone(), issue);
    }

    /// Add a dependency edge from -> to.
    pub fn add_edge(&self, from: &IssueId, to: &IssueId, kind: DepKind) {
        self.inner.lock().edges.push(Edge {
            from: from.clone(),
            to: to.clone(),
            kind,
        });
    }

    /// Register a `tracks` membership edge: member -> convoy.
    pub fn track(&self, member: &IssueId, convoy: &IssueId) {
        self.add_edge(member, convoy, DepKind::Tracks);
    }

    pub fn set_status(&self, id: &IssueId, status: IssueStatus) {
        if let Some(issue) = self.inner.lock().issues.get_mut(id) {
            issue.status = status;
        }
    }

    pub fn set_assignee(&self, id: &IssueId, assignee: &str) {
        if let Some(issue) = self.inner.lock().issues.get_mut(id) {
            issue.assignee = assignee.to_string();
        }
    }

    /// Make `dependencies_of` fail for one issue.
    pub fn fail_dependencies_of(&self, id: &IssueId) {
        self.inner.lock().fail_dependencies_of.insert(id.clone());
    }

    /// Make every store call fail.
    pub fn set_fail_all(&self, fail: bool) {
        self.inner.lock().fail_all = fail;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<StoreCall> {
        self.inner.lock().calls.clone()
    }

    pub fn get(&self, id: &IssueId) -> Option<Issue> {
        self.inner.lock().issues.get(id).cloned()
    }

    fn check_fail_all(&self) -> Result<(), StoreError> {
        if self.inner.lock().fail_all {
            Err(StoreError::CommandFailed("injected store failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl IssueStore for FakeIssueStore {
    async fn get_issue(&self, id: &IssueId) -> Result<Issue, StoreError> {
        self.inner
            .lock()
            .calls
            .push(StoreCall::GetIssue { id: id.clone() });
        self.check_fail_all()?;
        self.inner
            .lock()
            .issues
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn get_issues(&self, ids: &[IssueId]) -> Result<Vec<Issue>, StoreError> {
        self.inner
            .lock()
            .calls
            .push(StoreCall::GetIssues { ids: ids.to_vec() });
        self.check_fail_all()?;
        let inner = self.inner.lock();
        Ok(ids
            .iter()
            .filter_map(|id| inner.issues.get(id).cloned())
            .collect())
    }

    async fn dependencies_of(&self, id: &IssueId) -> Result<Vec<Dependency>, StoreError> {
        let mut inner = self.inner.lock();
        inner
            .calls
            .push(StoreCall::DependenciesOf { id: id.clone() });
        if inner.fail_all || inner.fail_dependencies_of.contains(id) {
            return Err(StoreError::CommandFailed(
                "injected store failure".to_string(),
            ));
        }
        let deps = inner
            .edges
            .iter()
            .filter(|e| &e.from == id)
            .map(|e| Dependency {
                target_id: e.to.clone(),
                kind: e.kind.clone(),
                target_status: inner
                    .issues
                    .get(&e.to)
                    .map(|i| i.status.clone())
                    .unwrap_or(IssueStatus::Open),
            })
            .collect();
        Ok(deps)
    }

    async fn dependents_of(&self, id: &IssueId, kind: DepKind) -> Result<Vec<IssueId>, StoreError> {
        let mut inner = self.inner.lock();
        inner.calls.push(StoreCall::DependentsOf {
            id: id.clone(),
            kind: kind.clone(),
        });
        if inner.fail_all {
            return Err(StoreError::CommandFailed(
                "injected store failure".to_string(),
            ));
        }
        Ok(inner
            .edges
            .iter()
            .filter(|e| &e.to == id && e.kind == kind)
            .map(|e| e.from.clone())
            .collect())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
