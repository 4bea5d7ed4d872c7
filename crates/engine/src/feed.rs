// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convoy feed engine
//!
//! Feeds at most one ready issue per invocation so a reconciliation
//! pass cannot spawn an unbounded number of workers at once. Closing
//! and dispatching are idempotent at the dispatch boundary, which is
//! what lets the event path and the stranded scanner race on the same
//! convoy without a shared lock.

use crate::error::EngineError;
use crate::guard::{is_blocked, is_slingable};
use convoy_adapters::{Dispatcher, IssueStore, RigRouter};
use convoy_core::{DepKind, Issue, IssueId};
use tracing::{debug, info, warn};

/// Machine-readable reason attached to automatic convoy closes.
pub const CLOSE_REASON: &str = "all-tracked-closed";

/// Outcome of one feed-engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedOutcome {
    /// Exactly one issue was dispatched.
    Dispatched(IssueId),
    /// The convoy was closed.
    Closed,
    /// Nothing to do (already closed, nothing ready, or every
    /// candidate failed to dispatch).
    Noop,
}

/// Decides and performs the next action for a convoy.
pub struct FeedEngine<S, D, R> {
    store: S,
    dispatch: D,
    router: R,
}

impl<S, D, R> FeedEngine<S, D, R>
where
    S: IssueStore,
    D: Dispatcher,
    R: RigRouter,
{
    pub fn new(store: S, dispatch: D, router: R) -> Self {
        Self {
            store,
            dispatch,
            router,
        }
    }

    /// Reconcile one convoy: close it if every tracked issue is closed,
    /// otherwise dispatch at most one ready issue.
    ///
    /// Idempotent: an already-closed convoy is a pure no-op, and a
    /// convoy with no ready candidates returns `Noop` rather than an
    /// error.
    pub async fn check_convoy(&self, convoy_id: &IssueId) -> Result<FeedOutcome, EngineError> {
        let convoy = self.store.get_issue(convoy_id).await?;
        if convoy.is_closed() {
            debug!(convoy = %convoy_id, "convoy already closed");
            return Ok(FeedOutcome::Noop);
        }

        let member_ids = self
            .store
            .dependents_of(convoy_id, DepKind::Tracks)
            .await?;
        let members = self.store.get_issues(&member_ids).await?;

        let open: Vec<&Issue> = members.iter().filter(|m| !m.is_closed()).collect();
        if open.is_empty() {
            self.dispatch.close_convoy(convoy_id, CLOSE_REASON).await?;
            info!(convoy = %convoy_id, tracked = members.len(), "convoy complete, closed");
            return Ok(FeedOutcome::Closed);
        }

        // Candidate order is the store's creation order.
        let mut ready = Vec::new();
        for member in &open {
            if !is_slingable(&member.issue_type) {
                continue;
            }
            if member.is_assigned() {
                continue;
            }
            if is_blocked(&member.id, &self.store).await {
                continue;
            }
            ready.push(member.id.clone());
        }

        if ready.is_empty() {
            debug!(
                convoy = %convoy_id,
                open = open.len(),
                "no ready issues to feed"
            );
            return Ok(FeedOutcome::Noop);
        }

        Ok(self.feed_first_ready(convoy_id, &ready).await)
    }

    /// Dispatch the first candidate that routes and slings successfully.
    ///
    /// At most one issue is fed per invocation. Routing and dispatch
    /// failures skip to the next candidate; if every candidate fails
    /// the convoy is left for the next pass.
    pub async fn feed_first_ready(&self, convoy_id: &IssueId, ready: &[IssueId]) -> FeedOutcome {
        for issue_id in ready {
            let prefix = issue_id.prefix();
            let Some(rig) = self.router.resolve_rig(prefix) else {
                warn!(
                    convoy = %convoy_id,
                    issue = %issue_id,
                    prefix,
                    "cannot resolve rig for issue, skipping"
                );
                continue;
            };

            match self.dispatch.sling(issue_id, &rig).await {
                Ok(()) => {
                    info!(convoy = %convoy_id, issue = %issue_id, rig, "fed convoy");
                    return FeedOutcome::Dispatched(issue_id.clone());
                }
                Err(e) => {
                    warn!(
                        convoy = %convoy_id,
                        issue = %issue_id,
                        rig,
                        error = %e,
                        "dispatch failed, trying next candidate"
                    );
                }
            }
        }
        FeedOutcome::Noop
    }

    /// Close a convoy with no open tracked issues.
    ///
    /// Idempotent: a convoy that is already closed returns `Noop`
    /// without issuing a close request.
    pub async fn close_empty_convoy(&self, convoy_id: &IssueId) -> Result<FeedOutcome, EngineError> {
        let convoy = self.store.get_issue(convoy_id).await?;
        if convoy.is_closed() {
            debug!(convoy = %convoy_id, "convoy already closed");
            return Ok(FeedOutcome::Noop);
        }
        self.dispatch.close_convoy(convoy_id, CLOSE_REASON).await?;
        info!(convoy = %convoy_id, "closed empty convoy");
        Ok(FeedOutcome::Closed)
    }

    /// Run `check_convoy` for every open convoy tracking the given
    /// issue. Invoked by the event poller on completion events and
    /// directly callable to trigger reconciliation for one issue.
    ///
    /// A failure checking one convoy is logged and does not stop the
    /// remaining convoys from being checked.
    pub async fn check_convoys_for_issue(
        &self,
        issue_id: &IssueId,
    ) -> Result<Vec<(IssueId, FeedOutcome)>, EngineError> {
        let deps = self.store.dependencies_of(issue_id).await?;
        let mut outcomes = Vec::new();
        for dep in deps.iter().filter(|d| d.kind == DepKind::Tracks) {
            if dep.target_status.is_terminal() {
                continue;
            }
            match self.check_convoy(&dep.target_id).await {
                Ok(outcome) => outcomes.push((dep.target_id.clone(), outcome)),
                Err(e) => {
                    warn!(
                        convoy = %dep.target_id,
                        issue = %issue_id,
                        error = %e,
                        "convoy check failed"
                    );
                }
            }
        }
        Ok(outcomes)
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
