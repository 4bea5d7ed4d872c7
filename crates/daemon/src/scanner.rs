// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stranded convoy scanner
//!
//! The periodic safety net behind the event path: convoys whose
//! completion events were missed (daemon restart, crashed worker, race
//! at startup) surface in the town's stranded query and get fed or
//! closed here.

use convoy_adapters::{Dispatcher, IssueStore, RigRouter};
use convoy_engine::{FeedEngine, FeedOutcome};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

/// Scans for stranded convoys and feeds or closes each one.
pub struct StrandedScanner<S, D, R> {
    engine: Arc<FeedEngine<S, D, R>>,
    dispatch: D,
}

impl<S, D, R> Clone for StrandedScanner<S, D, R>
where
    D: Clone,
{
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
            dispatch: self.dispatch.clone(),
        }
    }
}

impl<S, D, R> StrandedScanner<S, D, R>
where
    S: IssueStore,
    D: Dispatcher,
    R: RigRouter,
{
    pub fn new(engine: Arc<FeedEngine<S, D, R>>, dispatch: D) -> Self {
        Self { engine, dispatch }
    }

    /// One scan cycle.
    ///
    /// A failed or unparsable stranded query skips the whole cycle; a
    /// failure on one convoy never stops the rest. Cancellation is
    /// checked between convoys so a large scan aborts promptly once
    /// shutdown is requested.
    pub async fn scan(&self, cancel: &watch::Receiver<bool>) {
        let stranded = match self.dispatch.list_stranded().await {
            Ok(stranded) => stranded,
            Err(e) => {
                warn!(error = %e, "stranded query failed, skipping cycle");
                return;
            }
        };
        if stranded.is_empty() {
            return;
        }
        debug!(count = stranded.len(), "processing stranded convoys");

        for convoy in &stranded {
            if *cancel.borrow() {
                debug!("scan cancelled mid-cycle");
                return;
            }

            if convoy.ready_issues.is_empty() {
                match self.engine.close_empty_convoy(&convoy.convoy_id).await {
                    Ok(FeedOutcome::Closed) => {}
                    Ok(_) => {
                        debug!(convoy = %convoy.convoy_id, "stranded convoy already closed");
                    }
                    Err(e) => {
                        warn!(convoy = %convoy.convoy_id, error = %e, "close failed, continuing scan");
                    }
                }
            } else {
                let outcome = self
                    .engine
                    .feed_first_ready(&convoy.convoy_id, &convoy.ready_issues)
                    .await;
                if outcome == FeedOutcome::Noop {
                    warn!(
                        convoy = %convoy.convoy_id,
                        ready = convoy.ready_issues.len(),
                        "no stranded candidate dispatched, continuing scan"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "scanner_tests.rs"]
mod tests;
