// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event poller
//!
//! One poller per backing store, each owning that store's high-water
//! mark. The mark is seeded from the store's current latest event id on
//! the first poll (warm-up) so a daemon restart never replays the
//! store's whole event log, and advances monotonically after every
//! subsequent poll whether or not any event triggered work.

use convoy_adapters::{Dispatcher, EventFeed, IssueStore, RigRouter};
use convoy_core::IssueId;
use convoy_engine::FeedEngine;
use std::sync::Arc;
use tracing::{debug, warn};

/// Polls one store's event feed and fans completion events out to the
/// convoys tracking the completed issue.
pub struct EventPoller<F, S, D, R> {
    store_name: String,
    feed: F,
    engine: Arc<FeedEngine<S, D, R>>,
    /// Last event id consumed; `None` until the warm-up poll runs.
    last_seen: Option<u64>,
}

impl<F, S, D, R> EventPoller<F, S, D, R>
where
    F: EventFeed,
    S: IssueStore,
    D: Dispatcher,
    R: RigRouter,
{
    pub fn new(store_name: impl Into<String>, feed: F, engine: Arc<FeedEngine<S, D, R>>) -> Self {
        Self {
            store_name: store_name.into(),
            feed,
            engine,
            last_seen: None,
        }
    }

    /// Current high-water mark (`None` before warm-up).
    pub fn high_water_mark(&self) -> Option<u64> {
        self.last_seen
    }

    /// One poll pass over this store's feed.
    ///
    /// The first call seeds the high-water mark and processes nothing.
    /// Read errors are logged and retried on the next interval; the
    /// mark is left untouched so no event is skipped.
    pub async fn poll_once(&mut self) {
        let Some(mark) = self.last_seen else {
            match self.feed.latest_id().await {
                Ok(id) => {
                    debug!(store = %self.store_name, id, "seeded event high-water mark");
                    self.last_seen = Some(id);
                }
                Err(e) => {
                    warn!(store = %self.store_name, error = %e, "event warm-up failed");
                }
            }
            return;
        };

        let events = match self.feed.events_since(mark).await {
            Ok(events) => events,
            Err(e) => {
                warn!(store = %self.store_name, error = %e, "event poll failed");
                return;
            }
        };
        if events.is_empty() {
            return;
        }

        let mut highest = mark;
        for event in &events {
            highest = highest.max(event.id);

            // Only completion events with an issue id trigger work;
            // everything else is consumed without side effects.
            if !event.is_completion() || event.issue_id.is_empty() {
                continue;
            }

            let issue_id = IssueId::new(&event.issue_id);
            match self.engine.check_convoys_for_issue(&issue_id).await {
                Ok(outcomes) => {
                    debug!(
                        store = %self.store_name,
                        issue = %issue_id,
                        event = event.id,
                        convoys = outcomes.len(),
                        "processed completion event"
                    );
                }
                Err(e) => {
                    warn!(
                        store = %self.store_name,
                        issue = %issue_id,
                        event = event.id,
                        error = %e,
                        "convoy check for completion event failed"
                    );
                }
            }
        }

        self.last_seen = Some(highest);
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
