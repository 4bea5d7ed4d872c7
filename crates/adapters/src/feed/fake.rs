// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake event feed for testing

use super::{EventFeed, FeedError};
use async_trait::async_trait;
use convoy_core::StoreEvent;
use parking_lot::Mutex;
use std::sync::Arc;

/// Recorded feed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedCall {
    LatestId,
    EventsSince { since: u64 },
}

struct FakeFeedState {
    events: Vec<StoreEvent>,
    calls: Vec<FeedCall>,
    fail: bool,
}

/// Fake event feed for testing
#[derive(Clone)]
pub struct FakeEventFeed {
    inner: Arc<Mutex<FakeFeedState>>,
}

impl Default for FakeEventFeed {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeFeedState {
                events: Vec::new(),
                calls: Vec::new(),
                fail: false,
            })),
        }
    }
}

impl FakeEventFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: StoreEvent) {
        self.inner.lock().events.push(event);
    }

    /// Make every feed call fail.
    pub fn set_fail(&self, fail: bool) {
        self.inner.lock().fail = fail;
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<FeedCall> {
        self.inner.lock().calls.clone()
    }
}

#[async_trait]
impl EventFeed for FakeEventFeed {
    async fn latest_id(&self) -> Result<u64, FeedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FeedCall::LatestId);
        if inner.fail {
            return Err(FeedError::CommandFailed("injected feed failure".to_string()));
        }
        Ok(inner.events.iter().map(|e| e.id).max().unwrap_or(0))
    }

    async fn events_since(&self, since: u64) -> Result<Vec<StoreEvent>, FeedError> {
        let mut inner = self.inner.lock();
        inner.calls.push(FeedCall::EventsSince { since });
        if inner.fail {
            return Err(FeedError::CommandFailed("injected feed failure".to_string()));
        }
        let mut events: Vec<StoreEvent> = inner
            .events
            .iter()
            .filter(|e| e.id > since)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.id);
        Ok(events)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
