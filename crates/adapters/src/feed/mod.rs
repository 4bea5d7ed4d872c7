// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-store event feed adapters

mod bd;

pub use bd::BdEventFeed;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeEventFeed, FeedCall};

use async_trait::async_trait;
use convoy_core::StoreEvent;
use thiserror::Error;

/// Errors from event feed operations
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("event feed command failed: {0}")]
    CommandFailed(String),
    #[error("unparsable event feed response: {0}")]
    Parse(String),
}

/// Adapter for one backing store's ordered event feed.
#[async_trait]
pub trait EventFeed: Clone + Send + Sync + 'static {
    /// Current highest event id in the store (0 if the log is empty).
    /// Used once per store to seed the high-water mark without
    /// replaying history.
    async fn latest_id(&self) -> Result<u64, FeedError>;

    /// Events strictly after `since`, in ascending id order.
    async fn events_since(&self, since: u64) -> Result<Vec<StoreEvent>, FeedError>;
}
