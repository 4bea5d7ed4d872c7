// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the daemon's external collaborators: the issue store,
//! the per-store event feed, the dispatch boundary, and rig routing.

pub mod dispatch;
pub mod feed;
pub mod routing;
pub mod store;
pub mod subprocess;
pub mod traced;

pub use dispatch::{CvDispatcher, DispatchError, Dispatcher, StrandedConvoy};
pub use feed::{BdEventFeed, EventFeed, FeedError};
pub use routing::{PrefixRouter, RigRouter};
pub use store::{BdIssueStore, IssueStore, StoreError};
pub use traced::TracedDispatch;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use dispatch::{DispatchCall, FakeDispatcher};
#[cfg(any(test, feature = "test-support"))]
pub use feed::{FakeEventFeed, FeedCall};
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeIssueStore, StoreCall};
