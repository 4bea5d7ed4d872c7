// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the feed engine

use convoy_adapters::{DispatchError, StoreError};
use thiserror::Error;

/// Errors that can occur while reconciling a convoy.
///
/// All of these are transient collaborator failures: callers log them
/// and retry on the next reconciliation pass.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("dispatch error: {0}")]
    Dispatch(#[from] DispatchError),
}
