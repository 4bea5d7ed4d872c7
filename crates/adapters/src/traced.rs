// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::dispatch::{DispatchError, Dispatcher, StrandedConvoy};
use async_trait::async_trait;
use convoy_core::IssueId;
use tracing::Instrument;

/// Wrapper that adds tracing to any Dispatcher
#[derive(Clone)]
pub struct TracedDispatch<D> {
    inner: D,
}

impl<D> TracedDispatch<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<D: Dispatcher> Dispatcher for TracedDispatch<D> {
    async fn sling(&self, issue: &IssueId, rig: &str) -> Result<(), DispatchError> {
        async {
            let start = std::time::Instant::now();
            let result = self.inner.sling(issue, rig).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(()) => tracing::info!(elapsed_ms, "slung"),
                Err(e) => tracing::warn!(elapsed_ms, error = %e, "sling failed"),
            }
            result
        }
        .instrument(tracing::info_span!("dispatch.sling", issue = %issue, rig))
        .await
    }

    async fn check_convoy(&self, convoy: &IssueId) -> Result<(), DispatchError> {
        let result = self.inner.check_convoy(convoy).await;
        if let Err(ref e) = result {
            tracing::warn!(convoy = %convoy, error = %e, "town convoy check failed");
        }
        result
    }

    async fn close_convoy(&self, convoy: &IssueId, reason: &str) -> Result<(), DispatchError> {
        async {
            let result = self.inner.close_convoy(convoy, reason).await;
            match &result {
                Ok(()) => tracing::info!("convoy closed"),
                Err(e) => tracing::warn!(error = %e, "convoy close failed"),
            }
            result
        }
        .instrument(tracing::info_span!("dispatch.close", convoy = %convoy, reason))
        .await
    }

    async fn list_stranded(&self) -> Result<Vec<StrandedConvoy>, DispatchError> {
        let result = self.inner.list_stranded().await;
        match &result {
            Ok(list) => tracing::debug!(count = list.len(), "stranded query"),
            Err(e) => tracing::warn!(error = %e, "stranded query failed"),
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
