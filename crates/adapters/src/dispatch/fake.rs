// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake dispatcher for testing

use super::{DispatchError, Dispatcher, StrandedConvoy};
use async_trait::async_trait;
use convoy_core::IssueId;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// Recorded dispatch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchCall {
    Sling { issue: IssueId, rig: String },
    CheckConvoy { convoy: IssueId },
    CloseConvoy { convoy: IssueId, reason: String },
    ListStranded,
}

struct FakeDispatchState {
    calls: Vec<DispatchCall>,
    fail_sling: HashSet<IssueId>,
    fail_close: HashSet<IssueId>,
    stranded: Result<Vec<StrandedConvoy>, String>,
}

/// Fake dispatcher for testing
#[derive(Clone)]
pub struct FakeDispatcher {
    inner: Arc<Mutex<FakeDispatchState>>,
}

impl Default for FakeDispatcher {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeDispatchState {
                calls: Vec::new(),
                fail_sling: HashSet::new(),
                fail_close: HashSet::new(),
                stranded: Ok(Vec::new()),
            })),
        }
    }
}

impl FakeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `sling` fail for one issue.
    pub fn fail_sling(&self, issue: &IssueId) {
        self.inner.lock().fail_sling.insert(issue.clone());
    }

    /// Make `close_convoy` fail for one convoy.
    pub fn fail_close(&self, convoy: &IssueId) {
        self.inner.lock().fail_close.insert(convoy.clone());
    }

    /// Script the stranded list returned by `list_stranded`.
    pub fn set_stranded(&self, stranded: Vec<StrandedConvoy>) {
        self.inner.lock().stranded = Ok(stranded);
    }

    /// Make `list_stranded` fail (query failure or unparsable payload).
    pub fn fail_stranded(&self, message: &str) {
        self.inner.lock().stranded = Err(message.to_string());
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.inner.lock().calls.clone()
    }

    /// Recorded sling calls only, in order.
    pub fn slings(&self) -> Vec<(IssueId, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                DispatchCall::Sling { issue, rig } => Some((issue.clone(), rig.clone())),
                _ => None,
            })
            .collect()
    }

    /// Recorded close calls only, in order.
    pub fn closes(&self) -> Vec<(IssueId, String)> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                DispatchCall::CloseConvoy { convoy, reason } => {
                    Some((convoy.clone(), reason.clone()))
                }
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl Dispatcher for FakeDispatcher {
    async fn sling(&self, issue: &IssueId, rig: &str) -> Result<(), DispatchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DispatchCall::Sling {
            issue: issue.clone(),
            rig: rig.to_string(),
        });
        if inner.fail_sling.contains(issue) {
            return Err(DispatchError::CommandFailed(format!(
                "injected sling failure for {issue}"
            )));
        }
        Ok(())
    }

    async fn check_convoy(&self, convoy: &IssueId) -> Result<(), DispatchError> {
        self.inner.lock().calls.push(DispatchCall::CheckConvoy {
            convoy: convoy.clone(),
        });
        Ok(())
    }

    async fn close_convoy(&self, convoy: &IssueId, reason: &str) -> Result<(), DispatchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DispatchCall::CloseConvoy {
            convoy: convoy.clone(),
            reason: reason.to_string(),
        });
        if inner.fail_close.contains(convoy) {
            return Err(DispatchError::CommandFailed(format!(
                "injected close failure for {convoy}"
            )));
        }
        Ok(())
    }

    async fn list_stranded(&self) -> Result<Vec<StrandedConvoy>, DispatchError> {
        let mut inner = self.inner.lock();
        inner.calls.push(DispatchCall::ListStranded);
        match &inner.stranded {
            Ok(list) => Ok(list.clone()),
            Err(message) => Err(DispatchError::Parse(message.clone())),
        }
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
