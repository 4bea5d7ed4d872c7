// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconciliation manager
//!
//! Owns the two reconciliation paths: one event poller loop per
//! configured backing store, plus the stranded scanner loop. The loops
//! are independent tasks sharing one cancellation channel and no other
//! state; the only mutable state, each store's high-water mark, lives
//! inside its poller task (single writer).

use convoy_adapters::{Dispatcher, EventFeed, IssueStore, RigRouter};
use convoy_core::IssueId;
use convoy_engine::{EngineError, FeedEngine, FeedOutcome};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::{DEFAULT_EVENT_POLL, DEFAULT_SCAN_INTERVAL};
use crate::poller::EventPoller;
use crate::scanner::StrandedScanner;

/// Bound on how long `stop` waits for the loops to exit.
pub const STOP_DEADLINE: Duration = Duration::from_secs(5);

/// Loop intervals.
#[derive(Debug, Clone, Copy)]
pub struct Timing {
    pub scan_interval: Duration,
    pub event_poll: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            scan_interval: DEFAULT_SCAN_INTERVAL,
            event_poll: DEFAULT_EVENT_POLL,
        }
    }
}

/// Manager adapter dependencies
pub struct ManagerDeps<S, F, D, R> {
    pub store: S,
    pub dispatch: D,
    pub router: R,
    /// One event feed per configured backing store.
    pub feeds: Vec<(String, F)>,
}

/// Lifecycle errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManagerError {
    #[error("reconciliation already running")]
    AlreadyRunning,
    #[error("reconciliation manager already stopped")]
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ManagerState {
    NotStarted,
    Running,
    Stopped,
}

/// Runs both reconciliation loops with clean start/stop semantics.
pub struct ReconcileManager<S, F, D, R> {
    engine: Arc<FeedEngine<S, D, R>>,
    dispatch: D,
    feeds: Vec<(String, F)>,
    timing: Timing,
    state: Mutex<ManagerState>,
    cancel_tx: watch::Sender<bool>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl<S, F, D, R> ReconcileManager<S, F, D, R>
where
    S: IssueStore,
    F: EventFeed,
    D: Dispatcher,
    R: RigRouter,
{
    pub fn new(deps: ManagerDeps<S, F, D, R>, timing: Timing) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        let engine = Arc::new(FeedEngine::new(
            deps.store,
            deps.dispatch.clone(),
            deps.router,
        ));
        Self {
            engine,
            dispatch: deps.dispatch,
            feeds: deps.feeds,
            timing,
            state: Mutex::new(ManagerState::NotStarted),
            cancel_tx,
            handles: Mutex::new(Vec::new()),
        }
    }

    /// Launch the poller loops and the scanner loop.
    ///
    /// A second `start` while running is rejected rather than spawning
    /// duplicate loops; a manager that has been stopped stays stopped.
    pub fn start(&self) -> Result<(), ManagerError> {
        {
            let mut state = self.state.lock();
            match *state {
                ManagerState::Running => return Err(ManagerError::AlreadyRunning),
                ManagerState::Stopped => return Err(ManagerError::Stopped),
                ManagerState::NotStarted => *state = ManagerState::Running,
            }
        }

        let mut handles = self.handles.lock();
        for (store_name, feed) in &self.feeds {
            handles.push(tokio::spawn(poller_loop(
                store_name.clone(),
                feed.clone(),
                Arc::clone(&self.engine),
                self.timing.event_poll,
                self.cancel_tx.subscribe(),
            )));
        }
        handles.push(tokio::spawn(scanner_loop(
            StrandedScanner::new(Arc::clone(&self.engine), self.dispatch.clone()),
            self.timing.scan_interval,
            self.cancel_tx.subscribe(),
        )));

        info!(
            stores = self.feeds.len(),
            scan_interval_secs = self.timing.scan_interval.as_secs(),
            "reconciliation started"
        );
        Ok(())
    }

    /// Cancel both loops and wait for them to exit, bounded by
    /// [`STOP_DEADLINE`].
    ///
    /// Safe to call repeatedly and before `start` (both are no-ops).
    pub async fn stop(&self) {
        {
            let mut state = self.state.lock();
            match *state {
                ManagerState::Running => *state = ManagerState::Stopped,
                _ => return,
            }
        }

        let _ = self.cancel_tx.send(true);

        let handles: Vec<JoinHandle<()>> = std::mem::take(&mut *self.handles.lock());
        let deadline = tokio::time::Instant::now() + STOP_DEADLINE;
        for handle in handles {
            let abort = handle.abort_handle();
            match tokio::time::timeout_at(deadline, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(error = %e, "reconciliation loop ended abnormally"),
                Err(_) => {
                    warn!("shutdown deadline elapsed, aborting loop");
                    abort.abort();
                }
            }
        }
        info!("reconciliation stopped");
    }

    /// Trigger reconciliation for every convoy tracking an issue,
    /// without waiting for its completion event to be polled.
    pub async fn check_convoys_for_issue(
        &self,
        issue_id: &IssueId,
    ) -> Result<Vec<(IssueId, FeedOutcome)>, EngineError> {
        self.engine.check_convoys_for_issue(issue_id).await
    }
}

/// Event poller loop for one backing store.
async fn poller_loop<F, S, D, R>(
    store_name: String,
    feed: F,
    engine: Arc<FeedEngine<S, D, R>>,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
) where
    F: EventFeed,
    S: IssueStore,
    D: Dispatcher,
    R: RigRouter,
{
    let mut poller = EventPoller::new(store_name.clone(), feed.clone(), Arc::clone(&engine));
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.changed() => break,
            _ = ticker.tick() => {}
        }
        if *cancel.borrow() {
            break;
        }

        // One bad iteration must not take the loop down.
        match tokio::spawn(async move {
            poller.poll_once().await;
            poller
        })
        .await
        {
            Ok(returned) => poller = returned,
            Err(e) => {
                error!(store = %store_name, error = %e, "event poll iteration aborted");
                // A fresh poller re-seeds its mark without replaying history.
                poller = EventPoller::new(store_name.clone(), feed.clone(), Arc::clone(&engine));
            }
        }
    }
    debug!(store = %store_name, "event poller exited");
}

/// Stranded scanner loop.
async fn scanner_loop<S, D, R>(
    scanner: StrandedScanner<S, D, R>,
    interval: Duration,
    mut cancel: watch::Receiver<bool>,
) where
    S: IssueStore,
    D: Dispatcher,
    R: RigRouter,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.changed() => break,
            _ = ticker.tick() => {}
        }
        if *cancel.borrow() {
            break;
        }

        let scan = scanner.clone();
        let scan_cancel = cancel.clone();
        // One bad iteration must not take the loop down.
        if let Err(e) = tokio::spawn(async move { scan.scan(&scan_cancel).await }).await {
            error!(error = %e, "stranded scan iteration aborted");
        }
    }
    debug!("stranded scanner exited");
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
