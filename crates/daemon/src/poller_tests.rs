// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use convoy_adapters::{FakeDispatcher, FakeEventFeed, FakeIssueStore, PrefixRouter};
use convoy_core::test_support::{closed_event, closed_issue, convoy, event};
use std::collections::HashMap;

type TestPoller = EventPoller<FakeEventFeed, FakeIssueStore, FakeDispatcher, PrefixRouter>;

struct Fixture {
    poller: TestPoller,
    feed: FakeEventFeed,
    store: FakeIssueStore,
    dispatch: FakeDispatcher,
}

fn setup() -> Fixture {
    let feed = FakeEventFeed::new();
    let store = FakeIssueStore::new();
    let dispatch = FakeDispatcher::new();
    let mut rigs = HashMap::new();
    rigs.insert("cv".to_string(), "mainrig".to_string());
    let engine = Arc::new(FeedEngine::new(
        store.clone(),
        dispatch.clone(),
        PrefixRouter::new(rigs),
    ));
    Fixture {
        poller: EventPoller::new("town", feed.clone(), engine),
        feed,
        store,
        dispatch,
    }
}

fn id(s: &str) -> IssueId {
    IssueId::new(s)
}

#[tokio::test]
async fn warm_up_seeds_mark_without_processing() {
    let mut f = setup();
    // History that must never be replayed.
    f.feed.push(closed_event(1, "cv-old"));
    f.feed.push(closed_event(2, "cv-older"));

    f.poller.poll_once().await;

    assert_eq!(f.poller.high_water_mark(), Some(2));
    assert!(f.store.calls().is_empty(), "warm-up touches no issues");
    assert!(f.dispatch.calls().is_empty());
}

#[tokio::test]
async fn warm_up_of_empty_feed_starts_at_zero() {
    let mut f = setup();
    f.poller.poll_once().await;
    assert_eq!(f.poller.high_water_mark(), Some(0));
}

#[tokio::test]
async fn completion_event_checks_tracking_convoys() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up

    f.store.add_issue(convoy("cv-convoy"));
    f.store.add_issue(closed_issue("cv-a", "task"));
    f.store.track(&id("cv-a"), &id("cv-convoy"));
    f.feed.push(closed_event(1, "cv-a"));

    f.poller.poll_once().await;

    assert_eq!(f.poller.high_water_mark(), Some(1));
    // The convoy's only member is closed, so the check closed it.
    assert_eq!(f.dispatch.closes().len(), 1);
}

#[tokio::test]
async fn irrelevant_events_advance_mark_with_zero_calls() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up

    f.feed.push(event(1, "created", "cv-a"));
    f.feed.push(event(2, "updated", "cv-a"));
    f.feed.push(event(3, "comment", ""));

    f.poller.poll_once().await;

    assert_eq!(f.poller.high_water_mark(), Some(3));
    assert!(f.store.calls().is_empty(), "no store reads for skipped events");
    assert!(f.dispatch.calls().is_empty(), "no dispatch calls for skipped events");
}

#[tokio::test]
async fn completion_event_with_empty_issue_id_is_skipped() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up

    f.feed.push(closed_event(5, ""));

    f.poller.poll_once().await;

    assert_eq!(f.poller.high_water_mark(), Some(5));
    assert!(f.store.calls().is_empty());
    assert!(f.dispatch.calls().is_empty());
}

#[tokio::test]
async fn mark_is_monotonic_across_polls() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up -> 0

    let mut last = 0;
    for batch in [vec![1u64, 2], vec![3], vec![], vec![4, 5, 6]] {
        for event_id in &batch {
            f.feed.push(event(*event_id, "updated", "cv-a"));
        }
        f.poller.poll_once().await;
        let mark = f.poller.high_water_mark().unwrap_or(0);
        assert!(mark >= last, "mark went backwards: {last} -> {mark}");
        last = mark;
    }
    assert_eq!(last, 6);
}

#[tokio::test]
async fn read_error_leaves_mark_untouched() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up -> 0
    f.feed.push(closed_event(1, "cv-a"));

    f.feed.set_fail(true);
    f.poller.poll_once().await;
    assert_eq!(f.poller.high_water_mark(), Some(0), "failed poll must not advance");

    // Next interval retries and catches up.
    f.feed.set_fail(false);
    f.store.add_issue(convoy("cv-convoy"));
    f.store.add_issue(closed_issue("cv-a", "task"));
    f.store.track(&id("cv-a"), &id("cv-convoy"));

    f.poller.poll_once().await;
    assert_eq!(f.poller.high_water_mark(), Some(1));
    assert_eq!(f.dispatch.closes().len(), 1);
}

#[tokio::test]
async fn warm_up_failure_retries_next_poll() {
    let mut f = setup();
    f.feed.set_fail(true);
    f.poller.poll_once().await;
    assert_eq!(f.poller.high_water_mark(), None, "warm-up still pending");

    f.feed.set_fail(false);
    f.feed.push(closed_event(9, "cv-a"));
    f.poller.poll_once().await;
    assert_eq!(f.poller.high_water_mark(), Some(9), "late warm-up seeds from latest");
    assert!(f.dispatch.calls().is_empty(), "warm-up never processes history");
}

#[tokio::test]
async fn engine_error_still_advances_mark() {
    let mut f = setup();
    f.poller.poll_once().await; // warm-up
    f.feed.push(closed_event(2, "cv-a"));
    // No issues in the store: the convoy lookup fails per-event, but
    // the event is consumed rather than retried forever.
    f.store.set_fail_all(true);

    f.poller.poll_once().await;

    assert_eq!(f.poller.high_water_mark(), Some(2));
}
