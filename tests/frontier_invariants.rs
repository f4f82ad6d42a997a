//! Queue counter and event invariants of the frontier wrapper.
//!
//! These tests drive a `Frontier` over in-memory stores and check:
//! - the session counter against an independent tally
//! - `queued` / `dequeued` pairing with the store results
//! - that failed store calls leave the counter and events untouched

mod helpers;

use std::sync::Arc;

use proptest::prelude::*;
use url_frontier::{
    Frontier, FrontierEvent, HookError, MemoryUrlStore, Status, StoreError, UrlInfo,
    DEQUEUED_URL, QUEUED_URL,
};

use helpers::{FailingStore, RecordingDispatcher};

fn recording_frontier() -> (
    Frontier<MemoryUrlStore, RecordingDispatcher>,
    Arc<RecordingDispatcher>,
) {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let frontier = Frontier::with_dispatcher(MemoryUrlStore::new(), Arc::clone(&dispatcher));
    (frontier, dispatcher)
}

#[tokio::test]
async fn test_construction_registers_both_events() {
    let (_frontier, dispatcher) = recording_frontier();
    assert_eq!(dispatcher.registered(), vec![QUEUED_URL, DEQUEUED_URL]);
}

#[tokio::test]
async fn test_queued_event_carries_parsed_url() {
    let (frontier, dispatcher) = recording_frontier();
    frontier.add_many(["example.com/page"]).await.unwrap();

    let events = dispatcher.events();
    assert_eq!(events.len(), 1);
    let (name, event) = &events[0];
    assert_eq!(name, QUEUED_URL);
    assert_eq!(
        event,
        &FrontierEvent::Queued {
            url_info: UrlInfo::parse("example.com/page").unwrap()
        }
    );
}

#[tokio::test]
async fn test_dequeued_event_matches_returned_record() {
    let (frontier, dispatcher) = recording_frontier();
    frontier
        .add_many(["http://a.test/", "http://b.test/"])
        .await
        .unwrap();

    let first = frontier.check_out(Status::Queued, None).await.unwrap();
    let second = frontier.check_out(Status::Queued, None).await.unwrap();

    let dequeued: Vec<FrontierEvent> = dispatcher
        .events()
        .into_iter()
        .filter(|(name, _)| name == DEQUEUED_URL)
        .map(|(_, e)| e)
        .collect();
    assert_eq!(dequeued.len(), 2);
    assert_eq!(dequeued[0].record(), Some(&first));
    assert_eq!(dequeued[1].record(), Some(&second));
    assert_eq!(dequeued[1].url_info().host, "b.test");
}

#[tokio::test]
async fn test_unparseable_record_check_out_still_decrements() {
    let (frontier, dispatcher) = recording_frontier();
    frontier.add_many(["not a valid url"]).await.unwrap();
    assert_eq!(frontier.queue_count(), 0);

    let record = frontier.check_out(Status::Queued, None).await.unwrap();
    assert_eq!(record.url, "not a valid url");
    assert_eq!(frontier.queue_count(), -1);
    assert!(dispatcher.events().is_empty());
}

#[tokio::test]
async fn test_error_check_in_of_unparseable_url_counts_without_event() {
    let (frontier, dispatcher) = recording_frontier();
    frontier.add_many(["not a valid url"]).await.unwrap();
    let record = frontier.check_out(Status::Queued, None).await.unwrap();
    frontier
        .check_in(&record.url, Status::Error, true, None)
        .await
        .unwrap();

    assert_eq!(frontier.queue_count(), 0);
    assert!(dispatcher.events().is_empty());
}

#[tokio::test]
async fn test_level_filter_passes_through() {
    let (frontier, _dispatcher) = recording_frontier();
    frontier
        .add_many([url_frontier::AddUrlInfo {
            url: "http://deep.test/".into(),
            level: 2,
            ..Default::default()
        }])
        .await
        .unwrap();

    let empty = frontier.check_out(Status::Queued, Some(2)).await;
    assert!(matches!(empty, Err(StoreError::QueueEmpty)));
    assert_eq!(frontier.queue_count(), 1);

    let record = frontier.check_out(Status::Queued, Some(3)).await.unwrap();
    assert_eq!(record.level, 2);
    assert_eq!(frontier.queue_count(), 0);
}

#[tokio::test]
async fn test_store_failures_leave_counter_untouched() {
    let dispatcher = Arc::new(RecordingDispatcher::default());
    let frontier = Frontier::with_dispatcher(FailingStore::default(), Arc::clone(&dispatcher));
    frontier.add_many(["http://a.test/"]).await.unwrap();
    let record = frontier.check_out(Status::Queued, None).await.unwrap();
    let events_before = dispatcher.events().len();

    frontier.store().set_failing(true);
    assert!(frontier.add_many(["http://b.test/"]).await.is_err());
    assert!(frontier.check_out(Status::Queued, None).await.is_err());
    assert!(frontier
        .check_in(&record.url, Status::Error, true, None)
        .await
        .is_err());

    assert_eq!(frontier.queue_count(), 0);
    assert_eq!(dispatcher.events().len(), events_before);

    frontier.store().set_failing(false);
    frontier
        .check_in(&record.url, Status::Error, true, None)
        .await
        .unwrap();
    assert_eq!(frontier.queue_count(), 1);
}

#[tokio::test]
async fn test_store_error_is_returned_unchanged() {
    let frontier = Frontier::new(FailingStore::default());
    frontier.store().set_failing(true);
    let err = frontier.add_many(["http://a.test/"]).await.unwrap_err();
    assert!(matches!(err, StoreError::Sql(sqlx::Error::PoolClosed)));
}

#[tokio::test]
async fn test_pass_through_operations_have_no_side_effects() {
    let (frontier, dispatcher) = recording_frontier();
    frontier
        .add_many(["http://a.test/", "http://b.test/"])
        .await
        .unwrap();
    frontier.check_out(Status::Queued, None).await.unwrap();
    let count = frontier.queue_count();
    let events = dispatcher.events().len();

    frontier.release().await.unwrap();
    frontier
        .update_one(
            "http://b.test/",
            url_frontier::RecordUpdate {
                level: Some(4),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    frontier
        .remove_many(&["http://b.test/".to_string()])
        .await
        .unwrap();
    assert_eq!(frontier.get_hostnames().await.unwrap(), vec!["a.test"]);

    assert_eq!(frontier.queue_count(), count);
    assert_eq!(dispatcher.events().len(), events);
}

#[tokio::test]
async fn test_declined_override_does_not_affect_notify() {
    struct Refuses;

    impl url_frontier::Hook for Refuses {
        fn on_attach(&self, event: &str) -> Result<(), HookError> {
            Err(HookError::Disconnected(event.to_string()))
        }

        fn call(&self, _event: &FrontierEvent) {
            unreachable!("declined hook is never attached");
        }
    }

    let (frontier, dispatcher) = recording_frontier();
    let result = frontier.set_hook(QUEUED_URL, Arc::new(Refuses));
    assert!(matches!(result, Err(HookError::Disconnected(_))));

    frontier.add_many(["http://a.test/"]).await.unwrap();
    assert_eq!(dispatcher.count(QUEUED_URL), 1);
    assert_eq!(frontier.queue_count(), 1);
}

#[derive(Debug, Clone)]
enum Op {
    Add(Vec<usize>),
    CheckOut(Status),
    CheckIn(Status),
}

const URL_POOL: &[&str] = &[
    "http://a.test/",
    "http://b.test/x",
    "https://c.test:8443/",
    "d.test",
    "not a valid url",
    "ftp://files.test/pub",
];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec(0..URL_POOL.len(), 0..4).prop_map(Op::Add),
        prop_oneof![Just(Status::Queued), Just(Status::Error)].prop_map(Op::CheckOut),
        prop_oneof![
            Just(Status::Done),
            Just(Status::Error),
            Just(Status::Skipped)
        ]
        .prop_map(Op::CheckIn),
    ]
}

/// Replays `ops` and returns (observed count, expected count,
/// queued events, expected queued, dequeued events, expected dequeued).
async fn replay(ops: Vec<Op>) -> (i64, i64, usize, usize, usize, usize) {
    let (frontier, dispatcher) = recording_frontier();
    let parses = |url: &str| UrlInfo::parse(url).is_ok();

    let mut expected = 0i64;
    let mut expected_queued = 0usize;
    let mut expected_dequeued = 0usize;
    let mut leased: Vec<String> = Vec::new();

    for op in ops {
        match op {
            Op::Add(indices) => {
                let urls: Vec<&str> = indices.iter().map(|&i| URL_POOL[i]).collect();
                let added = frontier.add_many(urls).await.unwrap();
                let parsed = added.iter().filter(|u| parses(u)).count();
                expected += parsed as i64;
                expected_queued += parsed;
            }
            Op::CheckOut(status) => match frontier.check_out(status, None).await {
                Ok(record) => {
                    expected -= 1;
                    if parses(&record.url) {
                        expected_dequeued += 1;
                    }
                    leased.push(record.url);
                }
                Err(e) => assert!(e.is_queue_empty()),
            },
            Op::CheckIn(status) => {
                if leased.is_empty() {
                    continue;
                }
                let url = leased.remove(0);
                frontier.check_in(&url, status, true, None).await.unwrap();
                if status == Status::Error {
                    expected += 1;
                    if parses(&url) {
                        expected_queued += 1;
                    }
                }
            }
        }
    }

    (
        frontier.queue_count(),
        expected,
        dispatcher.count(QUEUED_URL),
        expected_queued,
        dispatcher.count(DEQUEUED_URL),
        expected_dequeued,
    )
}

proptest! {
    #[test]
    fn prop_counter_matches_tally(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let (count, expected, queued, expected_queued, dequeued, expected_dequeued) =
            runtime.block_on(replay(ops));

        prop_assert_eq!(count, expected);
        prop_assert_eq!(queued, expected_queued);
        prop_assert_eq!(dequeued, expected_dequeued);
    }
}
