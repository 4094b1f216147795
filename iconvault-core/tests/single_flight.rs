//! Single-flight behaviour of the fetch coordinator under concurrent callers.

mod support;

use futures::future::join_all;
use iconvault_core::{
    HttpResponse, IconError, Tintability, TransportError,
};
use support::{GatedTransport, Harness, PLAIN_SVG, TINTABLE_SVG, eventually, key};

const CALLERS: usize = 16;

async fn concurrent_callers_share_one_fetch(harness: Harness) {
    let coordinator = harness.coordinator().clone();
    let home = key("mdi:home");

    let tasks: Vec<_> = (0..CALLERS)
        .map(|_| {
            let coordinator = coordinator.clone();
            let home = home.clone();
            tokio::spawn(async move { coordinator.ensure_cached(&home).await })
        })
        .collect();

    eventually(|| coordinator.stats().waiters == (CALLERS - 1) as u64).await;
    assert_eq!(harness.transport.calls(), 1);
    assert!(coordinator.is_in_flight(&home));

    harness.transport.release(1);

    for outcome in join_all(tasks).await {
        assert_eq!(outcome.expect("task"), Ok(Tintability::Tintable));
    }

    assert_eq!(harness.transport.calls(), 1);
    assert_eq!(harness.files(), vec!["mdi/home.t.svg".to_string()]);
    assert!(!coordinator.is_in_flight(&home));
    assert_eq!(coordinator.stats().leaders, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_fetch_in_memory() {
    concurrent_callers_share_one_fetch(Harness::new(GatedTransport::closed(
        GatedTransport::ok(TINTABLE_SVG),
    )))
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_share_one_fetch_on_disk() {
    concurrent_callers_share_one_fetch(Harness::on_disk(GatedTransport::closed(
        GatedTransport::ok(TINTABLE_SVG),
    )))
    .await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn waiters_observe_the_same_failure() {
    let harness = Harness::new(GatedTransport::closed(Ok(HttpResponse::new(200, "404"))));
    let coordinator = harness.coordinator().clone();
    let missing = key("mdi:does-not-exist");

    let tasks: Vec<_> = (0..CALLERS)
        .map(|_| {
            let coordinator = coordinator.clone();
            let missing = missing.clone();
            tokio::spawn(async move { coordinator.ensure_cached(&missing).await })
        })
        .collect();

    eventually(|| coordinator.stats().waiters == (CALLERS - 1) as u64).await;
    harness.transport.release(1);

    let expected = Err(IconError::FetchNotFound {
        key: "mdi:does-not-exist".to_string(),
    });
    for outcome in join_all(tasks).await {
        assert_eq!(outcome.expect("task"), expected);
    }

    assert_eq!(harness.transport.calls(), 1);
    assert!(harness.files().is_empty());
    assert_eq!(coordinator.in_flight_count(), 0);
    assert_eq!(coordinator.stats().failures, 1);
}

#[tokio::test]
async fn failed_fetch_does_not_block_a_later_retry() {
    let harness = Harness::new(GatedTransport::open(Err(TransportError(
        "connection reset".to_string(),
    ))));
    let coordinator = harness.coordinator();
    let star = key("ph:star");

    let err = coordinator.ensure_cached(&star).await.unwrap_err();
    assert!(matches!(err, IconError::FetchTransport { .. }));
    assert!(!coordinator.is_in_flight(&star));

    harness.transport.set_response(GatedTransport::ok(PLAIN_SVG));
    assert_eq!(coordinator.ensure_cached(&star).await, Ok(Tintability::Plain));
    assert_eq!(harness.transport.calls(), 2);
    assert_eq!(harness.files(), vec!["ph/star.svg".to_string()]);
}

#[tokio::test]
async fn cached_entries_are_never_fetched_again() {
    let harness = Harness::new(GatedTransport::open(GatedTransport::ok(PLAIN_SVG)));
    let coordinator = harness.coordinator();
    let star = key("ph:star");

    for _ in 0..5 {
        assert_eq!(coordinator.ensure_cached(&star).await, Ok(Tintability::Plain));
    }
    assert_eq!(harness.transport.calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_keys_fetch_in_parallel() {
    let harness = Harness::new(GatedTransport::closed(GatedTransport::ok(PLAIN_SVG)));
    let coordinator = harness.coordinator().clone();
    let keys = ["mdi:home", "mdi:account", "ph:star", "lucide:x"];

    let tasks: Vec<_> = keys
        .iter()
        .map(|raw| {
            let coordinator = coordinator.clone();
            let icon = key(raw);
            tokio::spawn(async move { coordinator.ensure_cached(&icon).await })
        })
        .collect();

    // Every key is in flight at once; none waits on another.
    eventually(|| harness.transport.calls() == keys.len()).await;
    assert_eq!(coordinator.in_flight_count(), keys.len());
    assert_eq!(coordinator.stats().waiters, 0);

    harness.transport.release(keys.len());
    for outcome in join_all(tasks).await {
        assert_eq!(outcome.expect("task"), Ok(Tintability::Plain));
    }
    assert_eq!(harness.files().len(), keys.len());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_the_leader_does_not_abandon_the_fetch() {
    let harness = Harness::new(GatedTransport::closed(GatedTransport::ok(TINTABLE_SVG)));
    let coordinator = harness.coordinator().clone();
    let home = key("mdi:home");

    let leader = {
        let coordinator = coordinator.clone();
        let home = home.clone();
        tokio::spawn(async move { coordinator.ensure_cached(&home).await })
    };
    eventually(|| harness.transport.calls() == 1).await;

    leader.abort();
    let _ = leader.await;
    assert!(coordinator.is_in_flight(&home), "fetch keeps running");

    harness.transport.release(1);
    eventually(|| !coordinator.is_in_flight(&home)).await;

    assert_eq!(harness.files(), vec!["mdi/home.t.svg".to_string()]);
    assert_eq!(coordinator.ensure_cached(&home).await, Ok(Tintability::Tintable));
    assert_eq!(harness.transport.calls(), 1);
}

#[tokio::test]
async fn exactly_one_variant_exists_after_fetch() {
    let harness = Harness::new(GatedTransport::open(GatedTransport::ok(TINTABLE_SVG)));
    let coordinator = harness.coordinator();
    let home = key("mdi:home");

    coordinator.ensure_cached(&home).await.unwrap();

    let files = harness.files();
    assert!(files.contains(&home.cache_tintable_path()));
    assert!(!files.contains(&home.cache_path()));
    assert_eq!(
        harness.transport.requested(),
        vec!["https://api.iconify.design/mdi/home.svg?width=100%25".to_string()]
    );
}
