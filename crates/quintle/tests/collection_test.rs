mod common;

use common::FakeQuests;
use quintle::EntityCollection;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn titles(snapshot: &quintle::CollectionSnapshot<quintle_types::Quest>) -> Vec<String> {
    snapshot.entities.iter().map(|q| q.title.clone()).collect()
}

#[tokio::test]
async fn test_reload_twice_equals_reload_once() {
    let source = Arc::new(FakeQuests::new(4));
    source.fail(2);

    let once = EntityCollection::new(source.clone(), Some(999));
    once.reload().await;

    let twice = EntityCollection::new(source, Some(999));
    twice.reload().await;
    twice.reload().await;

    let a = once.snapshot().await;
    let b = twice.snapshot().await;
    assert_eq!(a.entities, b.entities);
    assert_eq!(a.sub_counts, b.sub_counts);
    assert_eq!(a.failures, b.failures);
    assert_eq!(a.counter, b.counter);
    assert_eq!(b.generation, 2);
}

#[tokio::test]
async fn test_pinned_entity_listed_first() {
    let source = Arc::new(FakeQuests::new(5));
    let collection = EntityCollection::new(source, Some(3));
    collection.reload().await;

    let ids: Vec<u64> = collection.snapshot().await.entities.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![3, 5, 4, 2, 1]);
}

#[tokio::test]
async fn test_last_completed_reload_wins() {
    let source = Arc::new(FakeQuests::new(3));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));

    // Slow reload reading revision 0
    source.set_latency(Duration::from_millis(300));
    let slow = tokio::spawn({
        let collection = collection.clone();
        async move { collection.reload().await }
    });
    assert!(
        common::eventually(Duration::from_secs(2), || {
            let source = &source;
            async move { source.fetches.load(Ordering::SeqCst) >= 3 }
        })
        .await
    );

    // A creation event triggers a fast reload reading revision 1
    source.set_latency(Duration::ZERO);
    source.revision.store(1, Ordering::SeqCst);
    collection.reload().await;
    let fast = collection.snapshot().await;
    assert_eq!(fast.generation, 1);
    assert!(titles(&fast).iter().all(|t| t.ends_with("r1")));

    // The slow reload completes afterwards and overwrites without error
    slow.await.unwrap();
    let last = collection.snapshot().await;
    assert_eq!(last.generation, 2);
    assert!(titles(&last).iter().all(|t| t.ends_with("r0")));
    assert!(last.last_error.is_none());
}

#[tokio::test]
async fn test_no_update_after_unmount() {
    let source = Arc::new(FakeQuests::new(3));
    source.set_latency(Duration::from_millis(100));

    let collection = Arc::new(EntityCollection::new(source.clone(), None));
    let handle = collection.handle();
    let changes = collection.subscribe();

    let in_flight = tokio::spawn({
        let collection = collection.clone();
        async move { collection.reload().await }
    });
    assert!(
        common::eventually(Duration::from_secs(2), || {
            let source = &source;
            async move { source.fetches.load(Ordering::SeqCst) >= 3 }
        })
        .await
    );

    handle.unmount();
    assert!(!collection.is_mounted());

    in_flight.await.unwrap();

    let snapshot = collection.snapshot().await;
    assert!(snapshot.is_loading);
    assert!(snapshot.entities.is_empty());
    assert_eq!(snapshot.generation, 0);
    assert!(!changes.has_changed().unwrap());
}

#[tokio::test]
async fn test_entity_failures_do_not_fail_collection() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = EntityCollection::new(source.clone(), None);
    collection.reload().await;
    assert_eq!(collection.snapshot().await.entities.len(), 2);

    // Entity failures never fail the collection as a whole
    source.fail(1);
    source.fail(2);
    collection.reload().await;

    let snapshot = collection.snapshot().await;
    assert!(!snapshot.is_loading);
    assert!(snapshot.entities.is_empty());
    assert_eq!(snapshot.failures.len(), 2);
    assert!(snapshot.last_error.is_none());
}
