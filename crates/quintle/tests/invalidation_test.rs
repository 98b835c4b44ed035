mod common;

use common::{event, eventually, BrokenEvents, FakeEvents, FakeQuests};
use quintle::{spawn_invalidation, EntityCollection};
use quintle_types::{EventClass, EventSource, SourceError};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

const WAIT: Duration = Duration::from_secs(3);
const NO_POLL: Duration = Duration::from_secs(3600);

async fn entity_count(collection: &EntityCollection<FakeQuests>) -> usize {
    collection.snapshot().await.entities.len()
}

#[tokio::test]
async fn test_initial_load_on_spawn() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = Arc::new(EntityCollection::new(source, None));

    let _invalidation = spawn_invalidation(collection.clone(), None, NO_POLL);

    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);
}

#[tokio::test]
async fn test_creation_event_rereads_counter() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));
    let (events, tx) = FakeEvents::new();

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(events as Arc<dyn EventSource>),
        NO_POLL,
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);

    source.counter.store(3, Ordering::SeqCst);
    tx.send(event("QuestCreated", EventClass::Creation)).unwrap();

    assert!(eventually(WAIT, || async move { entity_count(c).await == 3 }).await);
    let ids: Vec<u64> = collection.snapshot().await.entities.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}

#[tokio::test]
async fn test_creation_event_without_counter_change_skips_reload() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));
    let (events, tx) = FakeEvents::new();

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(events as Arc<dyn EventSource>),
        NO_POLL,
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { c.snapshot().await.generation == 1 }).await);
    let reads = source.counter_reads.load(Ordering::SeqCst);

    tx.send(event("QuestCreated", EventClass::Creation)).unwrap();

    let s = &source;
    assert!(
        eventually(WAIT, || async move { s.counter_reads.load(Ordering::SeqCst) > reads }).await
    );
    assert_eq!(collection.snapshot().await.generation, 1);
    assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_mutation_event_reloads_everything() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));
    let (events, tx) = FakeEvents::new();

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(events as Arc<dyn EventSource>),
        NO_POLL,
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);

    source.revision.store(1, Ordering::SeqCst);
    tx.send(event("EntrySubmitted", EventClass::Mutation)).unwrap();

    assert!(
        eventually(WAIT, || async move {
            c.snapshot().await.entities.iter().all(|q| q.title.ends_with("r1"))
        })
        .await
    );
    assert_eq!(collection.snapshot().await.counter, Some(2));
}

#[tokio::test]
async fn test_stream_errors_keep_listening() {
    let source = Arc::new(FakeQuests::new(1));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));
    let (events, tx) = FakeEvents::new();

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(events as Arc<dyn EventSource>),
        NO_POLL,
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 1 }).await);

    tx.send(Err(SourceError::rpc("WebSocket connection failed"))).unwrap();
    source.counter.store(2, Ordering::SeqCst);
    tx.send(event("QuestCreated", EventClass::Creation)).unwrap();

    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);
}

#[tokio::test]
async fn test_failed_subscription_falls_back_to_polling() {
    let source = Arc::new(FakeQuests::new(1));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(Arc::new(BrokenEvents) as Arc<dyn EventSource>),
        Duration::from_millis(50),
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 1 }).await);

    source.counter.store(4, Ordering::SeqCst);
    assert!(eventually(WAIT, || async move { entity_count(c).await == 4 }).await);
}

#[tokio::test]
async fn test_polling_picks_up_mutations_without_events() {
    let source = Arc::new(FakeQuests::new(2));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));

    let _invalidation = spawn_invalidation(
        collection.clone(),
        Some(Arc::new(BrokenEvents) as Arc<dyn EventSource>),
        Duration::from_millis(50),
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);

    // Resolution changes entity fields but not the counter
    source.revision.store(1, Ordering::SeqCst);

    assert!(
        eventually(WAIT, || async move {
            c.snapshot().await.entities.iter().all(|q| q.title.ends_with("r1"))
        })
        .await
    );
    assert_eq!(collection.snapshot().await.counter, Some(2));
}

#[tokio::test]
async fn test_polling_retries_transiently_failed_ids() {
    let source = Arc::new(FakeQuests::new(3));
    source.fail(2);
    let collection = Arc::new(EntityCollection::new(source.clone(), None));

    let _invalidation = spawn_invalidation(collection.clone(), None, Duration::from_millis(50));
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 2 }).await);

    let snapshot = collection.snapshot().await;
    assert_eq!(snapshot.failures.len(), 1);
    assert_eq!(snapshot.failures[0].id, 2);
    assert!(snapshot.failures[0].retriable);

    source.recover(2);

    assert!(eventually(WAIT, || async move { entity_count(c).await == 3 }).await);
    let snapshot = collection.snapshot().await;
    let ids: Vec<u64> = snapshot.entities.iter().map(|q| q.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert!(snapshot.failures.is_empty());
}

#[tokio::test]
async fn test_unmount_wakes_idle_invalidation() {
    let source = Arc::new(FakeQuests::new(1));
    let collection = Arc::new(EntityCollection::new(source, None));
    let (events, _tx) = FakeEvents::new();

    let invalidation = spawn_invalidation(
        collection.clone(),
        Some(events as Arc<dyn EventSource>),
        NO_POLL,
    );
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 1 }).await);

    // No events arrive and the next tick is an hour away
    collection.handle().unmount();
    let inv = &invalidation;
    assert!(eventually(Duration::from_millis(500), || async move { inv.is_finished() }).await);
}

#[tokio::test]
async fn test_unmount_stops_invalidation() {
    let source = Arc::new(FakeQuests::new(1));
    let collection = Arc::new(EntityCollection::new(source.clone(), None));

    let invalidation = spawn_invalidation(collection.clone(), None, Duration::from_millis(20));
    let c = &collection;
    assert!(eventually(WAIT, || async move { entity_count(c).await == 1 }).await);

    collection.handle().unmount();
    let inv = &invalidation;
    assert!(eventually(WAIT, || async move { inv.is_finished() }).await);

    source.counter.store(5, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(entity_count(&collection).await, 1);
    invalidation.shutdown().await;
}
