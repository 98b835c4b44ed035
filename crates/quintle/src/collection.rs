//! Generic entity collection
//!
//! One `EntityCollection` per entity kind owns the current snapshot. All
//! writers go through `reload` / `load_with_counter`, and every completed load
//! replaces the snapshot (last completed wins). Loads finishing after the
//! consumer unmounted are dropped silently.

use crate::loader::{load_entities, LoadFailure, LoadOutcome};
use crate::ordering::order_newest_first;
use quintle_types::{Entity, EntityId, EntityKind, EntitySource};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

/// Immutable view of a collection handed to consumers
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSnapshot<E> {
    /// Newest first, pinned entity ahead of everything
    pub entities: Vec<E>,
    pub sub_counts: HashMap<EntityId, u64>,
    pub failures: Vec<LoadFailure>,
    /// `None` until the counter has been read once
    pub counter: Option<u64>,
    /// True until the first load completes
    pub is_loading: bool,
    pub last_error: Option<String>,
    /// Number of loads applied so far
    pub generation: u64,
}

impl<E> Default for CollectionSnapshot<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            sub_counts: HashMap::new(),
            failures: Vec::new(),
            counter: None,
            is_loading: true,
            last_error: None,
            generation: 0,
        }
    }
}

impl<E: Entity> CollectionSnapshot<E> {
    pub fn get(&self, id: EntityId) -> Option<&E> {
        self.entities.iter().find(|e| e.id() == id)
    }

    pub fn sub_count(&self, id: EntityId) -> Option<u64> {
        self.sub_counts.get(&id).copied()
    }

    /// Entities still open at `now` (unix seconds)
    pub fn active(&self, now: u64) -> Vec<&E> {
        self.entities.iter().filter(|e| e.is_active(now)).collect()
    }

    /// Resolved, cancelled or expired entities
    pub fn past(&self, now: u64) -> Vec<&E> {
        self.entities.iter().filter(|e| !e.is_active(now)).collect()
    }

    /// Data can be shown: the first load completed
    pub fn has_data(&self) -> bool {
        !self.is_loading
    }
}

/// Mounted flag shared between a collection and its consumer
#[derive(Debug, Clone)]
pub struct CollectionHandle {
    mounted: Arc<watch::Sender<bool>>,
}

impl CollectionHandle {
    /// Stop accepting results; loads still in flight are discarded on arrival
    pub fn unmount(&self) {
        self.mounted.send_replace(false);
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }
}

pub struct EntityCollection<S: EntitySource> {
    source: Arc<S>,
    state: Arc<RwLock<CollectionSnapshot<S::Entity>>>,
    mounted: Arc<watch::Sender<bool>>,
    pinned: Option<EntityId>,
    changes: watch::Sender<u64>,
}

impl<S: EntitySource> EntityCollection<S> {
    pub fn new(source: Arc<S>, pinned: Option<EntityId>) -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            source,
            state: Arc::new(RwLock::new(CollectionSnapshot::default())),
            mounted: Arc::new(watch::channel(true).0),
            pinned,
            changes,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.source.kind()
    }

    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    pub fn handle(&self) -> CollectionHandle {
        CollectionHandle {
            mounted: self.mounted.clone(),
        }
    }

    pub fn is_mounted(&self) -> bool {
        *self.mounted.borrow()
    }

    /// Notified when the consumer unmounts
    pub fn mount_state(&self) -> watch::Receiver<bool> {
        self.mounted.subscribe()
    }

    pub async fn snapshot(&self) -> CollectionSnapshot<S::Entity> {
        self.state.read().await.clone()
    }

    /// Receives the snapshot generation after every applied change
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Re-read the counter and run the batch load against it
    pub async fn reload(&self) {
        match self.source.counter().await {
            Ok(counter) => self.load_with_counter(Some(counter)).await,
            Err(e) => self.record_counter_error(e.to_string()).await,
        }
    }

    /// Same as `reload`; the name consumers use for a manual refresh
    pub async fn refetch(&self) {
        self.reload().await
    }

    /// Re-read only the counter; reloads when it moved. Returns whether it moved.
    pub async fn refresh_counter(&self) -> bool {
        let counter = match self.source.counter().await {
            Ok(counter) => counter,
            Err(e) => {
                self.record_counter_error(e.to_string()).await;
                return false;
            }
        };

        let previous = self.state.read().await.counter;
        if previous == Some(counter) {
            debug!("{} counter unchanged at {}", self.kind(), counter);
            return false;
        }

        info!(
            "{} counter moved from {:?} to {}",
            self.kind(),
            previous,
            counter
        );
        self.load_with_counter(Some(counter)).await;
        true
    }

    /// Batch load bounded by `counter`. `None` (counter not known yet) keeps
    /// the collection loading and performs no fetch.
    pub async fn load_with_counter(&self, counter: Option<u64>) {
        let Some(counter) = counter else {
            debug!("{} counter not loaded yet, skipping fetch", self.kind());
            return;
        };

        let outcome = load_entities(self.source.as_ref(), counter).await;
        self.apply(counter, outcome).await;
    }

    async fn apply(&self, counter: u64, outcome: LoadOutcome<S::Entity>) {
        if !self.is_mounted() {
            debug!("{} collection unmounted, discarding load result", self.kind());
            return;
        }

        let mut entities = outcome.entities;
        order_newest_first(&mut entities, self.pinned);

        let generation = {
            let mut state = self.state.write().await;
            state.entities = entities;
            state.sub_counts = outcome.sub_counts;
            state.failures = outcome.failures;
            state.counter = Some(counter);
            state.is_loading = false;
            state.last_error = None;
            state.generation += 1;
            state.generation
        };
        self.changes.send_replace(generation);
    }

    async fn record_counter_error(&self, error: String) {
        warn!("Failed to read {} counter: {}", self.kind(), error);
        if !self.is_mounted() {
            return;
        }

        let generation = {
            let mut state = self.state.write().await;
            state.last_error = Some(error);
            state.generation += 1;
            state.generation
        };
        self.changes.send_replace(generation);
    }
}
