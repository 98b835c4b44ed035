//! Counter-bounded batch loading
//!
//! IDs are dense in `1..=counter`, so the whole collection is fetched by
//! fanning out one unit of work per ID. A unit covers the entity read and its
//! dependent sub-count read; any failure inside it only drops that ID.

use crate::ordering::order_newest_first;
use futures::future::join_all;
use quintle_types::{
    EntityId, EntitySource, SourceError, SourceResult, SubCollectionSource, SubItem,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, warn};

/// One ID (or sub-collection index) that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadFailure {
    /// Entity ID, or item index for sub-collection loads
    pub id: u64,
    pub error: String,
    /// Whether the next reload may succeed
    pub retriable: bool,
}

impl LoadFailure {
    fn new(id: u64, error: &SourceError) -> Self {
        Self {
            id,
            error: error.to_string(),
            retriable: error.is_retriable(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome<E> {
    /// Loaded entities, newest first
    pub entities: Vec<E>,
    /// Sub-collection size per loaded entity
    pub sub_counts: HashMap<EntityId, u64>,
    pub failures: Vec<LoadFailure>,
}

impl<E> Default for LoadOutcome<E> {
    fn default() -> Self {
        Self {
            entities: Vec::new(),
            sub_counts: HashMap::new(),
            failures: Vec::new(),
        }
    }
}

/// Fetch every ID in `1..=counter`. Never fails as a whole.
pub async fn load_entities<S>(source: &S, counter: u64) -> LoadOutcome<S::Entity>
where
    S: EntitySource + ?Sized,
{
    let kind = source.kind();
    debug!("Loading {} {} entities", counter, kind);

    let results = join_all((1..=counter).map(|id| async move { (id, source.fetch_entity(id).await) })).await;

    let mut outcome = LoadOutcome::default();
    for (id, result) in results {
        match result {
            Ok(fetched) => {
                if let Some(count) = fetched.sub_count {
                    outcome.sub_counts.insert(id, count);
                }
                outcome.entities.push(fetched.entity);
            }
            Err(e) => {
                warn!("Failed to load {} {}: {}", kind, id, e);
                outcome.failures.push(LoadFailure::new(id, &e));
            }
        }
    }

    order_newest_first(&mut outcome.entities, None);
    debug!(
        "Loaded {}/{} {} entities ({} failed)",
        outcome.entities.len(),
        counter,
        kind,
        outcome.failures.len()
    );
    outcome
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubItemsOutcome {
    pub entity_id: EntityId,
    /// Count reported by the contract
    pub count: u64,
    /// Loaded items in index order
    pub items: Vec<SubItem>,
    pub failures: Vec<LoadFailure>,
}

/// Read the item count, then fetch indices `0..count` with the same failure
/// isolation as `load_entities`. Only the count read can fail the call.
pub async fn load_sub_items<S>(source: &S, entity_id: EntityId) -> SourceResult<SubItemsOutcome>
where
    S: SubCollectionSource + ?Sized,
{
    let kind = source.kind();
    let count = source.item_count(entity_id).await?;
    debug!(
        "Loading {} {} of {} {}",
        count,
        kind.sub_collection_name(),
        kind,
        entity_id
    );

    let results = join_all(
        (0..count).map(|index| async move { (index, source.fetch_item(entity_id, index).await) }),
    )
    .await;

    let mut items = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (index, result) in results {
        match result {
            Ok(item) => items.push(item),
            Err(e) => {
                warn!(
                    "Failed to load {} {} item {}: {}",
                    kind, entity_id, index, e
                );
                failures.push(LoadFailure::new(index, &e));
            }
        }
    }
    items.sort_by_key(|item| item.index);

    Ok(SubItemsOutcome {
        entity_id,
        count,
        items,
        failures,
    })
}
