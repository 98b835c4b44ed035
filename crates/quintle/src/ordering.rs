//! Presentation order of reconciled collections

use quintle_types::{Entity, EntityId};
use std::cmp::Reverse;

/// Default ID of the demo entity listed ahead of everything else
pub const DEFAULT_PINNED_ID: EntityId = 999;

/// Sort by ID strictly descending, with the pinned entity (when present) first.
/// Completion order of the underlying fetches never leaks into the result.
pub fn order_newest_first<E: Entity>(entities: &mut [E], pinned: Option<EntityId>) {
    entities.sort_by_key(|e| (Some(e.id()) != pinned, Reverse(e.id())));
}
