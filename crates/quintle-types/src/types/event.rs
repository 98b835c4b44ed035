//! Event types for chain event streams

use crate::error::SourceResult;
use crate::kind::EntityKind;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// What an event means for an aggregated collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventClass {
    /// A new entity was issued, the counter moved
    Creation,
    /// Fields of an existing entity changed, the counter did not move
    Mutation,
}

/// Occurrence of a named on-chain event. The log payload is not parsed
/// beyond the event name; the event only triggers a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    pub kind: EntityKind,
    pub name: String,
    pub class: EventClass,
    pub block_number: u64,
}

/// Stream of chain events; errors are yielded in-band so the consumer can
/// keep listening across reconnects
pub type ChainEventStream = Pin<Box<dyn Stream<Item = SourceResult<ChainEvent>> + Send>>;
