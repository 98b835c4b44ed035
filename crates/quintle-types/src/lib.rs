//! Quintle Types - Core abstractions for the chain aggregation layer
//!
//! This crate defines the source traits that every chain backend implements
//! (`EntitySource`, `SubCollectionSource`, `EventSource`, `BalanceSource`,
//! `VerificationSource`) together with the domain records they produce.
//! The aggregation layer in the `quintle` crate only talks to these traits, so
//! the same batch loader, reconciler and invalidation logic serves every entity
//! kind and can be exercised against in-memory fakes.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

pub mod error;
pub mod kind;
pub mod reconcile;
pub mod types;

pub use error::{SourceError, SourceResult};
pub use kind::EntityKind;
pub use types::*;

/// Reads one entity kind from the chain: a counter bounding the issued IDs and
/// a per-ID fetch that already includes any dependent sub-count read.
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Reconciled record produced by this source
    type Entity: Entity;

    /// Entity kind served by this source
    fn kind(&self) -> EntityKind;

    /// Read the monotonically increasing counter (number of issued IDs)
    async fn counter(&self) -> SourceResult<u64>;

    /// Fetch and reconcile one entity together with its sub-collection count
    async fn fetch_entity(&self, id: EntityId) -> SourceResult<Fetched<Self::Entity>>;
}

/// Count-then-enumerate access to a per-entity sub-collection
/// (entries, submissions, applications, supporters, updates).
#[async_trait]
pub trait SubCollectionSource: Send + Sync {
    /// Entity kind owning the sub-collection
    fn kind(&self) -> EntityKind;

    /// Number of items attached to an entity
    async fn item_count(&self, entity_id: EntityId) -> SourceResult<u64>;

    /// Fetch one item by its 0-based index
    async fn fetch_item(&self, entity_id: EntityId, index: u64) -> SourceResult<SubItem>;
}

/// Push signal for on-chain events of one entity kind
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Subscribe to the creation and mutation events of `kind`
    async fn subscribe(&self, kind: EntityKind) -> SourceResult<ChainEventStream>;
}

/// Pending (withdrawable) balances held by source contracts
#[async_trait]
pub trait BalanceSource: Send + Sync {
    /// Amount of `token` owed to `account` by the `source` contract
    async fn pending_balance(
        &self,
        source: Address,
        token: Address,
        account: Address,
    ) -> SourceResult<U256>;

    /// Withdraw the caller's whole pending balance of `token` from `source`.
    /// Returns the transaction hash once the receipt is confirmed.
    async fn withdraw(&self, source: Address, token: Address) -> SourceResult<String>;
}

/// Per-address verification records
#[async_trait]
pub trait VerificationSource: Send + Sync {
    async fn verification(&self, account: Address) -> SourceResult<VerificationRecord>;
}
