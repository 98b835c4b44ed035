//! Quintle aggregation layer
//!
//! Turns the per-ID contract reads exposed by the source traits into
//! UI-ready collections:
//!
//! - [`loader`] fans out `1..=counter` fetches with per-ID failure isolation
//! - [`collection`] owns a snapshot per entity kind, ordered newest first
//! - [`invalidation`] reloads collections on chain events, with polling as fallback
//! - [`withdrawals`] sums pending balances across contracts and routes "withdraw all"
//! - [`actions`] sequences media uploads before chain writes
//!
//! Every type here is generic over the source traits from `quintle-types`,
//! so the same code serves all entity kinds and runs against in-memory fakes
//! in tests.

pub mod actions;
pub mod amount;
pub mod collection;
pub mod config;
pub mod invalidation;
pub mod loader;
pub mod ordering;
pub mod withdrawals;

pub use actions::{compose_description, publish_then_write, PublishError, Published};
pub use amount::{format_amount, parse_amount, AmountError};
pub use collection::{CollectionHandle, CollectionSnapshot, EntityCollection};
pub use config::QuintleConfig;
pub use invalidation::{spawn_invalidation, InvalidationHandle};
pub use loader::{load_entities, load_sub_items, LoadFailure, LoadOutcome, SubItemsOutcome};
pub use ordering::order_newest_first;
pub use withdrawals::{
    route_withdraw_all, spawn_balance_watcher, BalanceAggregator, BalanceWatcher, WithdrawError,
    WithdrawReceipt,
};
