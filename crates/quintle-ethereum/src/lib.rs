//! Ethereum backend for the Quintle aggregation layer
//!
//! Implements the source traits from `quintle-types` over JSON-RPC using
//! alloy contract bindings:
//!
//! - one `EntitySource` + `SubCollectionSource` per entity contract
//! - `EvmEventSource` streaming creation and mutation logs over WebSocket
//! - `EvmBalanceSource` reading and withdrawing pull-payment balances
//! - `EvmVerificationSource` reading the verification registry
//!
//! Providers are created per call; no background tasks are spawned here.
//!
//! # Example
//!
//! ```ignore
//! use quintle_ethereum::{ChainConfig, ContractClient, QuestSource};
//! use quintle_types::EntitySource;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ChainConfig::from_file("quintle.toml")?;
//! let client = Arc::new(ContractClient::new(config)?);
//! let quests = QuestSource::new(client)?;
//! let count = quests.counter().await?;
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod balances;
pub mod config;
pub mod contract;
pub mod conversions;
pub mod error;
pub mod events;
pub mod network;
pub mod sources;
pub mod verification;

pub use balances::EvmBalanceSource;
pub use config::{ChainConfig, ContractAddresses, TokenConfig};
pub use contract::ContractClient;
pub use error::{EthereumError, Result};
pub use events::EvmEventSource;
pub use network::{ensure_network, Eip1193, KnownNetwork, NetworkError, RpcEip1193, SwitchOutcome};
pub use sources::{
    AirdropSource, BountySource, CampaignSource, FundingRequestSource, GrantSource, QuestSource,
};
pub use verification::EvmVerificationSource;
