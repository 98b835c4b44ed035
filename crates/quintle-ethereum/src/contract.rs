//! Contract client for interacting with the Quintle contracts
//!
//! Parses and validates every configured address once, and hands out
//! providers for read calls and signed transactions.

use crate::config::ChainConfig;
use crate::error::{EthereumError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use quintle_types::{EntityKind, TokenInfo};
use std::collections::HashMap;
use std::str::FromStr;

/// Contract client that manages contract connection details
pub struct ContractClient {
    /// Entity contract addresses by kind
    entity_contracts: HashMap<EntityKind, Address>,
    /// Verification registry address
    verification: Option<Address>,
    /// Contracts that may hold pending balances
    withdrawal_sources: Vec<Address>,
    /// Tokens whose pending balances are aggregated
    tokens: Vec<TokenInfo>,
    /// Configuration
    config: ChainConfig,
}

fn parse_address(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|e| {
        EthereumError::InvalidAddress(format!("{} '{}': {}", name, value, e))
    })
}

impl ContractClient {
    /// Creates a new contract client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Configuration validation fails
    /// - Any configured address is invalid
    /// - Private key is invalid (if provided)
    pub fn new(config: ChainConfig) -> Result<Self> {
        config.validate().map_err(EthereumError::Configuration)?;

        let mut entity_contracts = HashMap::new();
        for kind in EntityKind::ALL {
            if let Some(address) = config.contracts.for_kind(kind) {
                entity_contracts.insert(kind, parse_address(&kind.to_string(), address)?);
            }
        }

        let verification = config
            .contracts
            .verification
            .as_deref()
            .filter(|a| !a.is_empty())
            .map(|a| parse_address("verification", a))
            .transpose()?;

        let withdrawal_sources = config
            .withdrawal_sources
            .iter()
            .map(|a| parse_address("withdrawal source", a))
            .collect::<Result<Vec<_>>>()?;

        let tokens = config
            .tokens
            .iter()
            .map(|t| {
                Ok(TokenInfo {
                    address: parse_address(&t.symbol, &t.address)?,
                    symbol: t.symbol.clone(),
                    decimals: t.decimals,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if config.can_write() {
            if let Some(ref private_key) = config.private_key {
                let _ = private_key.parse::<PrivateKeySigner>().map_err(|e| {
                    EthereumError::Configuration(format!("Invalid private key: {}", e))
                })?;
            }
        }

        Ok(Self {
            entity_contracts,
            verification,
            withdrawal_sources,
            tokens,
            config,
        })
    }

    /// Contract address serving an entity kind
    pub fn entity_contract(&self, kind: EntityKind) -> Result<Address> {
        self.entity_contracts
            .get(&kind)
            .copied()
            .ok_or_else(|| EthereumError::MissingContract(kind.to_string()))
    }

    /// Verification registry address
    pub fn verification_contract(&self) -> Result<Address> {
        self.verification
            .ok_or_else(|| EthereumError::MissingContract("verification".to_string()))
    }

    /// Contracts that may hold pending balances, in routing order
    pub fn withdrawal_sources(&self) -> &[Address] {
        &self.withdrawal_sources
    }

    /// Tokens whose pending balances are aggregated
    pub fn tokens(&self) -> &[TokenInfo] {
        &self.tokens
    }

    /// Returns the chain ID from configuration
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    /// Returns the configuration
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Address of the configured signer, if any
    pub fn signer_address(&self) -> Option<Address> {
        self.config
            .private_key
            .as_deref()
            .and_then(|pk| pk.parse::<PrivateKeySigner>().ok())
            .map(|signer| signer.address())
    }

    /// Create a read-only provider for contract calls
    ///
    /// The provider is not cached - a new one is created for each call.
    pub fn create_provider(&self) -> Result<impl Provider> {
        let rpc_url = self
            .config
            .rpc_url
            .parse()
            .map_err(|e| EthereumError::ProviderError(format!("Invalid RPC URL: {}", e)))?;

        Ok(ProviderBuilder::new().connect_http(rpc_url))
    }

    /// Create a provider with wallet for sending transactions
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No private key is configured
    /// - The private key is invalid
    /// - The RPC URL is invalid
    pub fn create_provider_with_signer(&self) -> Result<impl Provider> {
        let private_key = self
            .config
            .private_key
            .as_ref()
            .filter(|pk| !pk.is_empty())
            .ok_or(EthereumError::NoPrivateKey)?;

        let signer = private_key
            .parse::<PrivateKeySigner>()
            .map_err(|e| EthereumError::WalletError(format!("Invalid private key: {}", e)))?;

        let wallet = EthereumWallet::from(signer);

        let rpc_url = self
            .config
            .rpc_url
            .parse()
            .map_err(|e| EthereumError::ProviderError(format!("Invalid RPC URL: {}", e)))?;

        Ok(ProviderBuilder::new().wallet(wallet).connect_http(rpc_url))
    }
}
