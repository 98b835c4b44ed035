//! Configuration types for the Ethereum chain backend

use quintle_types::EntityKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployed contract addresses, one per entity kind plus the verification registry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractAddresses {
    pub quest: Option<String>,
    pub airdrop: Option<String>,
    pub bounty: Option<String>,
    pub grant: Option<String>,
    pub campaign: Option<String>,
    pub funding_request: Option<String>,
    pub verification: Option<String>,
}

impl ContractAddresses {
    /// Configured address for an entity kind
    pub fn for_kind(&self, kind: EntityKind) -> Option<&str> {
        let address = match kind {
            EntityKind::Quest => &self.quest,
            EntityKind::Airdrop => &self.airdrop,
            EntityKind::Bounty => &self.bounty,
            EntityKind::Grant => &self.grant,
            EntityKind::Campaign => &self.campaign,
            EntityKind::FundingRequest => &self.funding_request,
        };
        address.as_deref().filter(|a| !a.is_empty())
    }

    fn all(&self) -> Vec<(&'static str, &str)> {
        [
            ("quest", &self.quest),
            ("airdrop", &self.airdrop),
            ("bounty", &self.bounty),
            ("grant", &self.grant),
            ("campaign", &self.campaign),
            ("funding_request", &self.funding_request),
            ("verification", &self.verification),
        ]
        .into_iter()
        .filter_map(|(name, address)| address.as_deref().map(|a| (name, a)))
        .collect()
    }
}

/// A token whose pending balances are aggregated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token contract address; the zero address stands for the native currency
    pub address: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Configuration for the Ethereum chain backend
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainConfig {
    /// RPC URL for the EVM node
    /// Example: "https://sepolia.base.org"
    pub rpc_url: String,

    /// WebSocket URL for event streaming (optional)
    /// If not provided, collections fall back to polling only
    pub ws_url: Option<String>,

    /// Chain ID (8453=Base, 84532=Base Sepolia, 4202=Lisk Sepolia, 31337=Anvil)
    pub chain_id: u64,

    /// Deployed contract addresses
    pub contracts: ContractAddresses,

    /// Tokens whose pending balances are aggregated, in display order
    pub tokens: Vec<TokenConfig>,

    /// Contracts that may hold pending balances for the connected account,
    /// in the order they are tried by "withdraw all"
    pub withdrawal_sources: Vec<String>,

    /// Private key for signing transactions (optional for read-only operations)
    /// Format: 0x-prefixed hex string (64 hex chars + 0x prefix = 66 chars)
    pub private_key: Option<String>,

    /// Delay before re-opening a dropped log subscription
    pub reconnect_delay_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "http://localhost:8545".to_string(),
            ws_url: Some("ws://localhost:8545".to_string()), // Default WebSocket for Anvil
            chain_id: 31337, // Local anvil/hardhat
            contracts: ContractAddresses::default(),
            tokens: vec![TokenConfig {
                address: "0x0000000000000000000000000000000000000000".to_string(),
                symbol: "ETH".to_string(),
                decimals: 18,
            }],
            withdrawal_sources: Vec::new(),
            private_key: None,
            reconnect_delay_secs: 5,
        }
    }
}

/// Validate a 0x-prefixed 20-byte hex address
fn validate_address(name: &str, address: &str) -> Result<(), String> {
    if !address.starts_with("0x") {
        return Err(format!("{} must start with 0x", name));
    }

    if address.len() != 42 {
        return Err(format!(
            "{} must be 42 characters (0x + 40 hex), got {}",
            name,
            address.len()
        ));
    }

    if !address[2..].chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("{} must contain only hex characters after 0x", name));
    }

    Ok(())
}

impl ChainConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, anyhow::Error> {
        let config: Self = toml::from_str(toml)?;
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
        Ok(config)
    }

    /// Validate configuration
    ///
    /// Returns `Ok(())` if valid, otherwise returns error message
    pub fn validate(&self) -> Result<(), String> {
        if self.rpc_url.is_empty() {
            return Err("rpc_url cannot be empty".to_string());
        }

        if !self.rpc_url.starts_with("http://") && !self.rpc_url.starts_with("https://") {
            return Err("rpc_url must start with http:// or https://".to_string());
        }

        if let Some(ref ws_url) = self.ws_url {
            if !ws_url.starts_with("ws://") && !ws_url.starts_with("wss://") {
                return Err("ws_url must start with ws:// or wss://".to_string());
            }
        }

        for (name, address) in self.contracts.all() {
            validate_address(&format!("contracts.{}", name), address)?;
        }

        for (i, source) in self.withdrawal_sources.iter().enumerate() {
            validate_address(&format!("withdrawal_sources[{}]", i), source)?;
        }

        for token in &self.tokens {
            validate_address(&format!("token {}", token.symbol), &token.address)?;
            if token.symbol.is_empty() {
                return Err(format!("token {} has an empty symbol", token.address));
            }
            if token.decimals > 36 {
                return Err(format!(
                    "token {} decimals too large ({}, max 36)",
                    token.symbol, token.decimals
                ));
            }
        }

        if let Some(ref pk) = self.private_key {
            if !pk.is_empty() {
                if !pk.starts_with("0x") {
                    return Err("private_key must start with 0x".to_string());
                }

                if pk.len() != 66 {
                    return Err(format!(
                        "private_key must be 66 characters (0x + 64 hex), got {}",
                        pk.len()
                    ));
                }

                if !pk[2..].chars().all(|c| c.is_ascii_hexdigit()) {
                    return Err("private_key must contain only hex characters after 0x".to_string());
                }
            }
        }

        if self.reconnect_delay_secs == 0 || self.reconnect_delay_secs > 300 {
            return Err("reconnect_delay_secs must be between 1 and 300".to_string());
        }

        Ok(())
    }

    /// Check if configuration supports write operations (has private key)
    pub fn can_write(&self) -> bool {
        self.private_key.as_deref().is_some_and(|pk| !pk.is_empty())
    }
}
