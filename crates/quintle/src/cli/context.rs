//! Shared setup for command handlers

use crate::cli::Cli;
use alloy::primitives::Address;
use anyhow::{anyhow, Context as _, Result};
use quintle::QuintleConfig;
use quintle_ethereum::ContractClient;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Context {
    pub config: QuintleConfig,
    pub client: Arc<ContractClient>,
}

impl Context {
    /// Load the configuration file, apply command-line overrides and connect
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = if Path::new(&cli.config).exists() {
            debug!("Loading configuration from {}", cli.config);
            QuintleConfig::from_file(&cli.config)
                .with_context(|| format!("Failed to load {}", cli.config))?
        } else {
            warn!("{} not found, using default configuration", cli.config);
            QuintleConfig::default()
        };

        if let Some(rpc_url) = &cli.rpc_url {
            config.chain.rpc_url = rpc_url.clone();
        }
        if let Some(private_key) = &cli.private_key {
            config.chain.private_key = Some(private_key.clone());
        }
        config
            .validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

        let client = Arc::new(ContractClient::new(config.chain.clone())?);
        Ok(Self { config, client })
    }

    /// Explicit account, else the signer address, else none
    pub fn account(&self, explicit: Option<&str>) -> Result<Option<Address>> {
        match explicit {
            Some(address) => Ok(Some(parse_address(address)?)),
            None => Ok(self.client.signer_address()),
        }
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value).map_err(|e| anyhow!("Invalid address '{}': {}", value, e))
}

/// Local time rendering of a unix timestamp, `-` for 0
pub fn format_timestamp(seconds: u64) -> String {
    if seconds == 0 {
        return "-".to_string();
    }
    i64::try_from(seconds)
        .ok()
        .and_then(|s| chrono::DateTime::from_timestamp(s, 0))
        .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

pub fn now_secs() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0)
}
