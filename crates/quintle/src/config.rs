//! Top-level configuration for the Quintle aggregation layer

use ipfs::IpfsConfig;
use quintle_ethereum::ChainConfig;
use quintle_types::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Content-addressed storage settings. The pinning token is never read from
/// the file; it comes from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IpfsSettings {
    pub api_url: String,
    pub gateway: String,
    pub timeout_secs: u64,
}

impl Default for IpfsSettings {
    fn default() -> Self {
        let defaults = IpfsConfig::default();
        Self {
            api_url: defaults.api_url,
            gateway: defaults.gateway,
            timeout_secs: defaults.timeout.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Entity always listed first; 0 disables pinning
    pub pinned_entity_id: EntityId,
    /// Fallback polling interval for collections
    pub collection_poll_secs: u64,
    /// Pending balance refresh interval
    pub balance_poll_secs: u64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            pinned_entity_id: crate::ordering::DEFAULT_PINNED_ID,
            collection_poll_secs: 30,
            balance_poll_secs: 10,
        }
    }
}

/// OAuth client registration for one social provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub authorize_url: String,
    pub token_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    #[serde(default)]
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialSettings {
    /// JSON file holding linked accounts
    pub session_file: String,
    /// Only popup messages from this origin are trusted
    pub expected_origin: String,
    /// Popup handshake timeout
    pub connect_timeout_secs: u64,
    /// Token endpoint timeout
    pub exchange_timeout_secs: u64,
    pub providers: BTreeMap<String, ProviderSettings>,
}

impl Default for SocialSettings {
    fn default() -> Self {
        Self {
            session_file: ".quintle/sessions.json".to_string(),
            expected_origin: "https://quintle.app".to_string(),
            connect_timeout_secs: 120,
            exchange_timeout_secs: 8,
            providers: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QuintleConfig {
    pub chain: ChainConfig,
    pub ipfs: IpfsSettings,
    pub aggregation: AggregationConfig,
    pub social: SocialSettings,
}

impl QuintleConfig {
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

    pub fn validate(&self) -> Result<(), String> {
        self.chain.validate().map_err(|e| format!("chain: {}", e))?;
        self.ipfs_config(None)
            .validate()
            .map_err(|e| format!("ipfs: {}", e))?;

        if self.aggregation.collection_poll_secs == 0 {
            return Err("aggregation.collection_poll_secs must be greater than zero".to_string());
        }
        if self.aggregation.balance_poll_secs == 0 {
            return Err("aggregation.balance_poll_secs must be greater than zero".to_string());
        }

        if self.social.session_file.is_empty() {
            return Err("social.session_file cannot be empty".to_string());
        }
        if !self.social.expected_origin.starts_with("https://")
            && !self.social.expected_origin.starts_with("http://")
        {
            return Err("social.expected_origin must be an http(s) origin".to_string());
        }
        if self.social.connect_timeout_secs == 0 || self.social.exchange_timeout_secs == 0 {
            return Err("social timeouts must be greater than zero".to_string());
        }
        for (name, provider) in &self.social.providers {
            if provider.client_id.is_empty() {
                return Err(format!("social.providers.{}.client_id cannot be empty", name));
            }
            for (field, url) in [
                ("authorize_url", &provider.authorize_url),
                ("token_url", &provider.token_url),
                ("redirect_uri", &provider.redirect_uri),
            ] {
                if !url.starts_with("https://") && !url.starts_with("http://") {
                    return Err(format!(
                        "social.providers.{}.{} must be an http(s) URL",
                        name, field
                    ));
                }
            }
        }

        Ok(())
    }

    /// Pinned entity ID, `None` when pinning is disabled
    pub fn pinned_id(&self) -> Option<EntityId> {
        Some(self.aggregation.pinned_entity_id).filter(|id| *id != 0)
    }

    pub fn collection_poll_interval(&self) -> Duration {
        Duration::from_secs(self.aggregation.collection_poll_secs)
    }

    pub fn balance_poll_interval(&self) -> Duration {
        Duration::from_secs(self.aggregation.balance_poll_secs)
    }

    /// Storage client configuration with the pinning token supplied separately
    pub fn ipfs_config(&self, jwt: Option<String>) -> IpfsConfig {
        IpfsConfig {
            api_url: self.ipfs.api_url.clone(),
            gateway: self.ipfs.gateway.clone(),
            jwt,
            timeout: Duration::from_secs(self.ipfs.timeout_secs),
        }
    }

    pub fn provider(&self, name: &str) -> Option<&ProviderSettings> {
        self.social.providers.get(name)
    }
}
