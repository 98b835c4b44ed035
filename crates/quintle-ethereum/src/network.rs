//! Known networks and the wallet network-switch flow
//!
//! Wallets are reached through the EIP-1193 `request(method, params)` surface.
//! `ensure_network` reads the current chain, asks the wallet to switch, and
//! registers the chain first when the wallet does not know it.

use alloy::providers::Provider;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::borrow::Cow;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, warn};

/// EIP-1193 error code: the user rejected the request
pub const USER_REJECTED_CODE: i64 = 4001;

/// EIP-3326 error code: the chain has not been added to the wallet
pub const UNRECOGNIZED_CHAIN_CODE: i64 = 4902;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownNetwork {
    pub name: String,
    pub chain_id: u64,
    pub rpc_endpoints: Vec<String>,
    pub explorer: Option<String>,
    pub native_currency: NativeCurrency,
    pub testnet: bool,
}

impl KnownNetwork {
    pub fn get_network(name: &str) -> Option<&'static KnownNetwork> {
        NETWORKS.get(name)
    }

    pub fn by_chain_id(chain_id: u64) -> Option<&'static KnownNetwork> {
        NETWORKS.values().find(|n| n.chain_id == chain_id)
    }

    pub fn list_networks() -> Vec<&'static str> {
        let mut names: Vec<&'static str> = NETWORKS.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// `0x`-prefixed chain id as wallets expect it
    pub fn chain_id_hex(&self) -> String {
        format!("0x{:x}", self.chain_id)
    }

    /// Parameters for `wallet_addEthereumChain` (EIP-3085)
    pub fn add_chain_params(&self) -> Value {
        json!({
            "chainId": self.chain_id_hex(),
            "chainName": self.name,
            "nativeCurrency": {
                "name": self.native_currency.name,
                "symbol": self.native_currency.symbol,
                "decimals": self.native_currency.decimals,
            },
            "rpcUrls": self.rpc_endpoints,
            "blockExplorerUrls": self.explorer.iter().collect::<Vec<_>>(),
        })
    }
}

fn ether(name: &str) -> NativeCurrency {
    NativeCurrency {
        name: name.to_string(),
        symbol: "ETH".to_string(),
        decimals: 18,
    }
}

static NETWORKS: Lazy<HashMap<String, KnownNetwork>> = Lazy::new(|| {
    let mut networks = HashMap::new();

    networks.insert("base".to_string(), KnownNetwork {
        name: "Base".to_string(),
        chain_id: 8453,
        rpc_endpoints: vec!["https://mainnet.base.org".to_string()],
        explorer: Some("https://basescan.org".to_string()),
        native_currency: ether("Ether"),
        testnet: false,
    });

    networks.insert("base-sepolia".to_string(), KnownNetwork {
        name: "Base Sepolia".to_string(),
        chain_id: 84532,
        rpc_endpoints: vec!["https://sepolia.base.org".to_string()],
        explorer: Some("https://sepolia.basescan.org".to_string()),
        native_currency: ether("Sepolia Ether"),
        testnet: true,
    });

    networks.insert("lisk-sepolia".to_string(), KnownNetwork {
        name: "Lisk Sepolia".to_string(),
        chain_id: 4202,
        rpc_endpoints: vec!["https://rpc.sepolia-api.lisk.com".to_string()],
        explorer: Some("https://sepolia-blockscout.lisk.com".to_string()),
        native_currency: ether("Sepolia Ether"),
        testnet: true,
    });

    networks.insert("sepolia".to_string(), KnownNetwork {
        name: "Sepolia Testnet".to_string(),
        chain_id: 11155111,
        rpc_endpoints: vec![
            "https://rpc.sepolia.org".to_string(),
            "https://sepolia.drpc.org".to_string(),
        ],
        explorer: Some("https://sepolia.etherscan.io".to_string()),
        native_currency: ether("Sepolia Ether"),
        testnet: true,
    });

    networks.insert("mainnet".to_string(), KnownNetwork {
        name: "Ethereum Mainnet".to_string(),
        chain_id: 1,
        rpc_endpoints: vec![
            "https://eth.llamarpc.com".to_string(),
            "https://rpc.ankr.com/eth".to_string(),
        ],
        explorer: Some("https://etherscan.io".to_string()),
        native_currency: ether("Ether"),
        testnet: false,
    });

    networks.insert("anvil".to_string(), KnownNetwork {
        name: "Anvil".to_string(),
        chain_id: 31337,
        rpc_endpoints: vec!["http://localhost:8545".to_string()],
        explorer: None,
        native_currency: ether("Ether"),
        testnet: true,
    });

    networks
});

/// Error object returned by an EIP-1193 provider
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error {code}: {message}")]
pub struct ProviderRpcError {
    pub code: i64,
    pub message: String,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Minimal EIP-1193 request surface
#[async_trait]
pub trait Eip1193: Send + Sync {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError>;
}

#[derive(Debug, Error)]
pub enum NetworkError {
    /// No wallet provider is available at all
    #[error("No wallet provider available")]
    NoProvider,

    #[error("User rejected the network switch")]
    UserRejected,

    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    #[error("Wallet request {method} failed: {source}")]
    Provider {
        method: String,
        #[source]
        source: ProviderRpcError,
    },

    #[error("Invalid wallet response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    fn from_rpc(method: &str, error: ProviderRpcError) -> Self {
        if error.code == USER_REJECTED_CODE {
            Self::UserRejected
        } else {
            Self::Provider {
                method: method.to_string(),
                source: error,
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    AlreadyOnNetwork,
    Switched,
    /// The wallet did not know the chain; it was added (and selected)
    Added,
}

fn parse_chain_id(value: &Value) -> Result<u64, NetworkError> {
    match value {
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x") {
                Some(hex) => u64::from_str_radix(hex, 16),
                None => s.parse::<u64>(),
            };
            parsed.map_err(|e| NetworkError::InvalidResponse(format!("eth_chainId {}: {}", s, e)))
        }
        Value::Number(n) => n
            .as_u64()
            .ok_or_else(|| NetworkError::InvalidResponse(format!("eth_chainId {}", n))),
        other => Err(NetworkError::InvalidResponse(format!("eth_chainId {}", other))),
    }
}

/// Make sure the wallet is on `network`, switching or adding the chain as needed
pub async fn ensure_network(
    provider: Option<&dyn Eip1193>,
    network: &KnownNetwork,
) -> Result<SwitchOutcome, NetworkError> {
    let provider = provider.ok_or(NetworkError::NoProvider)?;

    let current = provider
        .request("eth_chainId", json!([]))
        .await
        .map_err(|e| NetworkError::from_rpc("eth_chainId", e))?;
    let current = parse_chain_id(&current)?;

    if current == network.chain_id {
        debug!("Wallet already on {} ({})", network.name, network.chain_id);
        return Ok(SwitchOutcome::AlreadyOnNetwork);
    }

    info!(
        "Switching wallet from chain {} to {} ({})",
        current, network.name, network.chain_id
    );

    let switch = provider
        .request(
            "wallet_switchEthereumChain",
            json!([{ "chainId": network.chain_id_hex() }]),
        )
        .await;

    match switch {
        Ok(_) => Ok(SwitchOutcome::Switched),
        Err(e) if e.code == UNRECOGNIZED_CHAIN_CODE => {
            warn!("Wallet does not know chain {}, adding it", network.chain_id);
            provider
                .request("wallet_addEthereumChain", json!([network.add_chain_params()]))
                .await
                .map_err(|e| NetworkError::from_rpc("wallet_addEthereumChain", e))?;
            Ok(SwitchOutcome::Added)
        }
        Err(e) => Err(NetworkError::from_rpc("wallet_switchEthereumChain", e)),
    }
}

/// EIP-1193 adapter over an alloy provider (e.g. a node-managed account)
pub struct RpcEip1193<P> {
    provider: P,
}

impl<P: Provider> RpcEip1193<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: Provider + Send + Sync> Eip1193 for RpcEip1193<P> {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderRpcError> {
        self.provider
            .raw_request::<Value, Value>(Cow::Owned(method.to_string()), params)
            .await
            .map_err(|e| match e.as_error_resp() {
                Some(payload) => ProviderRpcError::new(payload.code, payload.message.to_string()),
                None => ProviderRpcError::new(-32603, e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Scripted wallet that records every method it receives
    struct MockWallet {
        chain_id: &'static str,
        switch_error: Option<ProviderRpcError>,
        add_error: Option<ProviderRpcError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockWallet {
        fn on(chain_id: &'static str) -> Self {
            Self {
                chain_id,
                switch_error: None,
                add_error: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Eip1193 for MockWallet {
        async fn request(&self, method: &str, _params: Value) -> Result<Value, ProviderRpcError> {
            self.calls.lock().unwrap().push(method.to_string());
            match method {
                "eth_chainId" => Ok(json!(self.chain_id)),
                "wallet_switchEthereumChain" => match &self.switch_error {
                    Some(e) => Err(e.clone()),
                    None => Ok(Value::Null),
                },
                "wallet_addEthereumChain" => match &self.add_error {
                    Some(e) => Err(e.clone()),
                    None => Ok(Value::Null),
                },
                other => Err(ProviderRpcError::new(4200, format!("unsupported {}", other))),
            }
        }
    }

    fn base_sepolia() -> &'static KnownNetwork {
        KnownNetwork::get_network("base-sepolia").unwrap()
    }

    #[tokio::test]
    async fn test_no_provider() {
        let result = ensure_network(None, base_sepolia()).await;
        assert!(matches!(result, Err(NetworkError::NoProvider)));
    }

    #[tokio::test]
    async fn test_already_on_network() {
        let wallet = MockWallet::on("0x14a34");
        let outcome = ensure_network(Some(&wallet), base_sepolia()).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::AlreadyOnNetwork);
        assert_eq!(wallet.calls(), vec!["eth_chainId"]);
    }

    #[tokio::test]
    async fn test_switches_known_chain() {
        let wallet = MockWallet::on("0x1");
        let outcome = ensure_network(Some(&wallet), base_sepolia()).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::Switched);
        assert_eq!(wallet.calls(), vec!["eth_chainId", "wallet_switchEthereumChain"]);
    }

    #[tokio::test]
    async fn test_adds_unknown_chain() {
        let mut wallet = MockWallet::on("0x1");
        wallet.switch_error = Some(ProviderRpcError::new(4902, "Unrecognized chain ID"));

        let outcome = ensure_network(Some(&wallet), base_sepolia()).await.unwrap();
        assert_eq!(outcome, SwitchOutcome::Added);
        assert_eq!(
            wallet.calls(),
            vec!["eth_chainId", "wallet_switchEthereumChain", "wallet_addEthereumChain"]
        );
    }

    #[tokio::test]
    async fn test_user_rejects_switch() {
        let mut wallet = MockWallet::on("0x1");
        wallet.switch_error = Some(ProviderRpcError::new(4001, "User rejected the request"));

        let result = ensure_network(Some(&wallet), base_sepolia()).await;
        assert!(matches!(result, Err(NetworkError::UserRejected)));
    }

    #[tokio::test]
    async fn test_user_rejects_add() {
        let mut wallet = MockWallet::on("0x1");
        wallet.switch_error = Some(ProviderRpcError::new(4902, "Unrecognized chain ID"));
        wallet.add_error = Some(ProviderRpcError::new(4001, "User rejected the request"));

        let result = ensure_network(Some(&wallet), base_sepolia()).await;
        assert!(matches!(result, Err(NetworkError::UserRejected)));
    }

    #[test]
    fn test_network_table() {
        assert_eq!(KnownNetwork::by_chain_id(4202).unwrap().name, "Lisk Sepolia");
        assert_eq!(KnownNetwork::get_network("base").unwrap().chain_id, 8453);
        assert!(KnownNetwork::list_networks().contains(&"anvil"));

        let params = base_sepolia().add_chain_params();
        assert_eq!(params["chainId"], "0x14a34");
        assert_eq!(params["nativeCurrency"]["decimals"], 18);
        assert_eq!(params["blockExplorerUrls"][0], "https://sepolia.basescan.org");
    }

    #[test]
    fn test_parse_chain_id() {
        assert_eq!(parse_chain_id(&json!("0x2105")).unwrap(), 8453);
        assert_eq!(parse_chain_id(&json!("31337")).unwrap(), 31337);
        assert_eq!(parse_chain_id(&json!(1)).unwrap(), 1);
        assert!(parse_chain_id(&json!(null)).is_err());
    }
}
