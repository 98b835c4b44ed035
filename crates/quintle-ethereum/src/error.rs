//! Error types for the Ethereum chain backend

use quintle_types::SourceError;
use thiserror::Error;

/// Result type alias for Ethereum backend operations
pub type Result<T> = std::result::Result<T, EthereumError>;

/// Errors that can occur while configuring or connecting the Ethereum backend
#[derive(Debug, Error)]
pub enum EthereumError {
    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Contract for an entity kind is not configured
    #[error("No contract address configured for {0}")]
    MissingContract(String),

    /// Invalid Ethereum address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// No private key configured for write operations
    #[error("No private key configured - write operations require private_key in config")]
    NoPrivateKey,

    /// Wallet/signer error
    #[error("Wallet error: {0}")]
    WalletError(String),

    /// Provider creation or connection error
    #[error("Provider error: {0}")]
    ProviderError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl EthereumError {
    /// Check if this error indicates a configuration problem
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_)
                | Self::MissingContract(_)
                | Self::InvalidAddress(_)
                | Self::NoPrivateKey
                | Self::WalletError(_)
                | Self::Toml(_)
        )
    }
}

impl From<EthereumError> for SourceError {
    fn from(err: EthereumError) -> Self {
        match err {
            EthereumError::ProviderError(message) => SourceError::rpc(message),
            other => SourceError::configuration(other.to_string()),
        }
    }
}
