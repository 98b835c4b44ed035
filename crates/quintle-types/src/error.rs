//! Error types for chain source operations

use std::fmt;
use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Errors raised by entity, balance, event and verification sources
#[derive(Error, Debug)]
pub enum SourceError {
    /// Contract read reverted or could not be executed
    #[error("Contract call {function} failed: {message}")]
    ContractCall { function: String, message: String },

    /// Returned data did not match the expected schema
    #[error("Failed to decode {what}: {message}")]
    Decode { what: String, message: String },

    /// Network or RPC connection error
    #[error("RPC error: {message}")]
    Rpc { message: String },

    /// Transaction (write operation) failed
    #[error("Transaction failed: {message}")]
    Transaction {
        message: String,
        tx_hash: Option<String>,
    },

    /// Source is misconfigured (missing address, no signer, ...)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Resource not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Operation not supported by this source
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Wrapper for other error types
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SourceError {
    /// Create a contract call error
    pub fn contract_call(function: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::ContractCall {
            function: function.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error
    pub fn decode(what: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            what: what.into(),
            message: message.to_string(),
        }
    }

    /// Create an RPC error
    pub fn rpc(message: impl fmt::Display) -> Self {
        Self::Rpc {
            message: message.to_string(),
        }
    }

    /// Create a transaction error
    pub fn transaction(message: impl fmt::Display, tx_hash: Option<String>) -> Self {
        Self::Transaction {
            message: message.to_string(),
            tx_hash,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>, id: impl fmt::Display) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.to_string(),
        }
    }

    /// Transient failures that may succeed on the next reload
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Rpc { .. } | Self::ContractCall { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_retriable() {
        assert!(SourceError::rpc("connection reset").is_retriable());
        assert!(SourceError::contract_call("getQuest", "execution reverted").is_retriable());
        assert!(!SourceError::decode("Quest", "invalid length").is_retriable());
        assert!(!SourceError::configuration("no signer").is_retriable());
    }

    #[test]
    fn test_error_display() {
        let err = SourceError::contract_call("getQuest", "execution reverted");
        assert_eq!(
            err.to_string(),
            "Contract call getQuest failed: execution reverted"
        );

        let err = SourceError::not_found("Quest", 7);
        assert_eq!(err.to_string(), "Quest not found: 7");
    }
}
