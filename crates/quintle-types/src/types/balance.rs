//! Token and pending balance types

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A token known to the withdrawal aggregator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub address: Address,
    pub symbol: String,
    pub decimals: u8,
}

/// Withdrawable balance owed to an account, summed over every source contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBalance {
    pub token: Address,
    pub symbol: String,
    pub decimals: u8,
    pub amount: U256,
}
