//! Base-unit amount formatting
//!
//! Monetary fields stay `U256` base units end to end; these helpers only
//! convert at the display and input edges.

use alloy::primitives::utils::{format_units, parse_units, ParseUnits};
use alloy::primitives::U256;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount is empty")]
    Empty,

    #[error("Negative amounts are not allowed: {0}")]
    Negative(String),

    #[error("Amount {amount} has more than {decimals} decimal places")]
    TooPrecise { amount: String, decimals: u8 },

    #[error("Invalid amount {amount}: {message}")]
    Invalid { amount: String, message: String },
}

/// Human-readable amount with trailing zeros removed (`1500000`, 6 -> `1.5`)
pub fn format_amount(amount: U256, decimals: u8) -> String {
    if decimals == 0 {
        return amount.to_string();
    }

    let formatted = match format_units(amount, decimals) {
        Ok(formatted) => formatted,
        Err(_) => return amount.to_string(),
    };

    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Parse a decimal string into base units
pub fn parse_amount(input: &str, decimals: u8) -> Result<U256, AmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AmountError::Empty);
    }
    if input.starts_with('-') {
        return Err(AmountError::Negative(input.to_string()));
    }

    if let Some((_, fraction)) = input.split_once('.') {
        if fraction.len() > usize::from(decimals) {
            return Err(AmountError::TooPrecise {
                amount: input.to_string(),
                decimals,
            });
        }
    }

    match parse_units(input, decimals) {
        Ok(ParseUnits::U256(value)) => Ok(value),
        Ok(ParseUnits::I256(_)) => Err(AmountError::Negative(input.to_string())),
        Err(e) => Err(AmountError::Invalid {
            amount: input.to_string(),
            message: e.to_string(),
        }),
    }
}
