//! Helper functions for type conversions between Solidity and Rust types

use alloy::primitives::{Address, TxHash, U256};
use quintle_types::{EntityId, EntityKind, SourceError, SourceResult};

/// Convert Alloy Address to its EIP-55 checksummed form
pub fn address_to_string(addr: Address) -> String {
    addr.to_checksum(None)
}

/// Format transaction hash as 0x-prefixed hex
pub fn format_tx_hash(hash: TxHash) -> String {
    format!("0x{:x}", hash)
}

/// Convert an entity ID into the uint256 argument expected by the contracts
pub fn id_arg(id: EntityId) -> U256 {
    U256::from(id)
}

/// Check that a decoded struct is an issued record for the requested ID
pub fn ensure_record(
    kind: EntityKind,
    requested: EntityId,
    raw_id: U256,
    owner: Address,
) -> SourceResult<()> {
    if owner == Address::ZERO && raw_id.is_zero() {
        return Err(SourceError::not_found(kind.to_string(), requested));
    }

    if raw_id != U256::from(requested) {
        return Err(SourceError::decode(
            kind.to_string(),
            format!(
                "id field {} does not match requested id {} (struct layout mismatch?)",
                raw_id, requested
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_address_to_string_is_checksummed() {
        let addr = Address::from_str("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").unwrap();
        assert_eq!(
            address_to_string(addr),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
    }

    #[test]
    fn test_format_tx_hash() {
        assert_eq!(
            format_tx_hash(TxHash::ZERO),
            "0x0000000000000000000000000000000000000000000000000000000000000000"
        );
    }

    #[test]
    fn test_ensure_record() {
        let owner = Address::repeat_byte(0x11);
        assert!(ensure_record(EntityKind::Quest, 3, U256::from(3u64), owner).is_ok());

        let missing = ensure_record(EntityKind::Quest, 3, U256::ZERO, Address::ZERO);
        assert!(matches!(missing, Err(SourceError::NotFound { .. })));

        let drifted = ensure_record(EntityKind::Quest, 3, U256::from(9u64), owner);
        assert!(matches!(drifted, Err(SourceError::Decode { .. })));
    }
}
