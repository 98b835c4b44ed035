//! Verification registry reads

use crate::abi::IVerificationRegistry;
use crate::contract::ContractClient;
use alloy::primitives::Address;
use async_trait::async_trait;
use quintle_types::reconcile::{optional_string, timestamp_to_u64};
use quintle_types::{SourceError, SourceResult, VerificationRecord, VerificationSource};
use std::sync::Arc;

/// Convert a decoded registry record; unverified addresses read as all zero
pub fn convert_verification(raw: IVerificationRegistry::Verification) -> VerificationRecord {
    VerificationRecord {
        is_verified: raw.isVerified,
        verified_at: timestamp_to_u64(raw.verifiedAt),
        social_handle: optional_string(raw.socialHandle),
        institution_name: optional_string(raw.institutionName),
    }
}

pub struct EvmVerificationSource {
    client: Arc<ContractClient>,
    address: Address,
}

impl EvmVerificationSource {
    pub fn new(client: Arc<ContractClient>) -> crate::error::Result<Self> {
        let address = client.verification_contract()?;
        Ok(Self { client, address })
    }
}

#[async_trait]
impl VerificationSource for EvmVerificationSource {
    async fn verification(&self, account: Address) -> SourceResult<VerificationRecord> {
        let provider = self.client.create_provider()?;
        let contract = IVerificationRegistry::new(self.address, &provider);

        let raw = contract
            .getVerification(account)
            .call()
            .await
            .map_err(|e| SourceError::contract_call("getVerification", e))?;

        Ok(convert_verification(raw))
    }
}
