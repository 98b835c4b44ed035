//! Pending balance reads and withdrawals over the pull-payment interface

use crate::abi::IWithdrawable;
use crate::contract::ContractClient;
use crate::conversions::format_tx_hash;
use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use quintle_types::{BalanceSource, SourceError, SourceResult};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Balance source talking to `IWithdrawable` contracts
pub struct EvmBalanceSource {
    client: Arc<ContractClient>,
}

impl EvmBalanceSource {
    pub fn new(client: Arc<ContractClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceSource for EvmBalanceSource {
    async fn pending_balance(
        &self,
        source: Address,
        token: Address,
        account: Address,
    ) -> SourceResult<U256> {
        let provider = self.client.create_provider()?;
        let contract = IWithdrawable::new(source, &provider);

        contract
            .pendingWithdrawals(account, token)
            .call()
            .await
            .map_err(|e| SourceError::contract_call("pendingWithdrawals", e))
    }

    async fn withdraw(&self, source: Address, token: Address) -> SourceResult<String> {
        debug!("Withdrawing token {} from {}", token, source);

        let provider = self.client.create_provider_with_signer()?;
        let contract = IWithdrawable::new(source, &provider);

        let pending_tx = contract
            .withdraw(token)
            .send()
            .await
            .map_err(|e| SourceError::transaction(e, None))?;

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| SourceError::transaction(e, None))?;

        let tx_hash = format_tx_hash(receipt.transaction_hash);
        if !receipt.status() {
            warn!("Withdrawal from {} reverted: {}", source, tx_hash);
            return Err(SourceError::transaction(
                "withdraw reverted",
                Some(tx_hash),
            ));
        }

        info!("Withdrawal from {} confirmed: {}", source, tx_hash);
        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainConfig;

    #[tokio::test]
    async fn test_withdraw_requires_signer() {
        let client = Arc::new(ContractClient::new(ChainConfig::default()).unwrap());
        let source = EvmBalanceSource::new(client);

        let result = source
            .withdraw(Address::repeat_byte(0x01), Address::ZERO)
            .await;
        assert!(matches!(result, Err(SourceError::Configuration { .. })));
    }
}
