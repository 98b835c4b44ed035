//! Entity and sub-collection sources backed by the Quintle contracts
//!
//! Every entity contract exposes the same read surface: a counter, a per-ID
//! getter, a per-ID sub-collection count and an indexed sub-collection getter.
//! The sources below differ only in the function names and converters, so
//! they are generated from one template.

use crate::abi::{
    IAirdropManager, IBountyManager, ICampaignManager, IFundingRequestManager, IGrantManager,
    IQuestManager,
};
use crate::contract::ContractClient;
use crate::conversions::*;
use alloy::primitives::Address;
use async_trait::async_trait;
use quintle_types::reconcile::timestamp_to_u64;
use quintle_types::*;
use std::sync::Arc;
use tracing::debug;

macro_rules! evm_entity_source {
    (
        $(#[$meta:meta])*
        $name:ident {
            kind: $kind:expr,
            interface: $iface:ident,
            entity: $entity:ty,
            counter: $counter:ident,
            get: $get:ident,
            count: $count:ident,
            item: $item:ident,
            convert: $convert:path,
            convert_item: $convert_item:path $(,)?
        }
    ) => {
        $(#[$meta])*
        pub struct $name {
            client: Arc<ContractClient>,
            address: Address,
        }

        impl $name {
            /// Bind to the contract configured for this kind
            pub fn new(client: Arc<ContractClient>) -> crate::error::Result<Self> {
                let address = client.entity_contract($kind)?;
                Ok(Self { client, address })
            }

            /// Contract address this source reads from
            pub fn address(&self) -> Address {
                self.address
            }
        }

        #[async_trait]
        impl EntitySource for $name {
            type Entity = $entity;

            fn kind(&self) -> EntityKind {
                $kind
            }

            async fn counter(&self) -> SourceResult<u64> {
                let provider = self.client.create_provider()?;
                let contract = $iface::new(self.address, &provider);

                let counter = contract
                    .$counter()
                    .call()
                    .await
                    .map_err(|e| SourceError::contract_call(stringify!($counter), e))?;

                u64::try_from(counter).map_err(|e| {
                    SourceError::decode(stringify!($counter), format!("{} ({})", counter, e))
                })
            }

            async fn fetch_entity(&self, id: EntityId) -> SourceResult<Fetched<$entity>> {
                debug!("Fetching {} {}", $kind, id);

                let provider = self.client.create_provider()?;
                let contract = $iface::new(self.address, &provider);

                let (raw, count) = tokio::try_join!(
                    async {
                        contract
                            .$get(id_arg(id))
                            .call()
                            .await
                            .map_err(|e| SourceError::contract_call(stringify!($get), e))
                    },
                    async {
                        contract
                            .$count(id_arg(id))
                            .call()
                            .await
                            .map_err(|e| SourceError::contract_call(stringify!($count), e))
                    },
                )?;

                let entity = $convert(id, raw)?;
                Ok(Fetched::new(entity, Some(timestamp_to_u64(count))))
            }
        }

        #[async_trait]
        impl SubCollectionSource for $name {
            fn kind(&self) -> EntityKind {
                $kind
            }

            async fn item_count(&self, entity_id: EntityId) -> SourceResult<u64> {
                let provider = self.client.create_provider()?;
                let contract = $iface::new(self.address, &provider);

                let count = contract
                    .$count(id_arg(entity_id))
                    .call()
                    .await
                    .map_err(|e| SourceError::contract_call(stringify!($count), e))?;

                Ok(timestamp_to_u64(count))
            }

            async fn fetch_item(&self, entity_id: EntityId, index: u64) -> SourceResult<SubItem> {
                let provider = self.client.create_provider()?;
                let contract = $iface::new(self.address, &provider);

                let raw = contract
                    .$item(id_arg(entity_id), alloy::primitives::U256::from(index))
                    .call()
                    .await
                    .map_err(|e| SourceError::contract_call(stringify!($item), e))?;

                $convert_item(entity_id, index, raw)
            }
        }
    };
}

evm_entity_source! {
    /// Quests and their entries
    QuestSource {
        kind: EntityKind::Quest,
        interface: IQuestManager,
        entity: Quest,
        counter: questCounter,
        get: getQuest,
        count: getEntryCount,
        item: getEntry,
        convert: convert_quest,
        convert_item: convert_quest_entry,
    }
}

evm_entity_source! {
    /// Airdrops and their entries
    AirdropSource {
        kind: EntityKind::Airdrop,
        interface: IAirdropManager,
        entity: Airdrop,
        counter: airdropCounter,
        get: getAirdrop,
        count: getEntryCount,
        item: getEntry,
        convert: convert_airdrop,
        convert_item: convert_airdrop_entry,
    }
}

evm_entity_source! {
    /// Bounties and their submissions
    BountySource {
        kind: EntityKind::Bounty,
        interface: IBountyManager,
        entity: Bounty,
        counter: bountyCounter,
        get: getBounty,
        count: getSubmissionCount,
        item: getSubmission,
        convert: convert_bounty,
        convert_item: convert_submission,
    }
}

evm_entity_source! {
    /// Grants and their applications
    GrantSource {
        kind: EntityKind::Grant,
        interface: IGrantManager,
        entity: Grant,
        counter: grantCounter,
        get: getGrant,
        count: getApplicationCount,
        item: getApplication,
        convert: convert_grant,
        convert_item: convert_application,
    }
}

evm_entity_source! {
    /// Crowdfunding campaigns and their supporters
    CampaignSource {
        kind: EntityKind::Campaign,
        interface: ICampaignManager,
        entity: Campaign,
        counter: campaignCounter,
        get: getCampaign,
        count: getSupporterCount,
        item: getSupporter,
        convert: convert_campaign,
        convert_item: convert_supporter,
    }
}

evm_entity_source! {
    /// Funding requests and their progress updates
    FundingRequestSource {
        kind: EntityKind::FundingRequest,
        interface: IFundingRequestManager,
        entity: FundingRequest,
        counter: requestCounter,
        get: getRequest,
        count: getUpdateCount,
        item: getUpdate,
        convert: convert_funding_request,
        convert_item: convert_update,
    }
}
