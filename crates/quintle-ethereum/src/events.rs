//! Log subscriptions for the entity contracts
//!
//! Events are only used as invalidation triggers: the payload is not decoded,
//! the topic0 hash is mapped back to the event name and classified as a
//! creation or mutation event for the subscribed kind.

use crate::abi::{
    IAirdropManager, IBountyManager, ICampaignManager, IFundingRequestManager, IGrantManager,
    IQuestManager,
};
use crate::contract::ContractClient;
use alloy::primitives::B256;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{BlockNumberOrTag, Filter};
use alloy::sol_types::SolEvent;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use quintle_types::{
    ChainEvent, ChainEventStream, EntityKind, EventSource, SourceError, SourceResult,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// `(event name, topic0)` pairs watched for an entity kind
pub fn event_signatures(kind: EntityKind) -> Vec<(&'static str, B256)> {
    match kind {
        EntityKind::Quest => vec![
            ("QuestCreated", IQuestManager::QuestCreated::SIGNATURE_HASH),
            ("EntrySubmitted", IQuestManager::EntrySubmitted::SIGNATURE_HASH),
            ("QuestResolved", IQuestManager::QuestResolved::SIGNATURE_HASH),
            ("QuestCancelled", IQuestManager::QuestCancelled::SIGNATURE_HASH),
        ],
        EntityKind::Airdrop => vec![
            ("AirdropCreated", IAirdropManager::AirdropCreated::SIGNATURE_HASH),
            (
                "AirdropEntrySubmitted",
                IAirdropManager::AirdropEntrySubmitted::SIGNATURE_HASH,
            ),
            ("AirdropResolved", IAirdropManager::AirdropResolved::SIGNATURE_HASH),
            ("AirdropCancelled", IAirdropManager::AirdropCancelled::SIGNATURE_HASH),
        ],
        EntityKind::Bounty => vec![
            ("BountyCreated", IBountyManager::BountyCreated::SIGNATURE_HASH),
            ("SubmissionReceived", IBountyManager::SubmissionReceived::SIGNATURE_HASH),
            ("WinnersSelected", IBountyManager::WinnersSelected::SIGNATURE_HASH),
            ("BountyCancelled", IBountyManager::BountyCancelled::SIGNATURE_HASH),
        ],
        EntityKind::Grant => vec![
            ("GrantCreated", IGrantManager::GrantCreated::SIGNATURE_HASH),
            ("ApplicationSubmitted", IGrantManager::ApplicationSubmitted::SIGNATURE_HASH),
            ("ApplicationReviewed", IGrantManager::ApplicationReviewed::SIGNATURE_HASH),
            ("GrantCancelled", IGrantManager::GrantCancelled::SIGNATURE_HASH),
        ],
        EntityKind::Campaign => vec![
            ("CampaignCreated", ICampaignManager::CampaignCreated::SIGNATURE_HASH),
            ("ContributionReceived", ICampaignManager::ContributionReceived::SIGNATURE_HASH),
            ("CampaignFinalized", ICampaignManager::CampaignFinalized::SIGNATURE_HASH),
            ("CampaignCancelled", ICampaignManager::CampaignCancelled::SIGNATURE_HASH),
        ],
        EntityKind::FundingRequest => vec![
            ("RequestCreated", IFundingRequestManager::RequestCreated::SIGNATURE_HASH),
            ("RequestFunded", IFundingRequestManager::RequestFunded::SIGNATURE_HASH),
            ("UpdatePosted", IFundingRequestManager::UpdatePosted::SIGNATURE_HASH),
            ("MilestoneReleased", IFundingRequestManager::MilestoneReleased::SIGNATURE_HASH),
        ],
    }
}

/// Map a log's topic0 to a classified chain event
pub fn classify_log(
    kind: EntityKind,
    signatures: &[(&'static str, B256)],
    topic0: Option<&B256>,
    block_number: Option<u64>,
) -> Option<ChainEvent> {
    let topic0 = topic0?;
    let (name, _) = signatures.iter().find(|(_, hash)| hash == topic0)?;
    let class = kind.classify(name)?;

    Some(ChainEvent {
        kind,
        name: name.to_string(),
        class,
        block_number: block_number.unwrap_or(0),
    })
}

/// WebSocket log subscriber with automatic reconnect
pub struct EvmEventSource {
    client: Arc<ContractClient>,
}

impl EvmEventSource {
    pub fn new(client: Arc<ContractClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl EventSource for EvmEventSource {
    async fn subscribe(&self, kind: EntityKind) -> SourceResult<ChainEventStream> {
        let ws_url = self.client.config().ws_url.clone().ok_or_else(|| {
            SourceError::configuration("WebSocket URL not configured - cannot create event stream")
        })?;
        let address = self.client.entity_contract(kind)?;
        let reconnect_delay = Duration::from_secs(self.client.config().reconnect_delay_secs);
        let signatures = event_signatures(kind);

        info!("Ethereum: Listening for {} events from {} via {}", kind, address, ws_url);

        let stream = stream! {
            loop {
                match ProviderBuilder::new().connect(&ws_url).await {
                    Ok(provider) => {
                        info!("Ethereum: Connected to WebSocket event stream");

                        let filter = Filter::new()
                            .address(address)
                            .event_signature(
                                signatures.iter().map(|(_, hash)| *hash).collect::<Vec<B256>>(),
                            )
                            .from_block(BlockNumberOrTag::Latest);

                        match provider.subscribe_logs(&filter).await {
                            Ok(subscription) => {
                                info!("Ethereum: Subscribed to {} events", kind);

                                let mut logs = subscription.into_stream();
                                while let Some(log) = logs.next().await {
                                    match classify_log(kind, &signatures, log.topic0(), log.block_number) {
                                        Some(event) => {
                                            debug!(
                                                "Ethereum: {} event {} at block {}",
                                                kind, event.name, event.block_number
                                            );
                                            yield Ok(event);
                                        }
                                        None => debug!("Ethereum: ignoring unrecognised {} log", kind),
                                    }
                                }

                                warn!("Ethereum: Log subscription stream ended");
                            }
                            Err(e) => {
                                error!("Ethereum: Failed to subscribe to logs: {}", e);
                                yield Err(SourceError::rpc(format!("Failed to subscribe to logs: {}", e)));
                            }
                        }
                    }
                    Err(e) => {
                        error!("Ethereum: WebSocket connection failed: {}", e);
                        yield Err(SourceError::rpc(format!("WebSocket connection failed: {}", e)));
                    }
                }

                warn!(
                    "Ethereum: WebSocket stream disconnected, reconnecting in {}s...",
                    reconnect_delay.as_secs()
                );
                tokio::time::sleep(reconnect_delay).await;
            }
        };

        Ok(Box::pin(stream))
    }
}
