//! Campaign conversions

use super::helpers::ensure_record;
use super::status::convert_campaign_status;
use crate::abi::ICampaignManager;
use quintle_types::reconcile::{extract_image_url, timestamp_to_u64};
use quintle_types::{Campaign, EntityId, EntityKind, SourceResult};

/// Convert a decoded `ICampaignManager::Campaign` into a reconciled `Campaign`
pub fn convert_campaign(id: EntityId, raw: ICampaignManager::Campaign) -> SourceResult<Campaign> {
    ensure_record(EntityKind::Campaign, id, raw.id, raw.creator)?;

    Ok(Campaign {
        id,
        creator: raw.creator,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        goal: raw.goal,
        raised: raw.raised,
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        campaign_status: convert_campaign_status(raw.status)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};
    use quintle_types::{CampaignStatus, Entity, EntityStatus};

    #[test]
    fn test_convert_campaign() {
        let raw = ICampaignManager::Campaign {
            id: U256::from(4u64),
            creator: Address::repeat_byte(0x0d),
            title: "Community studio".to_string(),
            description: "Help us build\n\nImage: ipfs://bafystudio".to_string(),
            goal: U256::from(1_000u64),
            raised: U256::from(1_250u64),
            deadline: U256::from(5u64),
            createdAt: U256::from(1u64),
            status: 1,
        };

        let campaign = convert_campaign(4, raw).unwrap();
        assert_eq!(campaign.campaign_status, CampaignStatus::Successful);
        assert_eq!(campaign.status(), EntityStatus::Resolved);
        assert_eq!(campaign.progress_bps(), 10_000);
        assert_eq!(campaign.image_url.as_deref(), Some("ipfs://bafystudio"));
    }
}
