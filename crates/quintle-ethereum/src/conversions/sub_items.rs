//! Sub-collection item conversions (entries, submissions, applications,
//! supporters, updates)

use crate::abi::{
    IAirdropManager, IBountyManager, ICampaignManager, IFundingRequestManager, IGrantManager,
    IQuestManager,
};
use alloy::primitives::{Address, U256};
use quintle_types::reconcile::{extract_image_url, timestamp_to_u64};
use quintle_types::{EntityId, SourceError, SourceResult, SubItem};

fn build_item(
    entity_id: EntityId,
    index: u64,
    account: Address,
    content: String,
    amount: Option<U256>,
    submitted_at: U256,
    status: u8,
) -> SourceResult<SubItem> {
    if account == Address::ZERO {
        return Err(SourceError::not_found(
            "sub-collection item",
            format!("{}/{}", entity_id, index),
        ));
    }

    Ok(SubItem {
        entity_id,
        index,
        account,
        image_url: extract_image_url(&content),
        content,
        amount,
        submitted_at: timestamp_to_u64(submitted_at),
        status,
    })
}

pub fn convert_quest_entry(
    entity_id: EntityId,
    index: u64,
    raw: IQuestManager::Entry,
) -> SourceResult<SubItem> {
    build_item(entity_id, index, raw.participant, raw.content, None, raw.submittedAt, raw.status)
}

pub fn convert_airdrop_entry(
    entity_id: EntityId,
    index: u64,
    raw: IAirdropManager::Entry,
) -> SourceResult<SubItem> {
    build_item(entity_id, index, raw.participant, raw.content, None, raw.submittedAt, raw.status)
}

pub fn convert_submission(
    entity_id: EntityId,
    index: u64,
    raw: IBountyManager::Submission,
) -> SourceResult<SubItem> {
    build_item(entity_id, index, raw.submitter, raw.content, None, raw.submittedAt, raw.status)
}

pub fn convert_application(
    entity_id: EntityId,
    index: u64,
    raw: IGrantManager::Application,
) -> SourceResult<SubItem> {
    build_item(entity_id, index, raw.applicant, raw.proposal, None, raw.submittedAt, raw.status)
}

pub fn convert_supporter(
    entity_id: EntityId,
    index: u64,
    raw: ICampaignManager::Supporter,
) -> SourceResult<SubItem> {
    build_item(
        entity_id,
        index,
        raw.supporter,
        raw.message,
        Some(raw.amount),
        raw.contributedAt,
        0,
    )
}

pub fn convert_update(
    entity_id: EntityId,
    index: u64,
    raw: IFundingRequestManager::Update,
) -> SourceResult<SubItem> {
    build_item(entity_id, index, raw.author, raw.content, None, raw.postedAt, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_quest_entry() {
        let raw = IQuestManager::Entry {
            participant: Address::repeat_byte(0x05),
            content: "my submission\n\nImage: ipfs://bafyentry".to_string(),
            submittedAt: U256::from(1_700_000_100u64),
            status: 1,
        };

        let item = convert_quest_entry(3, 0, raw).unwrap();
        assert_eq!(item.entity_id, 3);
        assert_eq!(item.index, 0);
        assert_eq!(item.status, 1);
        assert_eq!(item.amount, None);
        assert_eq!(item.image_url.as_deref(), Some("ipfs://bafyentry"));
    }

    #[test]
    fn test_convert_supporter_keeps_amount() {
        let raw = ICampaignManager::Supporter {
            supporter: Address::repeat_byte(0x06),
            amount: U256::from(250u64),
            message: "good luck".to_string(),
            contributedAt: U256::from(5u64),
        };

        let item = convert_supporter(1, 4, raw).unwrap();
        assert_eq!(item.amount, Some(U256::from(250u64)));
        assert_eq!(item.content, "good luck");
    }

    #[test]
    fn test_empty_slot_is_not_found() {
        let raw = IFundingRequestManager::Update {
            author: Address::ZERO,
            content: String::new(),
            postedAt: U256::ZERO,
        };
        assert!(matches!(
            convert_update(1, 0, raw),
            Err(SourceError::NotFound { .. })
        ));
    }
}
