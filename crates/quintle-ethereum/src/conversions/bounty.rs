//! Bounty conversions

use super::helpers::ensure_record;
use super::status::convert_status;
use crate::abi::IBountyManager;
use quintle_types::reconcile::{extract_image_url, timestamp_to_u64};
use quintle_types::{Bounty, EntityId, EntityKind, SourceResult};

/// Convert a decoded `IBountyManager::Bounty` into a reconciled `Bounty`
pub fn convert_bounty(id: EntityId, raw: IBountyManager::Bounty) -> SourceResult<Bounty> {
    ensure_record(EntityKind::Bounty, id, raw.id, raw.creator)?;

    Ok(Bounty {
        id,
        creator: raw.creator,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        amount: raw.amount,
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        status: convert_status(EntityKind::Bounty, raw.status)?,
    })
}
