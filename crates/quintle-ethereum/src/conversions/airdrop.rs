//! Airdrop conversions

use super::helpers::ensure_record;
use crate::abi::IAirdropManager;
use quintle_types::reconcile::{extract_image_url, narrow_count, timestamp_to_u64};
use quintle_types::{Airdrop, EntityId, EntityKind, SourceResult};

/// Convert a decoded `IAirdropManager::Airdrop` into a reconciled `Airdrop`
pub fn convert_airdrop(id: EntityId, raw: IAirdropManager::Airdrop) -> SourceResult<Airdrop> {
    ensure_record(EntityKind::Airdrop, id, raw.id, raw.creator)?;

    Ok(Airdrop {
        id,
        creator: raw.creator,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        token: raw.token,
        total_amount: raw.totalAmount,
        per_user_amount: raw.perUserAmount,
        max_qualifiers: narrow_count(raw.maxQualifiers),
        qualifiers_count: narrow_count(raw.qualifiersCount),
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        resolved: raw.resolved,
        cancelled: raw.cancelled,
    })
}
