//! Quest conversions

use super::helpers::ensure_record;
use crate::abi::IQuestManager;
use quintle_types::reconcile::{extract_image_url, narrow_count, timestamp_to_u64};
use quintle_types::{EntityId, EntityKind, Quest, SourceResult};

/// Convert a decoded `IQuestManager::Quest` into a reconciled `Quest`
pub fn convert_quest(id: EntityId, raw: IQuestManager::Quest) -> SourceResult<Quest> {
    ensure_record(EntityKind::Quest, id, raw.id, raw.creator)?;

    Ok(Quest {
        id,
        creator: raw.creator,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        reward_per_qualifier: raw.rewardPerQualifier,
        max_qualifiers: narrow_count(raw.maxQualifiers),
        qualifiers_count: narrow_count(raw.qualifiersCount),
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        resolved: raw.resolved,
        cancelled: raw.cancelled,
    })
}
