//! Grant conversions

use super::helpers::ensure_record;
use super::status::convert_status;
use crate::abi::IGrantManager;
use quintle_types::reconcile::{extract_image_url, narrow_count, timestamp_to_u64};
use quintle_types::{EntityId, EntityKind, Grant, SourceResult};

/// Convert a decoded `IGrantManager::Grant` into a reconciled `Grant`
pub fn convert_grant(id: EntityId, raw: IGrantManager::Grant) -> SourceResult<Grant> {
    ensure_record(EntityKind::Grant, id, raw.id, raw.creator)?;

    Ok(Grant {
        id,
        creator: raw.creator,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        total_funds: raw.totalFunds,
        remaining_funds: raw.remainingFunds,
        max_applicants: narrow_count(raw.maxApplicants),
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        status: convert_status(EntityKind::Grant, raw.status)?,
    })
}
