//! Funding request conversions

use super::helpers::ensure_record;
use super::status::convert_status;
use crate::abi::IFundingRequestManager;
use quintle_types::reconcile::{extract_image_url, narrow_count, timestamp_to_u64};
use quintle_types::{EntityId, EntityKind, FundingRequest, SourceResult};

/// Convert a decoded `IFundingRequestManager::FundingRequest`
pub fn convert_funding_request(
    id: EntityId,
    raw: IFundingRequestManager::FundingRequest,
) -> SourceResult<FundingRequest> {
    ensure_record(EntityKind::FundingRequest, id, raw.id, raw.requester)?;

    Ok(FundingRequest {
        id,
        requester: raw.requester,
        image_url: extract_image_url(&raw.description),
        title: raw.title,
        description: raw.description,
        amount_requested: raw.amountRequested,
        amount_funded: raw.amountFunded,
        milestone_count: narrow_count(raw.milestoneCount),
        deadline: timestamp_to_u64(raw.deadline),
        created_at: timestamp_to_u64(raw.createdAt),
        status: convert_status(EntityKind::FundingRequest, raw.status)?,
    })
}
