//! Status discriminant conversions

use quintle_types::{CampaignStatus, EntityKind, EntityStatus, SourceError, SourceResult};

/// Convert a Solidity status enum (u8) to the shared entity status.
///
/// Bounty:         0 Active, 1 Completed, 2 Cancelled, 3 Expired
/// Grant:          0 Open,   1 Closed,    2 Cancelled
/// FundingRequest: 0 Open,   1 Funded,    2 Cancelled, 3 Expired
///
/// Unknown discriminants are a decode error rather than a silent default.
pub fn convert_status(kind: EntityKind, status: u8) -> SourceResult<EntityStatus> {
    let converted = match (kind, status) {
        (_, 0) => Some(EntityStatus::Active),
        (_, 1) => Some(EntityStatus::Resolved),
        (_, 2) => Some(EntityStatus::Cancelled),
        (EntityKind::Bounty | EntityKind::FundingRequest, 3) => Some(EntityStatus::Expired),
        _ => None,
    };

    converted.ok_or_else(|| {
        SourceError::decode(format!("{} status", kind), format!("unknown discriminant {}", status))
    })
}

/// Convert the campaign status enum (u8): 0 Active, 1 Successful, 2 Failed, 3 Cancelled
pub fn convert_campaign_status(status: u8) -> SourceResult<CampaignStatus> {
    match status {
        0 => Ok(CampaignStatus::Active),
        1 => Ok(CampaignStatus::Successful),
        2 => Ok(CampaignStatus::Failed),
        3 => Ok(CampaignStatus::Cancelled),
        other => Err(SourceError::decode(
            "Campaign status",
            format!("unknown discriminant {}", other),
        )),
    }
}
