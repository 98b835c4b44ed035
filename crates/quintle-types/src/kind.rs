//! Entity kinds and their event tables

use crate::types::EventClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The top-level on-chain record types served by the aggregation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Quest,
    Airdrop,
    Bounty,
    Grant,
    Campaign,
    FundingRequest,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quest => write!(f, "Quest"),
            Self::Airdrop => write!(f, "Airdrop"),
            Self::Bounty => write!(f, "Bounty"),
            Self::Grant => write!(f, "Grant"),
            Self::Campaign => write!(f, "Campaign"),
            Self::FundingRequest => write!(f, "FundingRequest"),
        }
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "quest" | "quests" => Ok(Self::Quest),
            "airdrop" | "airdrops" => Ok(Self::Airdrop),
            "bounty" | "bounties" => Ok(Self::Bounty),
            "grant" | "grants" => Ok(Self::Grant),
            "campaign" | "campaigns" => Ok(Self::Campaign),
            "fundingrequest" | "fundingrequests" | "funding" => Ok(Self::FundingRequest),
            other => Err(format!("unknown entity kind: {}", other)),
        }
    }
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        Self::Quest,
        Self::Airdrop,
        Self::Bounty,
        Self::Grant,
        Self::Campaign,
        Self::FundingRequest,
    ];

    /// Name of the per-entity sub-collection
    pub fn sub_collection_name(&self) -> &'static str {
        match self {
            Self::Quest | Self::Airdrop => "entries",
            Self::Bounty => "submissions",
            Self::Grant => "applications",
            Self::Campaign => "supporters",
            Self::FundingRequest => "updates",
        }
    }

    /// Events emitted when a new entity is issued (the counter moves)
    pub fn creation_events(&self) -> &'static [&'static str] {
        match self {
            Self::Quest => &["QuestCreated"],
            Self::Airdrop => &["AirdropCreated"],
            Self::Bounty => &["BountyCreated"],
            Self::Grant => &["GrantCreated"],
            Self::Campaign => &["CampaignCreated"],
            Self::FundingRequest => &["RequestCreated"],
        }
    }

    /// Events that change fields of an existing entity
    pub fn mutation_events(&self) -> &'static [&'static str] {
        match self {
            Self::Quest => &["EntrySubmitted", "QuestResolved", "QuestCancelled"],
            Self::Airdrop => &[
                "AirdropEntrySubmitted",
                "AirdropResolved",
                "AirdropCancelled",
            ],
            Self::Bounty => &["SubmissionReceived", "WinnersSelected", "BountyCancelled"],
            Self::Grant => &[
                "ApplicationSubmitted",
                "ApplicationReviewed",
                "GrantCancelled",
            ],
            Self::Campaign => &[
                "ContributionReceived",
                "CampaignFinalized",
                "CampaignCancelled",
            ],
            Self::FundingRequest => &["RequestFunded", "UpdatePosted", "MilestoneReleased"],
        }
    }

    /// Classify an event name for this kind
    pub fn classify(&self, event_name: &str) -> Option<EventClass> {
        if self.creation_events().contains(&event_name) {
            Some(EventClass::Creation)
        } else if self.mutation_events().contains(&event_name) {
            Some(EventClass::Mutation)
        } else {
            None
        }
    }
}
