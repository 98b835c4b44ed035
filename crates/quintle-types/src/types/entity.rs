//! Reconciled entity records

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// 1-based sequential ID assigned by the contract counter
pub type EntityId = u64;

/// Lifecycle status shared by every entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityStatus {
    Active,
    Resolved,
    Cancelled,
    Expired,
}

impl EntityStatus {
    /// Status derived from the independent `resolved` / `cancelled` flags.
    /// Cancellation takes precedence over resolution.
    pub fn from_flags(resolved: bool, cancelled: bool) -> Self {
        if cancelled {
            Self::Cancelled
        } else if resolved {
            Self::Resolved
        } else {
            Self::Active
        }
    }

    /// Terminal statuses block further mutating actions in the UI
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Active)
    }
}

/// Common view over every reconciled entity
pub trait Entity: Clone + Debug + PartialEq + Send + Sync + 'static {
    fn id(&self) -> EntityId;

    fn creator(&self) -> Address;

    fn title(&self) -> &str;

    fn image_url(&self) -> Option<&str>;

    fn status(&self) -> EntityStatus;

    /// Unix seconds, 0 when the entity has no deadline
    fn deadline(&self) -> u64;

    /// Active entities are open and before their deadline
    fn is_active(&self, now: u64) -> bool {
        self.status() == EntityStatus::Active && (self.deadline() == 0 || self.deadline() > now)
    }
}

/// Entity fetched together with its sub-collection count
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<E> {
    pub entity: E,
    pub sub_count: Option<u64>,
}

impl<E> Fetched<E> {
    pub fn new(entity: E, sub_count: Option<u64>) -> Self {
        Self { entity, sub_count }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: EntityId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub reward_per_qualifier: U256,
    pub max_qualifiers: u32,
    pub qualifiers_count: u32,
    pub deadline: u64,
    pub created_at: u64,
    pub resolved: bool,
    pub cancelled: bool,
    pub image_url: Option<String>,
}

impl Quest {
    /// Total reward escrowed for all qualifier slots
    pub fn total_reward(&self) -> U256 {
        self.reward_per_qualifier
            .saturating_mul(U256::from(self.max_qualifiers))
    }

    /// Remaining qualifier slots
    pub fn slots_left(&self) -> u32 {
        self.max_qualifiers.saturating_sub(self.qualifiers_count)
    }
}

impl Entity for Quest {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        EntityStatus::from_flags(self.resolved, self.cancelled)
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airdrop {
    pub id: EntityId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub token: Address,
    pub total_amount: U256,
    pub per_user_amount: U256,
    pub max_qualifiers: u32,
    pub qualifiers_count: u32,
    pub deadline: u64,
    pub created_at: u64,
    pub resolved: bool,
    pub cancelled: bool,
    pub image_url: Option<String>,
}

impl Entity for Airdrop {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        EntityStatus::from_flags(self.resolved, self.cancelled)
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub id: EntityId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub amount: U256,
    pub deadline: u64,
    pub created_at: u64,
    pub status: EntityStatus,
    pub image_url: Option<String>,
}

impl Entity for Bounty {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        self.status
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    pub id: EntityId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub total_funds: U256,
    pub remaining_funds: U256,
    pub max_applicants: u32,
    pub deadline: u64,
    pub created_at: u64,
    pub status: EntityStatus,
    pub image_url: Option<String>,
}

impl Entity for Grant {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        self.status
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// Crowdfunding outcome as tracked by the campaign contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CampaignStatus {
    Active,
    Successful,
    Failed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: EntityId,
    pub creator: Address,
    pub title: String,
    pub description: String,
    pub goal: U256,
    pub raised: U256,
    pub deadline: u64,
    pub created_at: u64,
    pub campaign_status: CampaignStatus,
    pub image_url: Option<String>,
}

impl Campaign {
    /// Funding progress in basis points, capped at 10_000
    pub fn progress_bps(&self) -> u32 {
        if self.goal.is_zero() {
            return 0;
        }
        let bps = self.raised.saturating_mul(U256::from(10_000u32)) / self.goal;
        u32::try_from(bps).unwrap_or(u32::MAX).min(10_000)
    }
}

impl Entity for Campaign {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.creator
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        match self.campaign_status {
            CampaignStatus::Active => EntityStatus::Active,
            CampaignStatus::Successful => EntityStatus::Resolved,
            CampaignStatus::Failed => EntityStatus::Expired,
            CampaignStatus::Cancelled => EntityStatus::Cancelled,
        }
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundingRequest {
    pub id: EntityId,
    pub requester: Address,
    pub title: String,
    pub description: String,
    pub amount_requested: U256,
    pub amount_funded: U256,
    pub milestone_count: u32,
    pub deadline: u64,
    pub created_at: u64,
    pub status: EntityStatus,
    pub image_url: Option<String>,
}

impl Entity for FundingRequest {
    fn id(&self) -> EntityId {
        self.id
    }

    fn creator(&self) -> Address {
        self.requester
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    fn status(&self) -> EntityStatus {
        self.status
    }

    fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// One item of a per-entity sub-collection, keyed by `(entity_id, index)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubItem {
    pub entity_id: EntityId,
    pub index: u64,
    pub account: Address,
    pub content: String,
    /// Contributed amount, for sub-collections that carry one
    pub amount: Option<U256>,
    pub submitted_at: u64,
    /// Contract-specific status discriminant, passed through unchanged
    pub status: u8,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quest(resolved: bool, cancelled: bool, deadline: u64) -> Quest {
        Quest {
            id: 1,
            creator: Address::ZERO,
            title: "Write a thread".to_string(),
            description: String::new(),
            reward_per_qualifier: U256::from(5u64),
            max_qualifiers: 10,
            qualifiers_count: 3,
            deadline,
            created_at: 100,
            resolved,
            cancelled,
            image_url: None,
        }
    }

    #[test]
    fn test_status_from_flags() {
        assert_eq!(EntityStatus::from_flags(false, false), EntityStatus::Active);
        assert_eq!(EntityStatus::from_flags(true, false), EntityStatus::Resolved);
        assert_eq!(EntityStatus::from_flags(true, true), EntityStatus::Cancelled);
        assert!(!EntityStatus::Active.is_terminal());
        assert!(EntityStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_is_active_respects_deadline() {
        assert!(quest(false, false, 2_000).is_active(1_000));
        assert!(!quest(false, false, 2_000).is_active(2_000));
        assert!(quest(false, false, 0).is_active(u64::MAX));
        assert!(!quest(true, false, 2_000).is_active(1_000));
    }

    #[test]
    fn test_quest_helpers() {
        let q = quest(false, false, 0);
        assert_eq!(q.total_reward(), U256::from(50u64));
        assert_eq!(q.slots_left(), 7);
    }

    #[test]
    fn test_campaign_progress() {
        let mut campaign = Campaign {
            id: 2,
            creator: Address::ZERO,
            title: "Studio".to_string(),
            description: String::new(),
            goal: U256::from(200u64),
            raised: U256::from(50u64),
            deadline: 0,
            created_at: 0,
            campaign_status: CampaignStatus::Active,
            image_url: None,
        };
        assert_eq!(campaign.progress_bps(), 2_500);

        campaign.raised = U256::from(500u64);
        assert_eq!(campaign.progress_bps(), 10_000);

        campaign.goal = U256::ZERO;
        assert_eq!(campaign.progress_bps(), 0);

        campaign.campaign_status = CampaignStatus::Failed;
        assert_eq!(campaign.status(), EntityStatus::Expired);
    }
}
