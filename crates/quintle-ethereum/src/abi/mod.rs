//! Contract ABI bindings module
//!
//! Alloy `sol!` bindings for the Quintle contracts. Field order of every struct
//! follows the deployed ABI; the typed decoders fail on any mismatch.

pub mod airdrop_manager;
pub mod bounty_manager;
pub mod campaign_manager;
pub mod funding_manager;
pub mod grant_manager;
pub mod quest_manager;
pub mod verification;
pub mod withdrawable;

pub use airdrop_manager::IAirdropManager;
pub use bounty_manager::IBountyManager;
pub use campaign_manager::ICampaignManager;
pub use funding_manager::IFundingRequestManager;
pub use grant_manager::IGrantManager;
pub use quest_manager::IQuestManager;
pub use verification::IVerificationRegistry;
pub use withdrawable::IWithdrawable;
