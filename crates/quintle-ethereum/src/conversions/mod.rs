//! Conversions from Solidity ABI structs to reconciled Quintle records
//!
//! Every decoder checks the record it was handed before naming its fields:
//! a zeroed struct means the ID has not been issued (or was skipped) and is
//! reported as `NotFound`, and an `id` field that disagrees with the requested
//! ID means the struct layout drifted from the binding and is reported as a
//! `Decode` error. Both downgrade only the affected ID in a batch load.

pub mod airdrop;
pub mod bounty;
pub mod campaign;
pub mod funding;
pub mod grant;
pub mod helpers;
pub mod quest;
pub mod status;
pub mod sub_items;

pub use airdrop::*;
pub use bounty::*;
pub use campaign::*;
pub use funding::*;
pub use grant::*;
pub use helpers::*;
pub use quest::*;
pub use status::*;
pub use sub_items::*;
