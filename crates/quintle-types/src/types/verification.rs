//! Verification records

use serde::{Deserialize, Serialize};

/// Verification state of one address, independent of any entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub is_verified: bool,
    /// Unix seconds, 0 when never verified
    pub verified_at: u64,
    pub social_handle: Option<String>,
    pub institution_name: Option<String>,
}
