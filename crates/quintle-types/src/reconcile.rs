//! Reconciliation helpers shared by every entity decoder
//!
//! Raw contract structs are converted into named records by the chain
//! backends; the derived fields (embedded image reference, narrowed counts,
//! capped timestamps) are computed here so every backend derives them the same
//! way.

use alloy::primitives::U256;

/// Marker of the trailing image segment appended to descriptions
pub const IMAGE_SEGMENT_MARKER: &str = "\n\nImage:";

/// Scheme prefix of inline content-addressed references
pub const IPFS_SCHEME: &str = "ipfs://";

/// Extract the image reference embedded in a free-text description.
///
/// Two patterns are recognised: a trailing `"\n\nImage: <value>"` segment and
/// an inline `ipfs://<cid>` token. The explicit `Image:` segment wins when both
/// are present; otherwise the first inline `ipfs://` token is returned.
pub fn extract_image_url(description: &str) -> Option<String> {
    if description.is_empty() {
        return None;
    }

    if let Some(pos) = description.rfind(IMAGE_SEGMENT_MARKER) {
        // Only the first token belongs to the segment
        if let Some(value) = description[pos + IMAGE_SEGMENT_MARKER.len()..]
            .split_whitespace()
            .next()
        {
            return Some(value.to_string());
        }
    }

    let start = description.find(IPFS_SCHEME)?;
    let token: String = description[start..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();

    if token.len() > IPFS_SCHEME.len() {
        Some(token)
    } else {
        None
    }
}

/// Description with a trailing `Image:` segment removed
pub fn strip_image_suffix(description: &str) -> &str {
    match description.rfind(IMAGE_SEGMENT_MARKER) {
        Some(pos) => description[..pos].trim_end(),
        None => description,
    }
}

/// Turn an `ipfs://<cid>` reference into a gateway URL; other URLs pass through
pub fn resolve_media_url(url: &str, gateway: &str) -> String {
    match url.strip_prefix(IPFS_SCHEME) {
        Some(path) => format!(
            "https://{}/ipfs/{}",
            gateway.trim_end_matches('/'),
            path.trim_start_matches("ipfs/")
        ),
        None => url.to_string(),
    }
}

/// Narrow a wide integer that is semantically a small count.
/// Saturates at `u32::MAX`.
pub fn narrow_count(value: U256) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Convert a Solidity timestamp to u64, capping at u64::MAX
pub fn timestamp_to_u64(timestamp: U256) -> u64 {
    u64::try_from(timestamp).unwrap_or(u64::MAX)
}

/// Convert a Solidity string to Option<String> (empty string becomes None)
pub fn optional_string(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}
