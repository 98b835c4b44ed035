//! Upload-then-write sequencing for entity creation and submissions
//!
//! Media goes to content-addressed storage first; the chain write only runs
//! once a CID exists, and the CID is embedded in the description the write
//! carries. The two failure channels stay distinct.

use ipfs::{ipfs_uri, IpfsError};
use quintle_types::reconcile::{strip_image_suffix, IMAGE_SEGMENT_MARKER};
use quintle_types::SourceError;
use std::future::Future;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum PublishError {
    /// The upload failed; no chain write was attempted
    #[error("Upload failed: {0}")]
    Upload(#[source] IpfsError),

    /// The upload succeeded but the chain write failed
    #[error("Chain write failed after uploading {cid}: {source}")]
    Chain {
        cid: String,
        #[source]
        source: SourceError,
    },
}

impl PublishError {
    /// CID of the uploaded content, when the upload got that far
    pub fn uploaded_cid(&self) -> Option<&str> {
        match self {
            Self::Upload(_) => None,
            Self::Chain { cid, .. } => Some(cid),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published<T> {
    pub cid: String,
    pub output: T,
}

/// Run `upload`, then `write` with the resulting CID.
/// `write` is never invoked when the upload fails.
pub async fn publish_then_write<U, F, W, T>(upload: U, write: F) -> Result<Published<T>, PublishError>
where
    U: Future<Output = Result<String, IpfsError>>,
    F: FnOnce(String) -> W,
    W: Future<Output = Result<T, SourceError>>,
{
    let cid = match upload.await {
        Ok(cid) => cid,
        Err(e) => {
            warn!("Upload failed, skipping chain write: {}", e);
            return Err(PublishError::Upload(e));
        }
    };
    info!("Uploaded {}, submitting chain write", cid);

    match write(cid.clone()).await {
        Ok(output) => Ok(Published { cid, output }),
        Err(source) => {
            warn!("Chain write failed after upload of {}: {}", cid, source);
            Err(PublishError::Chain { cid, source })
        }
    }
}

/// Description carried on-chain: the text plus a trailing `Image:` segment
/// pointing at the uploaded CID. An existing segment is replaced.
pub fn compose_description(text: &str, image_cid: Option<&str>) -> String {
    let text = strip_image_suffix(text).trim_end();
    match image_cid.filter(|cid| !cid.is_empty()) {
        Some(cid) => format!("{}{} {}", text, IMAGE_SEGMENT_MARKER, ipfs_uri(cid)),
        None => text.to_string(),
    }
}
