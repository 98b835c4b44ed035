//! Content-addressed storage client
//!
//! Uploads go through a pinning HTTP API (`pinFileToIPFS` / `pinJSONToIPFS`),
//! reads go through a public gateway. Gateway reads are optional: a timeout,
//! an unreachable gateway or a non-success status reads as `Ok(None)`.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info, warn};

pub type Result<T> = std::result::Result<T, IpfsError>;

#[derive(Debug, Error)]
pub enum IpfsError {
    #[error("No pinning API token configured")]
    MissingCredentials,

    #[error("CID is not set")]
    EmptyCid,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Pinning API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid pinning API response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct IpfsConfig {
    /// Base URL of the pinning API
    pub api_url: String,
    /// Gateway host used to build read URLs, without scheme
    pub gateway: String,
    /// Bearer token for the pinning API; uploads fail without it
    pub jwt: Option<String>,
    /// Timeout applied to gateway reads
    pub timeout: Duration,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.pinata.cloud".to_string(),
            gateway: "gateway.pinata.cloud".to_string(),
            jwt: None,
            timeout: Duration::from_secs(8),
        }
    }
}

impl IpfsConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err("api_url must start with http:// or https://".to_string());
        }
        if self.gateway.is_empty() || self.gateway.contains("://") {
            return Err("gateway must be a bare host name".to_string());
        }
        if self.timeout.is_zero() {
            return Err("timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PinResponse {
    #[serde(rename = "IpfsHash")]
    ipfs_hash: String,
}

/// CIDs produced by `upload_with_metadata`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedMedia {
    pub file_cid: String,
    pub metadata_cid: String,
}

#[derive(Debug, Clone)]
pub struct UploadWithMetadataParams {
    pub data: Vec<u8>,
    pub file_name: String,
    /// Sidecar document; an `image` field pointing at the file is added
    pub metadata: Value,
}

/// `ipfs://` reference to a CID
pub fn ipfs_uri(cid: &str) -> String {
    format!("ipfs://{}", cid)
}

/// Build the JSON sidecar that references an uploaded file
pub fn metadata_sidecar(metadata: Value, file_cid: &str) -> Value {
    match metadata {
        Value::Object(mut fields) => {
            fields.insert("image".to_string(), Value::String(ipfs_uri(file_cid)));
            Value::Object(fields)
        }
        Value::Null => json!({ "image": ipfs_uri(file_cid) }),
        other => json!({ "image": ipfs_uri(file_cid), "data": other }),
    }
}

pub struct IpfsClient {
    config: IpfsConfig,
    client: reqwest::Client,
}

impl IpfsClient {
    pub fn new(config: IpfsConfig) -> Result<Self> {
        config.validate().map_err(IpfsError::Configuration)?;
        Ok(Self {
            config,
            client: reqwest::Client::new(),
        })
    }

    pub fn config(&self) -> &IpfsConfig {
        &self.config
    }

    fn jwt(&self) -> Result<&str> {
        self.config
            .jwt
            .as_deref()
            .filter(|jwt| !jwt.is_empty())
            .ok_or(IpfsError::MissingCredentials)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.api_url.trim_end_matches('/'), path)
    }

    async fn pin_response(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(
                "Pinning failed: {} {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            );
            return Err(IpfsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let pinned: PinResponse = response
            .json()
            .await
            .map_err(|e| IpfsError::InvalidResponse(e.to_string()))?;

        if pinned.ipfs_hash.is_empty() {
            return Err(IpfsError::InvalidResponse("empty IpfsHash".to_string()));
        }
        Ok(pinned.ipfs_hash)
    }

    /// Pin a file and return its CID
    pub async fn upload_file(&self, data: Vec<u8>, file_name: &str) -> Result<String> {
        let jwt = self.jwt()?;

        info!("Uploading {} ({} bytes) to IPFS", file_name, data.len());
        let start = Instant::now();

        let part = reqwest::multipart::Part::bytes(data).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/pinning/pinFileToIPFS"))
            .bearer_auth(jwt)
            .multipart(form)
            .send()
            .await?;

        let cid = Self::pin_response(response).await?;
        info!("Pinned {} as {} in {:?}", file_name, cid, start.elapsed());
        Ok(cid)
    }

    /// Pin a JSON document and return its CID
    pub async fn upload_json(&self, value: &Value) -> Result<String> {
        let jwt = self.jwt()?;

        info!("Uploading JSON document to IPFS");
        let start = Instant::now();

        let response = self
            .client
            .post(self.endpoint("/pinning/pinJSONToIPFS"))
            .bearer_auth(jwt)
            .json(&json!({ "pinataContent": value }))
            .send()
            .await?;

        let cid = Self::pin_response(response).await?;
        info!("Pinned JSON as {} in {:?}", cid, start.elapsed());
        Ok(cid)
    }

    /// Upload a file, then a sidecar document referencing it
    pub async fn upload_with_metadata(
        &self,
        params: UploadWithMetadataParams,
    ) -> Result<UploadedMedia> {
        let file_cid = self.upload_file(params.data, &params.file_name).await?;
        let sidecar = metadata_sidecar(params.metadata, &file_cid);
        let metadata_cid = self.upload_json(&sidecar).await?;

        Ok(UploadedMedia {
            file_cid,
            metadata_cid,
        })
    }

    pub fn gateway_url(&self, cid: &str) -> Result<String> {
        let cid = cid.trim_start_matches("ipfs://");
        if cid.is_empty() {
            return Err(IpfsError::EmptyCid);
        }
        Ok(format!(
            "https://{}/ipfs/{}",
            self.config.gateway.trim_end_matches('/'),
            cid
        ))
    }

    /// Read a CID from the gateway. `Ok(None)` when the content is unavailable.
    pub async fn fetch(&self, cid: &str) -> Result<Option<Vec<u8>>> {
        let url = self.gateway_url(cid)?;

        info!("Reading IPFS content: {}", cid);
        let start = Instant::now();

        let response = match self
            .client
            .get(&url)
            .timeout(self.config.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() || e.is_connect() => {
                warn!("IPFS gateway unavailable for {}: {}", cid, e);
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        if !response.status().is_success() {
            warn!(
                "IPFS read failed: {} {}",
                response.status(),
                response.status().canonical_reason().unwrap_or("Unknown error")
            );
            return Ok(None);
        }

        match response.bytes().await {
            Ok(bytes) => {
                info!("Read {} bytes in {:?}", bytes.len(), start.elapsed());
                Ok(Some(bytes.to_vec()))
            }
            Err(e) if e.is_timeout() => {
                warn!("IPFS read of {} timed out", cid);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read a JSON document from the gateway
    pub async fn fetch_json(&self, cid: &str) -> Result<Option<Value>> {
        match self.fetch(cid).await? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| IpfsError::InvalidResponse(e.to_string())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> IpfsClient {
        IpfsClient::new(IpfsConfig::default()).unwrap()
    }

    #[test]
    fn test_gateway_url() {
        let client = client();
        assert_eq!(
            client.gateway_url("bafy123").unwrap(),
            "https://gateway.pinata.cloud/ipfs/bafy123"
        );
        assert_eq!(
            client.gateway_url("ipfs://bafy123").unwrap(),
            "https://gateway.pinata.cloud/ipfs/bafy123"
        );
        assert!(matches!(client.gateway_url(""), Err(IpfsError::EmptyCid)));
    }

    #[test]
    fn test_config_validation() {
        assert!(IpfsConfig::default().validate().is_ok());

        let config = IpfsConfig {
            gateway: "https://gateway.pinata.cloud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = IpfsConfig {
            timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(IpfsClient::new(config).is_err());
    }

    #[test]
    fn test_metadata_sidecar() {
        let sidecar = metadata_sidecar(json!({ "name": "cover" }), "bafyfile");
        assert_eq!(sidecar["name"], "cover");
        assert_eq!(sidecar["image"], "ipfs://bafyfile");

        let sidecar = metadata_sidecar(Value::Null, "bafyfile");
        assert_eq!(sidecar, json!({ "image": "ipfs://bafyfile" }));

        let sidecar = metadata_sidecar(json!("caption"), "bafyfile");
        assert_eq!(sidecar["data"], "caption");
    }

    #[tokio::test]
    async fn test_upload_requires_token() {
        let result = client().upload_file(b"png".to_vec(), "cover.png").await;
        assert!(matches!(result, Err(IpfsError::MissingCredentials)));

        let result = client().upload_json(&json!({})).await;
        assert!(matches!(result, Err(IpfsError::MissingCredentials)));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_gateway_is_none() {
        let client = IpfsClient::new(IpfsConfig {
            gateway: "127.0.0.1:9".to_string(),
            timeout: Duration::from_secs(1),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(client.fetch("bafy123").await.unwrap(), None);
    }
}
