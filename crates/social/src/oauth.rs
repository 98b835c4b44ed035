//! OAuth popup handshake and authorization code exchange

use crate::error::{Result, SocialError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Profile reported by a successful popup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthProfile {
    pub username: String,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    /// Authorization code, when the popup hands the exchange to the opener
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthFailure {
    pub error: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl OAuthFailure {
    pub fn reason(&self) -> String {
        match &self.description {
            Some(description) => format!("{}: {}", self.error, description),
            None => self.error.clone(),
        }
    }
}

/// Message posted by the OAuth popup to its opener
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OAuthMessage {
    OauthSuccess { provider: String, data: OAuthProfile },
    OauthError { provider: String, data: OAuthFailure },
}

fn normalize_origin(origin: &str) -> String {
    origin.trim().trim_end_matches('/').to_ascii_lowercase()
}

/// Validate a posted message. Foreign origins and malformed payloads are dropped.
pub fn accept_message(origin: &str, expected_origin: &str, payload: &str) -> Option<OAuthMessage> {
    if normalize_origin(origin) != normalize_origin(expected_origin) {
        warn!("Ignoring OAuth message from foreign origin {}", origin);
        return None;
    }

    match serde_json::from_str::<OAuthMessage>(payload) {
        Ok(message) => Some(message),
        Err(e) => {
            warn!("Ignoring malformed OAuth message: {}", e);
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Connected {
        provider: String,
        profile: OAuthProfile,
    },
    Failed(String),
    TimedOut,
    /// The popup was closed, or the message channel went away, before any result
    Cancelled,
}

/// Wait for the popup to report back.
///
/// Resolves to exactly one outcome. A message that arrives together with the
/// popup closing still wins. A dropped `popup_closed` sender is not treated as
/// a close.
pub async fn await_oauth(
    mut messages: mpsc::Receiver<OAuthMessage>,
    mut popup_closed: oneshot::Receiver<()>,
    timeout: Duration,
) -> ConnectOutcome {
    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    let mut watching_popup = true;

    loop {
        tokio::select! {
            biased;

            message = messages.recv() => {
                return match message {
                    Some(OAuthMessage::OauthSuccess { provider, data }) => {
                        info!("OAuth connected {} as {}", provider, data.username);
                        ConnectOutcome::Connected { provider, profile: data }
                    }
                    Some(OAuthMessage::OauthError { provider, data }) => {
                        warn!("OAuth with {} failed: {}", provider, data.reason());
                        ConnectOutcome::Failed(data.reason())
                    }
                    None => {
                        debug!("OAuth message channel closed");
                        ConnectOutcome::Cancelled
                    }
                };
            }
            closed = &mut popup_closed, if watching_popup => {
                match closed {
                    Ok(()) => {
                        debug!("OAuth popup closed by the user");
                        return ConnectOutcome::Cancelled;
                    }
                    Err(_) => watching_popup = false,
                }
            }
            _ = &mut deadline => {
                warn!("OAuth handshake timed out after {:?}", timeout);
                return ConnectOutcome::TimedOut;
            }
        }
    }
}

/// Authorization code exchange parameters
#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub token_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub code: String,
    pub code_verifier: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

/// Exchange an authorization code for tokens, bounded by `timeout`
pub async fn exchange_code(
    client: &reqwest::Client,
    request: &TokenRequest,
    timeout: Duration,
) -> Result<TokenResponse> {
    debug!("Exchanging authorization code at {}", request.token_url);

    let exchange = async {
        let response = client
            .post(&request.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", request.client_id.as_str()),
                ("redirect_uri", request.redirect_uri.as_str()),
                ("code", request.code.as_str()),
                ("code_verifier", request.code_verifier.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SocialError::TokenEndpoint {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<TokenResponse>().await?)
    };

    tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| SocialError::Timeout(timeout))?
}
