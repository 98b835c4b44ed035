//! PKCE (RFC 7636) and authorization request helpers

use crate::error::{Result, SocialError};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use sha2::{Digest, Sha256};

const MIN_VERIFIER_LEN: usize = 43;
const MAX_VERIFIER_LEN: usize = 128;

/// Code verifier and its S256 challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PkcePair {
    pub verifier: String,
    pub challenge: String,
}

impl PkcePair {
    /// Fresh pair from 32 random bytes (a 43 character verifier)
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        let verifier = URL_SAFE_NO_PAD.encode(bytes);
        let challenge = s256_challenge(&verifier);
        Self {
            verifier,
            challenge,
        }
    }

    /// Rebuild a pair from a stored verifier
    pub fn from_verifier(verifier: &str) -> Result<Self> {
        if verifier.len() < MIN_VERIFIER_LEN || verifier.len() > MAX_VERIFIER_LEN {
            return Err(SocialError::InvalidVerifier(format!(
                "length {} outside {}..={}",
                verifier.len(),
                MIN_VERIFIER_LEN,
                MAX_VERIFIER_LEN
            )));
        }

        let unreserved = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~');
        if !verifier.chars().all(unreserved) {
            return Err(SocialError::InvalidVerifier(
                "contains characters outside the unreserved set".to_string(),
            ));
        }

        Ok(Self {
            verifier: verifier.to_string(),
            challenge: s256_challenge(verifier),
        })
    }

    pub fn method(&self) -> &'static str {
        "S256"
    }
}

fn s256_challenge(verifier: &str) -> String {
    URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()))
}

/// Random anti-forgery `state` value
pub fn generate_state() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Authorization endpoint request opened in the popup
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub authorize_url: String,
    pub client_id: String,
    pub redirect_uri: String,
    pub scope: String,
    pub state: String,
    pub pkce: PkcePair,
}

impl AuthorizationRequest {
    pub fn new(
        authorize_url: impl Into<String>,
        client_id: impl Into<String>,
        redirect_uri: impl Into<String>,
        scope: impl Into<String>,
    ) -> Self {
        Self {
            authorize_url: authorize_url.into(),
            client_id: client_id.into(),
            redirect_uri: redirect_uri.into(),
            scope: scope.into(),
            state: generate_state(),
            pkce: PkcePair::generate(),
        }
    }

    /// Full URL with the OAuth 2.0 + PKCE query parameters
    pub fn url(&self) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.authorize_url,
            &[
                ("response_type", "code"),
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("scope", self.scope.as_str()),
                ("state", self.state.as_str()),
                ("code_challenge", self.pkce.challenge.as_str()),
                ("code_challenge_method", self.pkce.method()),
            ],
        )
        .map_err(|e| SocialError::InvalidUrl(format!("{}: {}", self.authorize_url, e)))?;

        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate() {
        let pair = PkcePair::generate();
        assert_eq!(pair.verifier.len(), 43);
        assert!(!pair.verifier.contains('='));
        assert_eq!(PkcePair::from_verifier(&pair.verifier).unwrap(), pair);
        assert_ne!(PkcePair::generate().verifier, pair.verifier);
    }

    #[test]
    fn test_rfc7636_example() {
        let pair = PkcePair::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk").unwrap();
        assert_eq!(pair.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_invalid_verifier() {
        assert!(PkcePair::from_verifier("short").is_err());
        assert!(PkcePair::from_verifier(&"a".repeat(129)).is_err());
        assert!(PkcePair::from_verifier(&format!("{}!", "a".repeat(50))).is_err());
    }

    #[test]
    fn test_authorization_url() {
        let request = AuthorizationRequest::new(
            "https://twitter.com/i/oauth2/authorize",
            "client-1",
            "https://quintle.app/oauth/callback",
            "users.read tweet.read",
        );
        let url = request.url().unwrap();

        assert!(url.starts_with("https://twitter.com/i/oauth2/authorize?response_type=code"));
        assert!(url.contains("code_challenge_method=S256"));
        assert!(url.contains(&format!("state={}", request.state)));
        assert!(url.contains("scope=users.read+tweet.read"));
        assert_eq!(request.state.len(), 32);

        let mut broken = request.clone();
        broken.authorize_url = "not a url".to_string();
        assert!(matches!(broken.url(), Err(SocialError::InvalidUrl(_))));
    }
}
