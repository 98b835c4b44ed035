//! Social account linking
//!
//! The OAuth flow runs in a popup that posts a message back to the opener.
//! This crate validates those messages, resolves the handshake to a single
//! outcome, exchanges authorization codes with PKCE, and keeps the linked
//! accounts in a file-backed session store.

pub mod error;
pub mod oauth;
pub mod pkce;
pub mod session;

pub use error::{Result, SocialError};
pub use oauth::{
    accept_message, await_oauth, exchange_code, ConnectOutcome, OAuthFailure, OAuthMessage,
    OAuthProfile, TokenRequest, TokenResponse,
};
pub use pkce::{generate_state, AuthorizationRequest, PkcePair};
pub use session::{RemoteSync, SessionStore, SocialSession};
