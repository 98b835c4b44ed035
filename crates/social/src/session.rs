//! Persisted social sessions
//!
//! The store is the single owner of linked accounts for the process. It is
//! hydrated explicitly from a JSON file; `connect` and `disconnect` update
//! memory first, then the file, then an optional remote mirror. Remote sync is
//! best effort: its failures are logged and never fail the local operation.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// A linked social account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialSession {
    pub provider: String,
    pub username: String,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Wallet address the account is linked to
    #[serde(default)]
    pub account: Option<String>,
    /// Unix seconds
    pub connected_at: u64,
}

impl SocialSession {
    pub fn new(provider: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            username: username.into(),
            user_id: None,
            account: None,
            connected_at: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
        }
    }
}

/// Secondary writer mirroring sessions to a remote profile service
#[async_trait]
pub trait RemoteSync: Send + Sync {
    async fn upsert(&self, session: &SocialSession) -> anyhow::Result<()>;

    async fn remove(&self, provider: &str) -> anyhow::Result<()>;
}

pub struct SessionStore {
    path: PathBuf,
    sessions: RwLock<BTreeMap<String, SocialSession>>,
    remote: Option<Arc<dyn RemoteSync>>,
}

impl SessionStore {
    /// Empty store backed by `path`; call `hydrate` to load persisted sessions
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sessions: RwLock::new(BTreeMap::new()),
            remote: None,
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn RemoteSync>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load persisted sessions, replacing the in-memory state.
    /// A missing file is an empty store.
    pub async fn hydrate(&self) -> Result<usize> {
        let loaded: BTreeMap<String, SocialSession> = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        let count = loaded.len();
        *self.sessions.write().await = loaded;
        debug!("Hydrated {} social sessions from {}", count, self.path.display());
        Ok(count)
    }

    pub async fn get(&self, provider: &str) -> Option<SocialSession> {
        self.sessions.read().await.get(provider).cloned()
    }

    pub async fn sessions(&self) -> Vec<SocialSession> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn connect(&self, session: SocialSession) -> Result<()> {
        let snapshot = {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session.provider.clone(), session.clone());
            sessions.clone()
        };
        self.persist(&snapshot).await?;
        info!("Linked {} account {}", session.provider, session.username);

        if let Some(remote) = &self.remote {
            if let Err(e) = remote.upsert(&session).await {
                warn!("Remote sync of {} session failed: {}", session.provider, e);
            }
        }
        Ok(())
    }

    /// Remove a linked account. Returns whether one was present.
    pub async fn disconnect(&self, provider: &str) -> Result<bool> {
        let (removed, snapshot) = {
            let mut sessions = self.sessions.write().await;
            let removed = sessions.remove(provider).is_some();
            (removed, sessions.clone())
        };
        self.persist(&snapshot).await?;

        if removed {
            info!("Unlinked {} account", provider);
            if let Some(remote) = &self.remote {
                if let Err(e) = remote.remove(provider).await {
                    warn!("Remote removal of {} session failed: {}", provider, e);
                }
            }
        }
        Ok(removed)
    }

    async fn persist(&self, sessions: &BTreeMap<String, SocialSession>) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(sessions)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
