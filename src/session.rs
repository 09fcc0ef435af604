//! Google credential storage.
//!
//! The Google services are reached with the authorized-user `token.json`
//! produced by the consent flow. This module reads that file and hands out
//! access tokens, trading the refresh token for a new one whenever the stored
//! token has expired and writing the result back.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{ApiClient, TokenResponse};
use crate::domain::AccessTokenSource;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Authorized-user credentials as stored in `token.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleCredentials {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,
    /// Fields this crate does not use, kept so a rewrite does not drop them.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl GoogleCredentials {
    fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }

    /// Whether the access token is known to outlive the next request.
    ///
    /// An unknown or unparsable expiry counts as stale.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let Some(expiry) = self.expiry.as_deref() else {
            return false;
        };
        match DateTime::parse_from_rfc3339(expiry) {
            Ok(expiry) => expiry.with_timezone(&Utc) - Duration::seconds(EXPIRY_SKEW_SECS) > now,
            Err(e) => {
                debug!("Unparsable token expiry {:?}: {}", expiry, e);
                false
            }
        }
    }
}

/// Reads and writes the Google token file.
pub struct GoogleSessionStore {
    token_path: PathBuf,
}

impl GoogleSessionStore {
    pub fn new(credentials_dir: &Path, token_file: &str) -> Self {
        Self {
            token_path: credentials_dir.join(token_file),
        }
    }

    pub fn token_path(&self) -> &Path {
        &self.token_path
    }

    /// `None` when the file is missing or unusable.
    pub fn load(&self) -> Result<Option<GoogleCredentials>> {
        if !self.token_path.exists() {
            debug!("No Google token file at {:?}", self.token_path);
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.token_path)
            .with_context(|| format!("Failed to read token file: {:?}", self.token_path))?;

        match serde_json::from_str::<GoogleCredentials>(&content) {
            Ok(creds) if creds.token.is_some() || creds.can_refresh() => Ok(Some(creds)),
            Ok(_) => {
                warn!(
                    "Token file {:?} has neither an access token nor a refresh token",
                    self.token_path
                );
                Ok(None)
            }
            Err(e) => {
                warn!("Failed to parse token file {:?}: {}", self.token_path, e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, creds: &GoogleCredentials) -> Result<()> {
        let content =
            serde_json::to_string_pretty(creds).context("Failed to serialize credentials")?;
        std::fs::write(&self.token_path, content)
            .with_context(|| format!("Failed to write token file: {:?}", self.token_path))?;
        debug!("Credentials saved to {:?}", self.token_path);
        Ok(())
    }
}

/// Exchanges a refresh token for a new access token.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(
        &self,
        token_uri: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse>;
}

#[async_trait]
impl TokenRefresher for ApiClient {
    async fn refresh(
        &self,
        token_uri: &str,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<TokenResponse> {
        self.refresh_access_token(token_uri, client_id, client_secret, refresh_token)
            .await
    }
}

/// Tokens this close to their expiry are refreshed before use.
const EXPIRY_SKEW_SECS: i64 = 60;

/// Hands out Google access tokens, refreshing them once they expire.
///
/// Shared by the Drive and Docs clients. The credentials sit behind a
/// mutex so that concurrent tool calls trigger at most one refresh.
pub struct GoogleTokenProvider {
    refresher: Arc<dyn TokenRefresher>,
    store: GoogleSessionStore,
    credentials: Mutex<GoogleCredentials>,
}

impl GoogleTokenProvider {
    pub fn new(
        refresher: Arc<dyn TokenRefresher>,
        store: GoogleSessionStore,
        credentials: GoogleCredentials,
    ) -> Self {
        Self {
            refresher,
            store,
            credentials: Mutex::new(credentials),
        }
    }
}

#[async_trait]
impl AccessTokenSource for GoogleTokenProvider {
    /// The stored token while it is valid, otherwise one refresh attempt.
    ///
    /// A failed refresh falls back to the stored token when there is one.
    async fn access_token(&self) -> Result<String> {
        let mut creds = self.credentials.lock().await;
        if let Some(token) = creds.token.as_ref().filter(|_| creds.is_fresh(Utc::now())) {
            return Ok(token.clone());
        }

        let (Some(refresh), Some(client_id), Some(client_secret)) = (
            creds.refresh_token.clone(),
            creds.client_id.clone(),
            creds.client_secret.clone(),
        ) else {
            return creds
                .token
                .clone()
                .context("Google credentials have no access token and cannot be refreshed");
        };

        let refreshed = self
            .refresher
            .refresh(&creds.token_uri, &client_id, &client_secret, &refresh)
            .await;
        match refreshed {
            Ok(response) => {
                creds.token = Some(response.access_token.clone());
                creds.expiry = response
                    .expires_in
                    .map(|secs| (Utc::now() + Duration::seconds(secs)).to_rfc3339());
                if let Err(e) = self.store.save(&creds) {
                    warn!("Could not persist refreshed Google token: {:#}", e);
                }
                info!("🔑 Refreshed Google access token");
                Ok(response.access_token)
            }
            Err(e) => match creds.token.clone() {
                Some(token) => {
                    warn!("Google token refresh failed, using stored token: {:#}", e);
                    Ok(token)
                }
                None => Err(e.context("Failed to refresh Google access token")),
            },
        }
    }
}
