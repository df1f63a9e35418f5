//! # Token Cache
//!
//! Persists the last access token (and refresh token, for interactive
//! logins) in `accessTokens.json` so consecutive runs skip the login.

use super::responses::TokenResponse;
use crate::config::paths::write_private;
use crate::config::ConfigPaths;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedToken {
    /// Login the token belongs to (`tenant/client` or `tenant/username`)
    pub identity: String,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl std::fmt::Debug for CachedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedToken")
            .field("identity", &self.identity)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

impl CachedToken {
    /// Build from a token response received at `now`
    ///
    /// A response without a refresh token keeps `previous_refresh`.
    pub fn from_response(
        identity: &str,
        response: TokenResponse,
        previous_refresh: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            identity: identity.to_string(),
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh),
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Usable for at least `grace` more
    pub fn is_fresh(&self, now: DateTime<Utc>, grace: Duration) -> bool {
        now + grace < self.expires_at
    }
}

#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(paths: &ConfigPaths) -> Self {
        Self {
            path: paths.token_cache_file(),
        }
    }

    /// Load the cached token; unreadable or corrupt caches count as empty
    pub fn load(&self) -> Option<CachedToken> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(path = %self.path.display(), "ignoring corrupt token cache: {e}");
                None
            }
        }
    }

    /// # Errors
    /// Returns an error if the cache file cannot be written.
    pub fn save(&self, token: &CachedToken) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            ConfigPaths::new(dir).ensure_dir()?;
        }
        let json = serde_json::to_vec_pretty(token).context("Failed to serialize token cache")?;
        write_private(&self.path, &json)
    }

    /// Delete the cache file; returns whether one existed
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be removed.
    pub fn remove(&self) -> Result<bool> {
        ConfigPaths::remove_file(&self.path)
    }
}
