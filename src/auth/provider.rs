//! # Caching Token Provider
//!
//! Hands out Graph access tokens for the configured login, reusing the
//! in-process token, then the on-disk cache, before running a login flow.

use super::cache::{CachedToken, TokenCache};
use super::flows;
use super::{AuthError, TokenProvider};
use crate::config::{LoginConfig, ReporterConfig};
use crate::constants::TOKEN_EXPIRY_GRACE_SECS;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub struct CachingTokenProvider {
    config: ReporterConfig,
    login: LoginConfig,
    cache: TokenCache,
    http: Client,
    current: Mutex<Option<CachedToken>>,
}

impl std::fmt::Debug for CachingTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachingTokenProvider")
            .field("tenant_id", &self.login.tenant_id())
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl CachingTokenProvider {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: ReporterConfig, login: LoginConfig) -> Result<Self, AuthError> {
        let http = Client::builder().timeout(config.http_timeout()).build()?;
        let cache = TokenCache::new(&config.paths());
        Ok(Self {
            config,
            login,
            cache,
            http,
            current: Mutex::new(None),
        })
    }

    /// Key tying a cached token to the login that produced it
    fn identity(&self) -> String {
        match &self.login {
            LoginConfig::Interactive {
                tenant_id,
                username,
            } => format!("{tenant_id}/{username}"),
            LoginConfig::Automated {
                tenant_id,
                client_id,
                ..
            } => format!("{tenant_id}/{client_id}"),
        }
    }

    async fn acquire(&self, previous: Option<CachedToken>) -> Result<CachedToken, AuthError> {
        let identity = self.identity();
        let previous_refresh = previous
            .filter(|t| t.identity == identity)
            .and_then(|t| t.refresh_token);

        let response = match &self.login {
            LoginConfig::Automated {
                tenant_id,
                client_id,
                client_secret,
            } => {
                flows::client_credentials(
                    &self.http,
                    &self.config,
                    tenant_id,
                    client_id,
                    client_secret,
                )
                .await?
            }
            LoginConfig::Interactive {
                tenant_id,
                username,
            } => {
                let refreshed = match &previous_refresh {
                    Some(refresh_token) => {
                        match flows::refresh(&self.http, &self.config, tenant_id, refresh_token)
                            .await
                        {
                            Ok(response) => Some(response),
                            Err(e) => {
                                warn!("refresh token rejected, starting a new login: {e}");
                                None
                            }
                        }
                    }
                    None => None,
                };
                match refreshed {
                    Some(response) => response,
                    None => {
                        flows::device_code_login(&self.http, &self.config, tenant_id, username)
                            .await?
                    }
                }
            }
        };

        Ok(CachedToken::from_response(
            &identity,
            response,
            previous_refresh,
            Utc::now(),
        ))
    }
}

#[async_trait]
impl TokenProvider for CachingTokenProvider {
    async fn access_token(&self) -> Result<String> {
        let grace = Duration::seconds(TOKEN_EXPIRY_GRACE_SECS);
        let mut current = self.current.lock().await;

        if let Some(token) = current.as_ref() {
            if token.is_fresh(Utc::now(), grace) {
                return Ok(token.access_token.clone());
            }
        }

        let cached = self.cache.load();
        if let Some(token) = cached.as_ref() {
            if token.identity == self.identity() && token.is_fresh(Utc::now(), grace) {
                debug!("using cached access token");
                *current = Some(token.clone());
                return Ok(token.access_token.clone());
            }
        }

        let token = self.acquire(current.take().or(cached)).await?;
        info!(expires_at = %token.expires_at, "acquired new access token");
        if let Err(e) = self.cache.save(&token) {
            warn!("failed to persist token cache: {e:#}");
        }

        let access_token = token.access_token.clone();
        *current = Some(token);
        Ok(access_token)
    }
}
