//! # Authentication
//!
//! Access tokens for Microsoft Graph.
//!
//! - Automated logins use the client credentials grant
//! - Interactive logins use the device code grant, then refresh tokens
//! - Tokens are cached in `accessTokens.json` across runs

pub mod cache;
pub mod flows;
pub mod provider;
pub mod responses;

pub use cache::{CachedToken, TokenCache};
pub use provider::CachingTokenProvider;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the token endpoints
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("device code expired before the login was completed")]
    DeviceCodeExpired,

    #[error("login was declined")]
    Declined,

    #[error("unexpected response from the authority: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Source of bearer tokens for Graph requests
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, for tests and pre-issued tokens
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenProvider").finish_non_exhaustive()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("abc");
        assert_eq!(provider.access_token().await.unwrap(), "abc");
        assert!(!format!("{provider:?}").contains("abc"));
    }

    #[test]
    fn test_rejected_display() {
        let err = AuthError::Rejected {
            status: 401,
            body: "AADSTS7000215: Invalid client secret provided.".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "token request rejected (HTTP 401): AADSTS7000215: Invalid client secret provided."
        );
    }
}
