//! # OAuth2 Payloads
//!
//! Token endpoint and device authorization responses of the Microsoft
//! identity platform (v2.0 endpoints).

use serde::Deserialize;

/// Successful token response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    /// Only issued to public clients (device code / refresh grants)
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Device authorization response
#[derive(Debug, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_uri: String,
    /// Seconds until `device_code` expires
    pub expires_in: u64,
    /// Minimum polling interval in seconds
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Ready-made instructions for the user
    #[serde(default)]
    pub message: Option<String>,
}

fn default_interval() -> u64 {
    5
}

/// OAuth2 error response
#[derive(Debug, Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl OAuthError {
    pub fn is_authorization_pending(&self) -> bool {
        self.error == "authorization_pending"
    }

    pub fn is_slow_down(&self) -> bool {
        self.error == "slow_down"
    }

    pub fn is_declined(&self) -> bool {
        self.error == "authorization_declined" || self.error == "access_denied"
    }

    pub fn is_expired_token(&self) -> bool {
        self.error == "expired_token" || self.error == "code_expired"
    }

    /// Description if present, otherwise the error code
    pub fn describe(&self) -> &str {
        self.error_description.as_deref().unwrap_or(&self.error)
    }
}
