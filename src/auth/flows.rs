//! # OAuth2 Flows
//!
//! Client credentials, device code and refresh token grants against
//! `{authority}/{tenant}/oauth2/v2.0/*`.

use super::responses::{DeviceCodeResponse, OAuthError, TokenResponse};
use super::AuthError;
use crate::config::{ClientSecret, ReporterConfig};
use crate::constants::INTERACTIVE_CLIENT_ID;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Scopes for interactive logins; `offline_access` yields a refresh token
fn interactive_scope(config: &ReporterConfig) -> String {
    format!("{} offline_access", config.graph_scope())
}

/// Acquire an application token with a client secret
///
/// # Errors
/// Returns [`AuthError`] when the request fails or is rejected.
pub async fn client_credentials(
    http: &Client,
    config: &ReporterConfig,
    tenant_id: &str,
    client_id: &str,
    client_secret: &ClientSecret,
) -> Result<TokenResponse, AuthError> {
    let scope = config.graph_scope();
    let params = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret.expose()),
        ("scope", scope.as_str()),
    ];

    debug!(tenant_id, client_id, "requesting client credentials token");
    token_request(http, &config.token_url(tenant_id), &params).await
}

/// Redeem a refresh token for a new access token
///
/// # Errors
/// Returns [`AuthError`] when the refresh token is rejected.
pub async fn refresh(
    http: &Client,
    config: &ReporterConfig,
    tenant_id: &str,
    refresh_token: &str,
) -> Result<TokenResponse, AuthError> {
    let scope = interactive_scope(config);
    let params = [
        ("grant_type", "refresh_token"),
        ("client_id", INTERACTIVE_CLIENT_ID),
        ("refresh_token", refresh_token),
        ("scope", scope.as_str()),
    ];

    debug!(tenant_id, "refreshing interactive token");
    token_request(http, &config.token_url(tenant_id), &params).await
}

/// Start a device code login
///
/// # Errors
/// Returns [`AuthError`] if the authority refuses the request.
pub async fn request_device_code(
    http: &Client,
    config: &ReporterConfig,
    tenant_id: &str,
) -> Result<DeviceCodeResponse, AuthError> {
    let scope = interactive_scope(config);
    let response = http
        .post(config.device_code_url(tenant_id))
        .form(&[("client_id", INTERACTIVE_CLIENT_ID), ("scope", scope.as_str())])
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(AuthError::Rejected { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::InvalidResponse(format!("device code response: {e}")))
}

/// Outcome of one device code poll
#[derive(Debug)]
pub enum PollOutcome {
    Pending,
    SlowDown,
    Token(TokenResponse),
}

/// Poll once for the token of a pending device code login
///
/// # Errors
/// Returns [`AuthError::Declined`], [`AuthError::DeviceCodeExpired`] or
/// [`AuthError::Rejected`] for terminal outcomes.
pub async fn poll_device_token(
    http: &Client,
    config: &ReporterConfig,
    tenant_id: &str,
    device_code: &str,
) -> Result<PollOutcome, AuthError> {
    let response = http
        .post(config.token_url(tenant_id))
        .form(&[
            ("grant_type", "urn:ietf:params:oauth:grant-type:device_code"),
            ("client_id", INTERACTIVE_CLIENT_ID),
            ("device_code", device_code),
        ])
        .send()
        .await?;

    let status = response.status();
    if status.is_success() {
        let token = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(format!("token response: {e}")))?;
        return Ok(PollOutcome::Token(token));
    }

    let body = response.text().await.unwrap_or_default();
    let error: OAuthError = serde_json::from_str(&body).map_err(|e| {
        AuthError::InvalidResponse(format!("error response ({status}): {e}"))
    })?;

    if error.is_authorization_pending() {
        Ok(PollOutcome::Pending)
    } else if error.is_slow_down() {
        Ok(PollOutcome::SlowDown)
    } else if error.is_declined() {
        Err(AuthError::Declined)
    } else if error.is_expired_token() {
        Err(AuthError::DeviceCodeExpired)
    } else {
        Err(AuthError::Rejected {
            status: status.as_u16(),
            body: error.describe().to_string(),
        })
    }
}

/// Run a full device code login, printing instructions to stderr
///
/// # Errors
/// Returns [`AuthError`] if the login is declined, expires, or fails.
pub async fn device_code_login(
    http: &Client,
    config: &ReporterConfig,
    tenant_id: &str,
    username: &str,
) -> Result<TokenResponse, AuthError> {
    let device = request_device_code(http, config, tenant_id).await?;

    // stdout is reserved for the report
    eprintln!("Sign in as {username}:");
    match &device.message {
        Some(message) => eprintln!("{message}"),
        None => eprintln!(
            "Open {} and enter the code {}",
            device.verification_uri, device.user_code
        ),
    }

    let deadline = Instant::now() + Duration::from_secs(device.expires_in);
    let mut interval = Duration::from_secs(device.interval.max(1));

    loop {
        tokio::time::sleep(interval).await;
        if Instant::now() >= deadline {
            return Err(AuthError::DeviceCodeExpired);
        }
        match poll_device_token(http, config, tenant_id, &device.device_code).await? {
            PollOutcome::Token(token) => {
                info!(tenant_id, "device code login completed");
                return Ok(token);
            }
            PollOutcome::SlowDown => interval += Duration::from_secs(5),
            PollOutcome::Pending => {}
        }
    }
}

async fn token_request(
    http: &Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<TokenResponse, AuthError> {
    let response = http.post(url).form(params).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<OAuthError>(&body)
            .map(|e| e.describe().to_string())
            .unwrap_or(body);
        return Err(AuthError::Rejected { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| AuthError::InvalidResponse(format!("token response: {e}")))
}
