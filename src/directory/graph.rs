//! # Microsoft Graph Directory Client
//!
//! Lists applications and service principals through the Graph REST API.
//! Uses reqwest with rustls and follows `@odata.nextLink` until the
//! collection is exhausted.
//!
//! Throttling (429) and server errors (5xx) are retried here, honouring
//! `Retry-After`; callers do not retry.

use super::responses::{GraphDirectoryEntry, GraphErrorResponse, ODataPage};
use super::DirectoryClient;
use crate::auth::TokenProvider;
use crate::config::ReporterConfig;
use crate::constants::{GRAPH_API_VERSION, GRAPH_PAGE_SIZE};
use crate::report::types::{DirectoryObject, ObjectKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SELECT_FIELDS: &str = "displayName,appId,passwordCredentials";

/// Graph client for directory reads
pub struct GraphDirectoryClient {
    http_client: Client,
    base_url: String,
    token_provider: Arc<dyn TokenProvider>,
    max_retries: u32,
    backoff_start: Duration,
}

impl std::fmt::Debug for GraphDirectoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphDirectoryClient")
            .field("base_url", &self.base_url)
            .field("max_retries", &self.max_retries)
            .finish_non_exhaustive()
    }
}

impl GraphDirectoryClient {
    /// Create a client for the configured Graph endpoint
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &ReporterConfig, token_provider: Arc<dyn TokenProvider>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: format!(
                "{}/{}",
                config.graph_endpoint.trim_end_matches('/'),
                GRAPH_API_VERSION
            ),
            token_provider,
            max_retries: config.max_retries,
            backoff_start: config.backoff_start(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First page URL of a collection, e.g. `applications`
    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/{collection}?$select={SELECT_FIELDS}&$top={GRAPH_PAGE_SIZE}",
            self.base_url
        )
    }

    async fn list(&self, collection: &str, kind: ObjectKind) -> Result<Vec<DirectoryObject>> {
        let mut objects = Vec::new();
        let mut next = Some(self.collection_url(collection));
        let mut pages = 0usize;

        while let Some(url) = next {
            let page: ODataPage<GraphDirectoryEntry> = self
                .get_page(&url)
                .await
                .with_context(|| format!("Failed to list {collection} (page {})", pages + 1))?;
            pages += 1;
            objects.extend(
                page.value
                    .into_iter()
                    .map(|entry| entry.into_directory_object(kind)),
            );
            next = page.next_link;
        }

        debug!(collection, pages, count = objects.len(), "listed Graph collection");
        Ok(objects)
    }

    async fn get_page(&self, url: &str) -> Result<ODataPage<GraphDirectoryEntry>> {
        let mut attempt = 0u32;

        loop {
            let token = self
                .token_provider
                .access_token()
                .await
                .context("Failed to obtain Graph access token")?;

            debug!(url, attempt, "GET Graph page");
            let response = self
                .http_client
                .get(url)
                .bearer_auth(&token)
                .header("Accept", "application/json")
                .send()
                .await
                .context("Graph request failed")?;

            let status = response.status();
            if status.is_success() {
                return response
                    .json()
                    .await
                    .context("Failed to parse Graph response");
            }

            if is_retryable(status) && attempt < self.max_retries {
                let delay = retry_after(&response)
                    .unwrap_or_else(|| self.backoff_start.saturating_mul(2u32.saturating_pow(attempt)));
                warn!(
                    status = status.as_u16(),
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Graph request throttled or failed, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            let body = response.text().await.unwrap_or_default();
            return Err(handle_error_response(status, &body));
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

/// `Retry-After` in seconds; Graph does not send HTTP-date values
fn retry_after(response: &reqwest::Response) -> Option<Duration> {
    response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

fn handle_error_response(status: StatusCode, body: &str) -> anyhow::Error {
    match serde_json::from_str::<GraphErrorResponse>(body) {
        Ok(parsed) => anyhow::anyhow!(
            "Graph request failed with status {status}: {} ({})",
            parsed.error.message,
            parsed.error.code
        ),
        Err(_) => anyhow::anyhow!("Graph request failed with status {status}: {body}"),
    }
}

#[async_trait]
impl DirectoryClient for GraphDirectoryClient {
    async fn fetch_applications(&self) -> Result<Vec<DirectoryObject>> {
        self.list("applications", ObjectKind::App).await
    }

    async fn fetch_service_principals(&self) -> Result<Vec<DirectoryObject>> {
        self.list("servicePrincipals", ObjectKind::ServicePrincipal)
            .await
    }
}
