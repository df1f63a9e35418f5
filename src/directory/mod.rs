//! # Directory Clients
//!
//! The boundary between the report and the identity directory. Provider JSON
//! is deserialized into typed [`DirectoryObject`]s here; nothing past this
//! module sees untyped maps.
//!
//! - `graph`: Microsoft Graph REST client (pagination, throttling retries)
//! - `responses`: Graph response payloads
//! - [`StaticDirectory`]: in-memory test double

pub mod graph;
pub mod responses;

pub use graph::GraphDirectoryClient;

use crate::report::types::DirectoryObject;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lists the directory objects a report is built from
///
/// Implementations own their retry policy; callers never retry.
#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// All application registrations with their password credentials
    async fn fetch_applications(&self) -> Result<Vec<DirectoryObject>>;

    /// All service principals with their password credentials
    async fn fetch_service_principals(&self) -> Result<Vec<DirectoryObject>>;
}

/// In-memory test double for [`DirectoryClient`]
///
/// Serves fixed object lists, can be told to fail either listing, and counts
/// fetch calls so tests can assert nothing was fetched. Also used by the
/// integration tests in `tests/`.
#[derive(Debug, Default)]
pub struct StaticDirectory {
    applications: Vec<DirectoryObject>,
    service_principals: Vec<DirectoryObject>,
    applications_error: Option<String>,
    service_principals_error: Option<String>,
    fetches: AtomicUsize,
}

impl StaticDirectory {
    #[must_use]
    pub fn new(
        applications: Vec<DirectoryObject>,
        service_principals: Vec<DirectoryObject>,
    ) -> Self {
        Self {
            applications,
            service_principals,
            ..Self::default()
        }
    }

    /// Make application listing fail with `message`
    #[must_use]
    pub fn failing_applications(mut self, message: impl Into<String>) -> Self {
        self.applications_error = Some(message.into());
        self
    }

    /// Make service principal listing fail with `message`
    #[must_use]
    pub fn failing_service_principals(mut self, message: impl Into<String>) -> Self {
        self.service_principals_error = Some(message.into());
        self
    }

    /// Number of fetch calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn serve(&self, objects: &[DirectoryObject], error: Option<&String>) -> Result<Vec<DirectoryObject>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match error {
            Some(message) => Err(anyhow::anyhow!("{message}")),
            None => Ok(objects.to_vec()),
        }
    }
}

#[async_trait]
impl DirectoryClient for StaticDirectory {
    async fn fetch_applications(&self) -> Result<Vec<DirectoryObject>> {
        self.serve(&self.applications, self.applications_error.as_ref())
    }

    async fn fetch_service_principals(&self) -> Result<Vec<DirectoryObject>> {
        self.serve(&self.service_principals, self.service_principals_error.as_ref())
    }
}
