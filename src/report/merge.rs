//! # Object Merger
//!
//! Fetches the objects a report mode covers. Applications always come before
//! service principals; downstream consumers rely on that row order.

use super::error::ReportError;
use super::types::{DirectoryObject, ObjectKind, ReportMode};
use crate::directory::DirectoryClient;
use tracing::debug;

/// Fetch and tag the objects of `mode`
///
/// The directory client owns retries; a failure here is final.
///
/// # Errors
/// Returns [`ReportError::DirectoryUnavailable`] with the client's error attached.
pub async fn merge<C>(client: &C, mode: ReportMode) -> Result<Vec<DirectoryObject>, ReportError>
where
    C: DirectoryClient + ?Sized,
{
    let mut objects = Vec::new();

    if matches!(mode, ReportMode::Apps | ReportMode::Combined) {
        objects.extend(fetch(client, ObjectKind::App).await?);
    }
    if matches!(mode, ReportMode::ServicePrincipals | ReportMode::Combined) {
        objects.extend(fetch(client, ObjectKind::ServicePrincipal).await?);
    }

    Ok(objects)
}

async fn fetch<C>(client: &C, kind: ObjectKind) -> Result<Vec<DirectoryObject>, ReportError>
where
    C: DirectoryClient + ?Sized,
{
    let fetched = match kind {
        ObjectKind::App => client.fetch_applications().await,
        ObjectKind::ServicePrincipal => client.fetch_service_principals().await,
    }
    .map_err(|source| ReportError::DirectoryUnavailable { kind, source })?;

    debug!(kind = %kind, count = fetched.len(), "fetched directory objects");

    // The tag is authoritative regardless of what the client filled in
    Ok(fetched
        .into_iter()
        .map(|object| DirectoryObject {
            object_kind: kind,
            ..object
        })
        .collect())
}
