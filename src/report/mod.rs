//! # Credential Expiry Report
//!
//! The reporting pipeline: merge directory objects, extract rows for secrets
//! inside the window, render them.
//!
//! - `timestamp`: provider timestamp → display string + epoch
//! - `threshold`: window validation and secret classification
//! - `extract`: one object → report rows
//! - `merge`: fetch and tag applications / service principals
//! - `render`: text table or CSV
//!
//! Every row is collected before anything is written, so a failing run emits
//! no output at all.

pub mod error;
pub mod extract;
pub mod merge;
pub mod render;
pub mod threshold;
pub mod timestamp;
pub mod types;

pub use error::ReportError;
pub use extract::extract;
pub use merge::merge;
pub use render::ReportRenderer;
pub use threshold::{classify, Classification, Window};
pub use timestamp::{normalize, NormalizedExpiry};
pub use types::{DirectoryObject, Encoding, ObjectKind, ReportMode, ReportRow, SecretCredential};

use crate::directory::DirectoryClient;
use std::io::Write;
use tracing::{info, info_span, Instrument};

/// Options of one report run
#[derive(Debug, Clone, Copy)]
pub struct ReportRequest {
    pub mode: ReportMode,
    /// Caller-supplied window in days; `-1` means unfiltered
    pub window_days: i64,
    pub encoding: Encoding,
    /// Color expired expiry dates in text output
    pub highlight: bool,
}

/// Build the rows of a report without rendering them
///
/// # Errors
/// See [`ReportError`]; the window is validated before anything is fetched.
pub async fn collect_rows<C>(
    client: &C,
    mode: ReportMode,
    window_days: i64,
    now: i64,
) -> Result<Vec<ReportRow>, ReportError>
where
    C: DirectoryClient + ?Sized,
{
    let window = Window::from_days(window_days)?;
    let objects = merge(client, mode).await?;

    let mut rows = Vec::new();
    for object in &objects {
        rows.extend(extract(object, now, window)?);
    }
    Ok(rows)
}

/// Produce a full report into `out`
///
/// `now` is taken once per run so every secret is classified against the same instant.
///
/// # Errors
/// Returns [`ReportError`] without having written anything, except for
/// [`ReportError::Output`] which can happen mid-write.
pub async fn produce_report<C, W>(
    client: &C,
    request: ReportRequest,
    now: i64,
    out: &mut W,
) -> Result<usize, ReportError>
where
    C: DirectoryClient + ?Sized,
    W: Write,
{
    let span = info_span!(
        "report",
        mode = request.mode.as_str(),
        window = request.window_days
    );

    async move {
        let rows = collect_rows(client, request.mode, request.window_days, now).await?;
        let expired = rows.iter().filter(|r| r.is_expired).count();
        info!(rows = rows.len(), expired, "report ready");

        ReportRenderer::new(request.encoding)
            .with_highlight(request.highlight)
            .render(&rows, out)?;
        Ok::<_, ReportError>(rows.len())
    }
    .instrument(span)
    .await
}
