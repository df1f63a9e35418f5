//! # Report Errors
//!
//! Every failure aborts the current report. There is no partial report mode:
//! omitting an expiring secret silently is worse than producing nothing.

use super::types::ObjectKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    /// An expiry timestamp could not be parsed as RFC 3339
    #[error(
        "malformed expiry timestamp '{raw}' on secret {secret_id} of '{display_name}' (appId {app_id})"
    )]
    MalformedTimestamp {
        display_name: String,
        app_id: String,
        secret_id: String,
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Window must be -1 (unfiltered) or a non-negative number of days
    #[error("invalid window of {0} days: expected -1 or a non-negative number")]
    InvalidWindow(i64),

    /// The directory client failed to list objects
    #[error("directory unavailable while fetching {kind} objects")]
    DirectoryUnavailable {
        kind: ObjectKind,
        #[source]
        source: anyhow::Error,
    },

    /// The report sink rejected a write
    #[error("failed to write report")]
    Output(#[from] std::io::Error),
}

impl ReportError {
    /// Whether the error happened before anything was fetched
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        matches!(self, ReportError::InvalidWindow(_))
    }
}
