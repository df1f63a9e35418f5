//! # Secret Row Extractor
//!
//! Turns one directory object into the report rows of its included secrets.

use super::error::ReportError;
use super::threshold::{classify, Window};
use super::timestamp::normalize;
use super::types::{DirectoryObject, ReportRow};
use tracing::trace;

/// Extract the rows of one object, preserving secret order
///
/// # Errors
/// Returns [`ReportError::MalformedTimestamp`] for the first secret whose
/// expiry cannot be parsed; no rows are returned in that case.
pub fn extract(
    object: &DirectoryObject,
    now: i64,
    window: Window,
) -> Result<Vec<ReportRow>, ReportError> {
    let mut rows = Vec::new();

    for secret in &object.secrets {
        let expiry = normalize(&secret.expiry_raw).map_err(|source| {
            ReportError::MalformedTimestamp {
                display_name: object.display_name.clone(),
                app_id: object.app_id.clone(),
                secret_id: secret.secret_id.clone(),
                raw: secret.expiry_raw.clone(),
                source,
            }
        })?;

        let class = classify(expiry.epoch, now, window);
        trace!(
            app_id = %object.app_id,
            secret_id = %secret.secret_id,
            included = class.included,
            expired = class.expired,
            "classified secret"
        );

        if class.included {
            rows.push(ReportRow {
                object_kind: object.object_kind,
                display_name: object.display_name.clone(),
                app_id: object.app_id.clone(),
                secret_id: secret.secret_id.clone(),
                expiry_display: expiry.display,
                is_expired: class.expired,
            });
        }
    }

    Ok(rows)
}
