//! # Threshold Classifier
//!
//! Decides whether a secret belongs in the report and whether it has already
//! expired. Already-expired secrets are always included: an operator asking
//! for "expiring within 30 days" must see them first.

use super::error::ReportError;
use crate::constants::{NO_FILTER_WINDOW, SECONDS_PER_DAY};

/// Look-ahead horizon of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Report every secret
    Unfiltered,
    /// Report secrets with at most this many whole days remaining
    Days(u64),
}

impl Window {
    /// Validate a caller-supplied day count (`-1` means unfiltered)
    ///
    /// # Errors
    /// Returns [`ReportError::InvalidWindow`] for anything below `-1`.
    pub fn from_days(days: i64) -> Result<Self, ReportError> {
        if days == NO_FILTER_WINDOW {
            return Ok(Window::Unfiltered);
        }
        u64::try_from(days)
            .ok()
            .map(Window::Days)
            .ok_or(ReportError::InvalidWindow(days))
    }
}

/// Result of classifying one secret
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub included: bool,
    pub expired: bool,
}

/// Whole days until `expiry_epoch`, floored toward negative infinity
#[must_use]
pub fn days_remaining(expiry_epoch: i64, now: i64) -> i64 {
    expiry_epoch.saturating_sub(now).div_euclid(SECONDS_PER_DAY)
}

#[must_use]
pub fn classify(expiry_epoch: i64, now: i64, window: Window) -> Classification {
    let expired = expiry_epoch <= now;
    let included = match window {
        Window::Unfiltered => true,
        // Negative remaining days are in the past and always inside the window
        Window::Days(days) => {
            expired
                || u64::try_from(days_remaining(expiry_epoch, now))
                    .map_or(true, |remaining| remaining <= days)
        }
    };
    Classification { included, expired }
}
