//! # Timestamp Normalizer
//!
//! Converts provider expiry strings (RFC 3339, fractional seconds up to
//! nanoseconds) into a display string and Unix seconds.

use crate::constants::EXPIRY_DISPLAY_FORMAT;
use chrono::DateTime;

/// An expiry instant in both of its report representations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedExpiry {
    /// `YYYY-MM-DD HH:MM` in the zone the provider used
    pub display: String,
    /// Unix seconds, only used for arithmetic
    pub epoch: i64,
}

/// Parse a provider timestamp
///
/// No timezone conversion happens: the display keeps the offset carried by
/// `raw` (Graph always emits UTC).
///
/// # Errors
/// Returns the chrono parse error when `raw` is not valid RFC 3339. Callers
/// abort the report on failure.
pub fn normalize(raw: &str) -> Result<NormalizedExpiry, chrono::ParseError> {
    let parsed = DateTime::parse_from_rfc3339(raw)?;
    Ok(NormalizedExpiry {
        display: parsed.format(EXPIRY_DISPLAY_FORMAT).to_string(),
        epoch: parsed.timestamp(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_normalize_utc_whole_seconds() {
        let n = normalize("2020-01-01T00:00:00Z").unwrap();
        assert_eq!(n.display, "2020-01-01 00:00");
        assert_eq!(n.epoch, 1_577_836_800);
    }

    #[test]
    fn test_normalize_graph_fractional_seconds() {
        let n = normalize("2025-03-18T17:27:09.4170000Z").unwrap();
        assert_eq!(n.display, "2025-03-18 17:27");
        assert_eq!(n.epoch, 1_742_318_829);
    }

    #[test]
    fn test_normalize_nanosecond_precision() {
        let n = normalize("2024-02-29T23:59:59.999999999Z").unwrap();
        assert_eq!(n.display, "2024-02-29 23:59");
        assert_eq!(n.epoch, 1_709_251_199);
    }

    #[test]
    fn test_normalize_preserves_offset_in_display() {
        let n = normalize("2024-06-01T10:30:00+02:00").unwrap();
        // Display stays in +02:00; epoch is the absolute instant
        assert_eq!(n.display, "2024-06-01 10:30");
        assert_eq!(n.epoch, 1_717_230_600);
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize("not-a-date").is_err());
        assert!(normalize("").is_err());
        assert!(normalize("2024-06-01").is_err());
        assert!(normalize("2024-06-01 10:30").is_err());
    }

    #[test]
    fn test_epoch_round_trips_to_display() {
        for raw in [
            "1999-12-31T23:59:30.5Z",
            "2031-07-04T08:05:00-05:00",
            "2024-01-15T12:00:59.123456789+05:30",
        ] {
            let n = normalize(raw).unwrap();
            let offset = *DateTime::parse_from_rfc3339(raw).unwrap().offset();
            let back = offset.timestamp_opt(n.epoch, 0).unwrap();
            assert_eq!(back.format(EXPIRY_DISPLAY_FORMAT).to_string(), n.display, "{raw}");
        }
    }
}
