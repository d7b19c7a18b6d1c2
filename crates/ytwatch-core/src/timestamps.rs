//! UTC timestamp parsing and the checkpoint cutoff rule.

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid ISO-8601 timestamp {raw:?}")]
pub struct TimestampError {
    pub raw: String,
}

/// Parses an ISO-8601 timestamp into UTC.
///
/// Accepts a trailing `Z`, an explicit offset (converted to UTC), or no
/// offset at all, which is read as UTC. Fractional seconds are allowed.
///
/// # Errors
///
/// Returns [`TimestampError`] if `raw` matches none of those forms.
pub fn parse_utc_timestamp(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    let trimmed = raw.trim();
    let normalized = match trimmed.strip_suffix('Z').or_else(|| trimmed.strip_suffix('z')) {
        Some(stem) => format!("{stem}+00:00"),
        None => trimmed.to_owned(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| TimestampError {
            raw: raw.to_owned(),
        })
}

/// Includes a video only when it was published strictly after the checkpoint.
#[must_use]
pub fn is_after_cutoff(cutoff: DateTime<Utc>, published_at: DateTime<Utc>) -> bool {
    published_at > cutoff
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    #[test]
    fn parses_trailing_z() {
        let dt = parse_utc_timestamp("2024-08-12T10:00:00Z").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 8, 12, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_explicit_offset_into_utc() {
        let dt = parse_utc_timestamp("2024-08-12T06:00:00-04:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 8, 12, 10, 0, 0).unwrap());
    }

    #[test]
    fn parses_fractional_seconds_with_offset() {
        let dt = parse_utc_timestamp("2024-08-12T10:00:00.123456+00:00").unwrap();
        assert_eq!(dt.timestamp_subsec_micros(), 123_456);
    }

    #[test]
    fn offsetless_timestamp_is_utc() {
        let dt = parse_utc_timestamp("2024-08-12T10:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 8, 12, 10, 0, 0).unwrap());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert!(parse_utc_timestamp("  2024-08-12T10:00:00Z\n").is_ok());
    }

    #[test]
    fn garbage_is_rejected() {
        let err = parse_utc_timestamp("last tuesday").unwrap_err();
        assert_eq!(err.raw, "last tuesday");
        assert!(parse_utc_timestamp("").is_err());
    }

    #[test]
    fn cutoff_is_strict() {
        let cutoff = Utc.with_ymd_and_hms(2024, 8, 12, 10, 0, 0).unwrap();
        assert!(!is_after_cutoff(cutoff, cutoff));
        assert!(!is_after_cutoff(cutoff, cutoff - Duration::seconds(1)));
        assert!(is_after_cutoff(cutoff, cutoff + Duration::seconds(1)));
    }

    #[test]
    fn cutoff_compares_instants_not_wall_clock() {
        let cutoff = parse_utc_timestamp("2024-08-12T10:00:00Z").unwrap();
        let same_instant = parse_utc_timestamp("2024-08-12T12:00:00+02:00").unwrap();
        let later = parse_utc_timestamp("2024-08-12T12:00:01+02:00").unwrap();
        assert!(!is_after_cutoff(cutoff, same_instant));
        assert!(is_after_cutoff(cutoff, later));
    }
}
