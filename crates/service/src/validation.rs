//! Shared field-presence and timestamp validation helpers.

use chrono::{DateTime, NaiveDateTime};

use crate::errors::{ValidationCode, ValidationError};

/// Require a non-empty string field.
pub fn require_non_empty(
    value: Option<&str>,
    code: ValidationCode,
    message: &str,
) -> Result<String, ValidationError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.to_string()),
        _ => Err(ValidationError::new(code, message)),
    }
}

/// `stop` and `duration` must both be set or both be unset.
pub fn ensure_stop_duration_paired(
    stop: Option<&str>,
    duration: Option<f64>,
) -> Result<(), ValidationError> {
    if stop.is_some() != duration.is_some() {
        return Err(ValidationError::new(
            ValidationCode::StopDurationPairing,
            "stop time and duration must both be specified or neither",
        ));
    }
    Ok(())
}

/// Parse an ISO-8601 start timestamp into epoch milliseconds.
///
/// Accepts RFC 3339 strings and bare datetimes without an offset, which are
/// taken as UTC. Anything else is rejected outright so a bogus sort key
/// never reaches storage.
pub fn parse_start_millis(start: &str) -> Result<i64, ValidationError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(start) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(start, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc().timestamp_millis());
    }
    Err(ValidationError::new(
        ValidationCode::StartUnparseable,
        format!("start date `{start}` is not a valid timestamp"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_rfc3339_with_offset() {
        let millis = parse_start_millis("2019-01-12T16:37:20+01:00").unwrap();
        assert_eq!(millis, 1_547_307_440_000);
    }

    #[test]
    fn accepts_bare_datetime_as_utc() {
        let bare = parse_start_millis("2019-01-12T16:37:20").unwrap();
        let zulu = parse_start_millis("2019-01-12T16:37:20Z").unwrap();
        assert_eq!(bare, zulu);
    }

    #[test]
    fn accepts_fractional_seconds() {
        let coarse = parse_start_millis("2019-01-12T16:37:20").unwrap();
        let fine = parse_start_millis("2019-01-12T16:37:20.250").unwrap();
        assert_eq!(fine - coarse, 250);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_start_millis("not-a-date").unwrap_err();
        assert_eq!(err.code, ValidationCode::StartUnparseable);
    }

    #[test]
    fn later_start_maps_to_larger_millis() {
        let earlier = parse_start_millis("2019-01-12T16:37:20").unwrap();
        let later = parse_start_millis("2019-01-12T17:00:00").unwrap();
        assert!(later > earlier);
    }

    #[test]
    fn pairing_allows_both_or_neither() {
        assert!(ensure_stop_duration_paired(None, None).is_ok());
        assert!(ensure_stop_duration_paired(Some("2019-01-12T17:00:00"), Some(0.0)).is_ok());

        let err = ensure_stop_duration_paired(Some("2019-01-12T17:00:00"), None).unwrap_err();
        assert_eq!(err.code, ValidationCode::StopDurationPairing);
        let err = ensure_stop_duration_paired(None, Some(1360.0)).unwrap_err();
        assert_eq!(err.code, ValidationCode::StopDurationPairing);
    }

    #[test]
    fn require_non_empty_rejects_missing_and_blank() {
        assert_eq!(
            require_non_empty(Some("1"), ValidationCode::UserIdRequired, "m").unwrap(),
            "1"
        );
        for bad in [None, Some(""), Some("   ")] {
            let err = require_non_empty(bad, ValidationCode::UserIdRequired, "m").unwrap_err();
            assert_eq!(err.code, ValidationCode::UserIdRequired);
        }
    }
}
