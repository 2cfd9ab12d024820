//! Time helpers
//!
//! Date/time conversion happens at the API handler layer; the
//! repository and report layers only ever see `i64` Unix millis.

use chrono::{DateTime, NaiveDate, Utc};

use crate::utils::{AppError, AppResult};

/// Parse a report window boundary into Unix millis.
///
/// Accepts raw millis (`"1717200000000"`), an RFC 3339 datetime, or a
/// plain `YYYY-MM-DD` date (interpreted as UTC midnight).
pub fn parse_window_bound(value: &str) -> AppResult<i64> {
    if let Ok(millis) = value.parse::<i64>() {
        return Ok(millis);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.timestamp_millis());
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        return Ok(midnight.and_utc().timestamp_millis());
    }
    Err(AppError::validation(format!(
        "Invalid date/time value: {value}"
    )))
}

/// Format Unix millis as RFC 3339 (UTC)
pub fn millis_to_rfc3339(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_millis_date_and_rfc3339() {
        assert_eq!(parse_window_bound("1717200000000").unwrap(), 1_717_200_000_000);
        assert_eq!(parse_window_bound("1970-01-02").unwrap(), 86_400_000);
        assert_eq!(
            parse_window_bound("1970-01-01T00:00:01Z").unwrap(),
            1_000
        );
        assert!(parse_window_bound("not-a-date").is_err());
    }
}
