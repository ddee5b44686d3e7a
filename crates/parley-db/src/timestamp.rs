use chrono::{DateTime, FixedOffset};

use crate::error::{DbError, Result};

/// Space separated form written by the bridge's SQLite driver.
const SPACED_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQL predicate on `m.timestamp` that holds only for values [`parse_timestamp`]
/// decodes: a real calendar date, seconds, and a `Z` or `+hh:mm` offset.
/// `julianday` alone also accepts offset-less and out-of-range values.
macro_rules! decodable_message_time {
    () => {
        "(julianday(m.timestamp) IS NOT NULL \
         AND trim(m.timestamp) GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9][Tt ][0-9][0-9]:[0-9][0-9]:[0-9][0-9]*' \
         AND (trim(m.timestamp) GLOB '*[Zz]' OR trim(m.timestamp) GLOB '*[+-][0-9][0-9]:[0-9][0-9]') \
         AND date(substr(trim(m.timestamp), 1, 10)) = substr(trim(m.timestamp), 1, 10))"
    };
}
pub(crate) use decodable_message_time;

/// Decode a stored timestamp. Accepts RFC 3339 and the space separated
/// variant with a numeric offset.
pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, SPACED_FORMAT))
        .map_err(|_| DbError::Timestamp(value.to_string()))
}

/// Validate a caller supplied time bound and normalise it to RFC 3339.
pub(crate) fn parse_bound(field: &'static str, value: &str) -> Result<String> {
    parse_timestamp(value)
        .map(|t| t.to_rfc3339())
        .map_err(|_| DbError::InvalidDate {
            field,
            value: value.to_string(),
        })
}

/// `2006-01-02 15:04:05` in the timestamp's own offset.
pub fn format_display(timestamp: &DateTime<FixedOffset>) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
