//! Clock helpers - epoch-millisecond timestamps used across action records

use chrono::{DateTime, TimeZone, Utc};

/// Current wall-clock time in milliseconds since the Unix epoch
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Convert an epoch-millisecond timestamp to a UTC datetime, clamping
/// out-of-range values to the epoch
#[must_use]
pub fn to_datetime(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .unwrap_or_else(|| Utc.timestamp_millis_opt(0).unwrap())
}

/// Format an epoch-millisecond timestamp for announcements,
/// e.g. "Wed, 03 Sep 2025 12:00:00 UTC"
#[must_use]
pub fn format_timestamp(millis: i64) -> String {
    to_datetime(millis)
        .format("%a, %d %b %Y %H:%M:%S UTC")
        .to_string()
}
