//! Timestamps for sensor series
//!
//! Timestamps are milliseconds since the Unix epoch. The time-series database
//! exports RFC 3339 strings; these helpers convert in both directions.

use alloc::string::String;

use chrono::{DateTime, TimeZone, Utc};

/// Timestamp in milliseconds since the Unix epoch
pub type Timestamp = u64;

/// Milliseconds per second
pub const MS_PER_SECOND: u64 = 1_000;

/// Elapsed seconds between two timestamps
///
/// Saturates at zero when `later` precedes `earlier`.
pub fn elapsed_secs(earlier: Timestamp, later: Timestamp) -> f64 {
    later.saturating_sub(earlier) as f64 / MS_PER_SECOND as f64
}

/// Parse an RFC 3339 timestamp (e.g. `2023-03-01T10:20:00Z`)
///
/// Returns `None` for malformed strings and for instants before the epoch.
pub fn parse_rfc3339(text: &str) -> Option<Timestamp> {
    let parsed = DateTime::parse_from_rfc3339(text.trim()).ok()?;
    u64::try_from(parsed.timestamp_millis()).ok()
}

/// Convert a timestamp to a UTC date-time
pub fn to_datetime(ts: Timestamp) -> Option<DateTime<Utc>> {
    let millis = i64::try_from(ts).ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Format a timestamp with a strftime-style pattern, in UTC
pub fn format(ts: Timestamp, pattern: &str) -> Option<String> {
    use alloc::string::ToString;

    to_datetime(ts).map(|dt| dt.format(pattern).to_string())
}
