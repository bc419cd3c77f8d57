//! Timestamps for profile bookkeeping.

use chrono::{DateTime, SecondsFormat, Utc};

pub use chrono::ParseError;

/// UTC instant of the last successful profile change.
pub type Timestamp = DateTime<Utc>;

/// Current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp as RFC 3339 with millisecond precision, the format
/// adapters persist.
#[must_use]
pub fn to_rfc3339(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 string back into a UTC timestamp.
///
/// # Errors
///
/// Returns the underlying [`ParseError`] on malformed input.
pub fn from_rfc3339(value: &str) -> Result<Timestamp, ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.to_utc())
}
