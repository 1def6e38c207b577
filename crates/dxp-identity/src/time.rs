//! Time utilities for dxp identities.
//!
//! Credential timestamps are RFC 3339 strings with second precision in UTC,
//! e.g. `2024-01-02T03:04:05Z`.

use chrono::{DateTime, SecondsFormat, Utc};

/// Return the current time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    to_rfc3339(Utc::now())
}

/// Format a UTC timestamp the way credentials carry it.
pub fn to_rfc3339(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Check that a string parses as an RFC 3339 timestamp.
pub fn is_rfc3339(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
}
