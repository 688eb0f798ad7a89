//! Timestamp parsing and ordering.
//!
//! Document timestamps are string-encoded. Writers normally stamp
//! RFC 3339 instants, but the epoch sentinel (and hand-edited store
//! files) use the plain `YYYY-MM-DD HH:MM:SS` form, so both are
//! accepted. Values that parse as neither fall back to lexicographic
//! ordering, which is what the wire format's string comparison did.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use std::cmp::Ordering;

const LENIENT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Returns the current instant in the canonical wire encoding.
#[must_use]
pub fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a document timestamp, RFC 3339 first, lenient form second.
#[must_use]
pub fn parse_ts(ts: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(ts) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(ts, LENIENT_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Orders two document timestamps.
///
/// When both sides parse, instants are compared; otherwise the raw
/// strings are, so opaque timestamp values still get a total order.
#[must_use]
pub fn ts_order(a: &str, b: &str) -> Ordering {
    match (parse_ts(a), parse_ts(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}
