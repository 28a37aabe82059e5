//! Opaque page cursors encoding a comment's creation instant.
//!
//! The encoding is fixed-width RFC 3339 in UTC with microsecond
//! precision, so lexical comparison of two cursors agrees with
//! chronological comparison of the instants they encode. The format is
//! part of the client contract and must stay stable across versions.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::error::PageError;

pub fn encode_cursor(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_cursor(raw: &str) -> Result<DateTime<Utc>, PageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| PageError::InvalidCursor(raw.to_string()))
}
