//! Scalar coercions from extracted text.
//!
//! Everything the decoder locates in a document is text; these helpers turn
//! that text into the requested scalar. Numbers and timestamps are trimmed
//! before parsing, booleans match case-insensitively, and every failure is a
//! [`DecodeError::Coercion`] naming the offending value and the target type.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DecodeError, Result};

/// Parse any `FromStr` scalar from trimmed text.
pub(crate) fn parse_scalar<T: FromStr>(raw: &str, target: &'static str) -> Result<T> {
    raw.trim().parse().map_err(|_| DecodeError::Coercion {
        value: raw.to_string(),
        target: target.to_string(),
    })
}

/// Parse a boolean. `true` and `false` in any casing are accepted.
pub(crate) fn parse_bool(raw: &str) -> Result<bool> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if trimmed.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(DecodeError::Coercion {
            value: raw.to_string(),
            target: "bool".to_string(),
        })
    }
}

/// Parse a character. The text must be exactly one character; whitespace is
/// significant here.
pub(crate) fn parse_char(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(DecodeError::Coercion {
            value: raw.to_string(),
            target: "char".to_string(),
        }),
    }
}

/// Parse a timestamp.
///
/// With `format` set, only that `chrono` format string is accepted; a
/// date-only format reads as midnight. Without it, a chain of common shapes
/// is tried: RFC 3339, RFC 2822, ISO 8601 without offset (`T` or space
/// separated, optional fraction), and a bare date which reads as midnight.
pub(crate) fn parse_timestamp(raw: &str, format: Option<&str>) -> Result<NaiveDateTime> {
    let trimmed = raw.trim();
    let coercion = || DecodeError::Coercion {
        value: raw.to_string(),
        target: "timestamp".to_string(),
    };

    if let Some(format) = format {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
        return NaiveDate::parse_from_str(trimmed, format)
            .map(|date| date.and_time(NaiveTime::MIN))
            .map_err(|_| coercion());
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.naive_utc());
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(trimmed) {
        return Ok(parsed.naive_utc());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, pattern) {
            return Ok(parsed);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    Err(coercion())
}

/// Render a timestamp in a shape [`parse_timestamp`] accepts without a
/// format override.
pub(crate) fn render_timestamp(value: &NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S%.f").to_string()
}
