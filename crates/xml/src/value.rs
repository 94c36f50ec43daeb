//! Wrapper types for document scalars serde has no native shape for.
//!
//! These exist so that loosely formatted documents can still land on strongly
//! typed fields: [`Timestamp`] accepts a spread of date shapes (or the
//! decoder's configured format), [`Uid`] tolerates blank identifiers, and
//! [`Uri`] accepts relative references. All three decode from text and carry
//! a meaningful zero value for missing data.

use std::fmt;

use chrono::NaiveDateTime;
use serde::de::{Deserialize, Deserializer, Unexpected, Visitor};
use uuid::Uuid;

use crate::coerce;

/// Newtype name by which the decoder recognizes [`Timestamp`] fields, so the
/// configured date format can reach the parse.
pub(crate) const TIMESTAMP_NEWTYPE: &str = "$lax-xml::Timestamp";

/// A date and time without offset.
///
/// Without a configured format the decoder accepts RFC 3339, RFC 2822,
/// ISO 8601 without offset, and bare dates (read as midnight); offsets are
/// normalized to UTC. The zero value is the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(pub NaiveDateTime);

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&coerce::render_timestamp(&self.0))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(value: NaiveDateTime) -> Self {
        Timestamp(value)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_newtype_struct(TIMESTAMP_NEWTYPE, TimestampVisitor)
    }
}

struct TimestampVisitor;

impl<'de> Visitor<'de> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a date and time string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Timestamp, E>
    where
        E: serde::de::Error,
    {
        coerce::parse_timestamp(v, None)
            .map(Timestamp)
            .map_err(E::custom)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> Result<Timestamp, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(self)
    }
}

/// A UUID that decodes blank text as the nil UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Uid(pub Uuid);

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for Uid {
    fn from(value: Uuid) -> Self {
        Uid(value)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(UidVisitor)
    }
}

struct UidVisitor;

impl<'de> Visitor<'de> for UidVisitor {
    type Value = Uid;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a UUID string")
    }

    fn visit_str<E>(self, v: &str) -> Result<Uid, E>
    where
        E: serde::de::Error,
    {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Uid(Uuid::nil()));
        }
        Uuid::parse_str(trimmed)
            .map(Uid)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

/// A URI that accepts both relative and absolute references.
///
/// The zero value is `/`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uri(pub http::Uri);

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<http::Uri> for Uri {
    fn from(value: http::Uri) -> Self {
        Uri(value)
    }
}

impl<'de> Deserialize<'de> for Uri {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_str(UriVisitor)
    }
}

struct UriVisitor;

impl<'de> Visitor<'de> for UriVisitor {
    type Value = Uri;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a URI")
    }

    fn visit_str<E>(self, v: &str) -> Result<Uri, E>
    where
        E: serde::de::Error,
    {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            return Ok(Uri::default());
        }
        trimmed
            .parse::<http::Uri>()
            .map(Uri)
            .map_err(|_| E::invalid_value(Unexpected::Str(v), &self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::IntoDeserializer;
    use serde::de::value::{Error as ValueError, StrDeserializer};

    fn text(s: &str) -> StrDeserializer<'_, ValueError> {
        s.into_deserializer()
    }

    #[test]
    fn test_timestamp_from_foreign_deserializer() {
        let ts = Timestamp::deserialize(text("2012-03-04T05:06:07")).unwrap();
        assert_eq!(ts.to_string(), "2012-03-04T05:06:07");
    }

    #[test]
    fn test_timestamp_zero_is_epoch() {
        assert_eq!(Timestamp::default().to_string(), "1970-01-01T00:00:00");
    }

    #[test]
    fn test_uid_blank_is_nil() {
        assert_eq!(Uid::deserialize(text("")).unwrap(), Uid(Uuid::nil()));
        assert_eq!(Uid::deserialize(text("  ")).unwrap(), Uid(Uuid::nil()));
    }

    #[test]
    fn test_uid_parses_and_rejects() {
        let uid = Uid::deserialize(text("f3faf0a6-fba2-4b1e-8bd3-54a7c5a286b7")).unwrap();
        assert_eq!(uid.to_string(), "f3faf0a6-fba2-4b1e-8bd3-54a7c5a286b7");
        assert!(Uid::deserialize(text("not-a-uuid")).is_err());
    }

    #[test]
    fn test_uri_relative_and_absolute() {
        let relative = Uri::deserialize(text("/complete/search")).unwrap();
        assert_eq!(relative.to_string(), "/complete/search");
        let absolute = Uri::deserialize(text("http://example.com/a?b=c")).unwrap();
        assert_eq!(absolute.to_string(), "http://example.com/a?b=c");
        assert_eq!(Uri::deserialize(text("")).unwrap(), Uri::default());
    }
}
