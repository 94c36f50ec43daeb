//! Error types for XML decoding.
//!
//! All decoding failures surface as [`DecodeError`]. The decoder draws a hard
//! line between structural problems with the document itself
//! ([`DecodeError::MalformedXml`]) and values that were located but could not
//! be converted to the requested Rust type ([`DecodeError::Coercion`]).
//! Missing data is never an error; absent fields decode to zero values
//! instead.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use std::fmt;

use thiserror::Error;

/// The error type for all decoding operations.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    /// A located value could not be converted to the requested type.
    ///
    /// Raised for unparsable numbers, booleans, dates, UUIDs, and enum
    /// symbols that match no variant. A coercion failure aborts the whole
    /// decode.
    #[error("cannot coerce {value:?} into {target}")]
    Coercion { value: String, target: String },

    /// The document (or the target type) nests deeper than the decoder
    /// is willing to follow.
    #[error("nesting exceeds {0} levels")]
    TooDeep(usize),

    /// A failure reported by a `Deserialize` implementation.
    #[error("{0}")]
    Message(String),

    /// Internal signal used while discovering list item elements.
    ///
    /// Never escapes the decoder: the sequence access that triggers item
    /// discovery converts it to end-of-sequence.
    #[doc(hidden)]
    #[error("no matching list items")]
    NoMatchingItems,
}

impl serde::de::Error for DecodeError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        DecodeError::Message(msg.to_string())
    }

    fn unknown_variant(variant: &str, _expected: &'static [&'static str]) -> Self {
        DecodeError::Coercion {
            value: variant.to_string(),
            target: "enum variant".to_string(),
        }
    }

    fn invalid_value(unexp: serde::de::Unexpected, exp: &dyn serde::de::Expected) -> Self {
        DecodeError::Coercion {
            value: unexp.to_string(),
            target: exp.to_string(),
        }
    }
}

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, DecodeError>;
