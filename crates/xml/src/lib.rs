//! Convention-based XML decoder for loosely structured documents.
//!
//! This crate maps XML returned by third-party web APIs onto ordinary
//! `#[derive(Deserialize)]` types without any per-type mapping code. Element
//! and attribute names are resolved through a fallback chain (exact match,
//! lowercase, camelCase, then an underscore/dash-insensitive scan), so
//! inconsistently cased or oddly nested documents still land on statically
//! declared Rust shapes.
//!
//! # Features
//!
//! - **Name resolution**: field names match elements across casing and
//!   separator conventions (`numQueries`, `num_queries`, and `num-queries`
//!   all resolve to the same field).
//! - **Missing data is not an error**: fields with no matching element or
//!   attribute keep their zero value; blank input decodes to a fully zeroed
//!   target.
//! - **Attribute fallback**: values are read from elements first, then from
//!   attributes; an element with no text yields its first attribute's value.
//! - **List discovery**: `Vec<T>` targets find their items by `T`'s type
//!   name, whether the items sit under a wrapper element, inline among
//!   siblings, or anywhere beneath the root.
//! - **Namespace agnostic by default**: namespaces are stripped before
//!   mapping unless a specific namespace is requested.
//!
//! # Decoding
//!
//! ```ignore
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct CompleteSuggestion {
//!     suggestion: String,
//!     num_queries: String,
//! }
//!
//! let xml = r#"<toplevel>
//!   <CompleteSuggestion>
//!     <suggestion>microsoft</suggestion>
//!     <num_queries>12345</num_queries>
//!   </CompleteSuggestion>
//! </toplevel>"#;
//!
//! let suggestions: Vec<CompleteSuggestion> = lax_xml::from_str(xml)?;
//! assert_eq!(suggestions[0].suggestion, "microsoft");
//! ```
//!
//! # Options
//!
//! Decoding can be re-rooted at a named descendant, pinned to a namespace,
//! or given a strict date format:
//!
//! ```ignore
//! use lax_xml::{DecodeOptions, Decoder};
//!
//! let options = DecodeOptions::new()
//!     .root_element("result")
//!     .date_format("%d/%m/%Y %H:%M");
//! let decoder = Decoder::with_options(options);
//! let report: Report = decoder.decode(&body)?;
//! ```
//!
//! # Errors
//!
//! Only two things fail a decode in normal use: input that is not
//! well-formed XML ([`DecodeError::MalformedXml`]) and a located value that
//! cannot be converted to its target type ([`DecodeError::Coercion`]). A
//! coercion failure aborts the whole decode rather than yielding partial
//! data. Self-referential target shapes are cut off by a recursion guard
//! ([`DecodeError::TooDeep`]) instead of overflowing the stack.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod de;
pub mod error;
pub mod value;

mod coerce;
mod resolve;
mod tree;

// Re-export the decoding entry points at crate root
pub use de::{DecodeOptions, Decoder, from_slice, from_str, from_str_with};
pub use error::{DecodeError, Result};
pub use value::{Timestamp, Uid, Uri};
