//! Spelling and completion suggestions for free-form text.
//!
//! This crate wraps the Google toolbar suggestion endpoint behind a small
//! blocking client. The service answers with an XML document, which is
//! decoded into [`CompleteSuggestion`] records by [`lax-xml`](lax_xml)
//! without any per-response mapping code: the field names line up with the
//! response elements through the decoder's name-resolution rules.
//!
//! # Example
//!
//! ```no_run
//! use lax_suggest::SuggestClient;
//!
//! # fn main() -> lax_suggest::Result<()> {
//! let client = SuggestClient::new();
//! if let Some(corrected) = client.suggestion("miccrosoft")? {
//!     println!("did you mean {corrected}?");
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;

use serde::Deserialize;
use tracing::debug;

pub use error::{Result, SuggestError};

/// Endpoint queried by [`SuggestClient::new`].
pub const DEFAULT_ENDPOINT: &str = "http://google.com/complete/search";

/// One entry of the toolbar suggestion response.
///
/// The service returns entries as
/// `<CompleteSuggestion><suggestion data="..."/><num_queries int="..."/></CompleteSuggestion>`;
/// both values are carried in attributes, which the decoder falls back to
/// when an element has no text of its own.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompleteSuggestion {
    /// The suggested completion for the query text.
    pub suggestion: String,
    /// How many results the service reports for the suggestion.
    pub num_queries: String,
}

/// Blocking client for the suggestion service.
///
/// The client holds a connection pool and is cheap to clone; reuse one
/// instance across lookups rather than building a new one per call.
#[derive(Debug, Clone)]
pub struct SuggestClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl SuggestClient {
    /// A client pointed at [`DEFAULT_ENDPOINT`].
    pub fn new() -> Self {
        Self::with_endpoint(DEFAULT_ENDPOINT)
    }

    /// A client pointed at a custom endpoint, e.g. a regional mirror or a
    /// test server.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        SuggestClient {
            http: reqwest::blocking::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// All suggestions the service offers for `text`, in response order.
    ///
    /// Sends `q=<text>&output=toolbar` to the endpoint and decodes the XML
    /// body. An empty response decodes to an empty vector; an error status
    /// or an undecodable body is reported as a [`SuggestError`].
    pub fn suggestions(&self, text: &str) -> Result<Vec<CompleteSuggestion>> {
        debug!(endpoint = %self.endpoint, query = %text, "requesting suggestions");
        let body = self
            .http
            .get(&self.endpoint)
            .query(&[("q", text), ("output", "toolbar")])
            .send()?
            .error_for_status()?
            .text()?;
        let suggestions: Vec<CompleteSuggestion> = lax_xml::from_str(&body)?;
        debug!(count = suggestions.len(), "decoded suggestions");
        Ok(suggestions)
    }

    /// The service's best suggestion for `text`, or `None` when it has none.
    pub fn suggestion(&self, text: &str) -> Result<Option<String>> {
        let suggestions = self.suggestions(text)?;
        Ok(suggestions.into_iter().next().map(|entry| entry.suggestion))
    }
}

impl Default for SuggestClient {
    fn default() -> Self {
        Self::new()
    }
}
