//! Error types for suggestion lookups.

use thiserror::Error;

/// The error type returned by [`SuggestClient`](crate::SuggestClient) calls.
#[derive(Error, Debug)]
pub enum SuggestError {
    /// The HTTP request could not be sent or came back with an error status.
    #[error("suggestion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a decodable suggestion document.
    #[error("suggestion response could not be decoded: {0}")]
    Decode(#[from] lax_xml::DecodeError),
}

/// A specialized `Result` type for suggestion lookups.
pub type Result<T> = std::result::Result<T, SuggestError>;
