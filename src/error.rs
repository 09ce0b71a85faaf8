//! Error types for the request helper
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Transport Error Enum ==
/// Failure reported by a transport before a response body could be produced.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Error raised by the underlying HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request did not complete within the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Any other transport failure
    #[error("{0}")]
    Other(String),
}

// == Request Error Enum ==
/// Error returned by `get`, `post` and `send_request`.
///
/// `Transport` means the server could not be reached (or refused the request);
/// `Parse` means a body was received, from the network or the cache, but it is
/// not valid JSON.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Network or transport-level failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Body could not be decoded as JSON
    #[error("JSON parse error: {source}")]
    Parse {
        #[source]
        source: serde_json::Error,
        /// The offending raw text
        raw: String,
    },
}

impl RequestError {
    /// Wraps a decoding failure together with the text that failed to parse.
    pub fn parse(source: serde_json::Error, raw: impl Into<String>) -> Self {
        RequestError::Parse {
            source,
            raw: raw.into(),
        }
    }

    /// True for `RequestError::Parse`.
    pub fn is_parse(&self) -> bool {
        matches!(self, RequestError::Parse { .. })
    }

    /// True for `RequestError::Transport`.
    pub fn is_transport(&self) -> bool {
        matches!(self, RequestError::Transport(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the request helper.
pub type Result<T> = std::result::Result<T, RequestError>;
