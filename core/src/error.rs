//! Error types for the datagen client.
//!
//! # Design
//! The facade itself never wraps transport failures: operations return the
//! transport's own error type. `ApiError` only covers what happens on this
//! side of the wire (bad base URL, configuration, decoding a body the caller
//! asked to decode). `TransportError` is the error of the bundled ureq
//! transport.

use thiserror::Error;

/// Errors raised while constructing a client or decoding a response.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL does not parse.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// The base URL parses but cannot carry a path (e.g. `mailto:`).
    #[error("base URL cannot be used as a base: {0}")]
    CannotBeABase(String),

    /// Configuration could not be loaded from the environment.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    /// A response body could not be decoded into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(#[source] serde_json::Error),
}

/// Errors returned by `UreqTransport`.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {}", String::from_utf8_lossy(.body))]
    Status { status: u16, body: Vec<u8> },

    /// Connection, protocol, or I/O failure.
    #[error(transparent)]
    Http(#[from] ureq::Error),
}

impl TransportError {
    /// Status code for `Status` errors, `None` for network failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(_) => None,
        }
    }
}
