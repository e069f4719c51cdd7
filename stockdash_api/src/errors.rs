//! Error types for the transport layer.

use std::fmt;

/// HTTP method of a failed request, kept for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Get => f.write_str("GET"),
        }
    }
}

/// Errors that can occur on a single request attempt.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced an HTTP status (connect failure, reset, timeout).
    #[error("{method} {url} failed: {message}")]
    Network {
        method: Method,
        url: String,
        message: String,
        /// True when the attempt hit the configured timeout.
        timed_out: bool,
    },
    /// The API returned a non-success status.
    #[error("{method} {url} returned status {status}: {message}")]
    HttpStatus {
        status: u16,
        /// Server-provided message, or a truncated body when none was given.
        message: String,
        method: Method,
        url: String,
    },
    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
    /// The request URL could not be built from the base URL and path.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl Error {
    /// HTTP status carried by this error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}
