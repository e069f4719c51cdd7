//! Error types for the library layer.
//!
//! Callers see exactly two kinds of failure: a [`ValidationError`] ("fix
//! your input", or the server sent something malformed) and a
//! [`StockApiError`] (the request reached the network and failed).

use std::fmt;

use stockdash_api::{DecodeError, Method, StockCodeError};

/// A local precondition failed or a response body had the wrong shape.
/// Never wraps a network failure and is never retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("invalid stock code: {0}")]
    InvalidStockCode(#[from] StockCodeError),
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: String,
        #[source]
        reason: DecodeError,
    },
}

/// A failure that reached the network layer.
#[derive(Debug, Clone, PartialEq)]
pub struct StockApiError {
    /// HTTP status, when the server answered.
    pub status: Option<u16>,
    pub message: String,
    pub method: Method,
    pub url: String,
    /// Number of attempts made before giving up.
    pub attempts: u32,
}

impl StockApiError {
    pub(crate) fn from_transport(err: &stockdash_api::Error, attempts: u32) -> Self {
        match err {
            stockdash_api::Error::Network {
                method,
                url,
                message,
                ..
            } => Self {
                status: None,
                message: message.clone(),
                method: *method,
                url: url.clone(),
                attempts,
            },
            stockdash_api::Error::HttpStatus {
                status,
                message,
                method,
                url,
            } => Self {
                status: Some(*status),
                message: message.clone(),
                method: *method,
                url: url.clone(),
                attempts,
            },
            stockdash_api::Error::InvalidUrl(msg) | stockdash_api::Error::ClientBuild(msg) => {
                Self {
                    status: None,
                    message: msg.clone(),
                    method: Method::Get,
                    url: String::new(),
                    attempts,
                }
            }
        }
    }

    /// True for 4xx responses.
    pub fn is_client_error(&self) -> bool {
        matches!(self.status, Some(s) if (400..500).contains(&s))
    }
}

impl fmt::Display for StockApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} failed", self.method, self.url)?;
        if let Some(status) = self.status {
            write!(f, " with status {}", status)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for StockApiError {}

/// Errors returned by [`crate::StockApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Bad input or a malformed response body.
    Validation(ValidationError),
    /// The request failed at the network or server.
    Api(StockApiError),
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// HTTP status of an API failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status,
            Self::Validation(_) => None,
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Api(e) => write!(f, "API error: {}", e),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Validation(e) => Some(e),
            Self::Api(e) => Some(e),
        }
    }
}

impl From<ValidationError> for ClientError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StockApiError> for ClientError {
    fn from(e: StockApiError) -> Self {
        Self::Api(e)
    }
}

impl From<StockCodeError> for ClientError {
    fn from(e: StockCodeError) -> Self {
        Self::Validation(ValidationError::InvalidStockCode(e))
    }
}

/// Configuration could not be loaded or is unusable.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("timeout must be greater than zero")]
    ZeroTimeout,
    #[error("failed to build transport: {0}")]
    Transport(String),
}
