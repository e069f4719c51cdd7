//! Library layer for the stock dashboard: validating, retrying, caching API client.
//!
//! Wraps the `stockdash_api` transport with stock code validation, a fixed-delay
//! retry policy, in-memory TTL caches, and structured error logging.

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod error_log;
pub mod retry;
pub mod validation;

pub use stockdash_api;
pub use stockdash_api::types;
pub use stockdash_api::{StockCode, StockCodeError};

pub use cache::{ApiCaches, CacheStats, CacheStatsReport, MemoryCache, ResponseCache};
pub use client::{StockApiClient, WatchlistEntry};
pub use config::ApiClientConfig;
pub use error::{ClientError, ConfigError, StockApiError, ValidationError};
pub use error_log::{
    ErrorCategory, ErrorRecord, ErrorSeverity, ErrorSink, FanoutSink, MemoryErrorSink,
    RequestInfo, TracingErrorSink,
};
pub use retry::RetryPolicy;
