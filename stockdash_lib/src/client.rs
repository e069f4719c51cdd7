//! Validating, retrying, caching client for the stock dashboard API.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use stockdash_api::types::{CurrentPriceResponse, PriceHistoryPoint, Recommendation, StockData};
use stockdash_api::{decode, decode_list, Client, DecodeError, Schema, StockCode};

use crate::cache::{ApiCaches, CacheStatsReport, ResponseCache};
use crate::config::ApiClientConfig;
use crate::error::{ClientError, ConfigError, StockApiError, ValidationError};
use crate::error_log::{
    ErrorCategory, ErrorRecord, ErrorSeverity, ErrorSink, RequestInfo, TracingErrorSink,
};
use crate::retry::{AttemptFailure, RetryPolicy};
use crate::validation;

/// Client for the stock dashboard backend.
///
/// Every method that takes a stock code validates it before anything goes
/// on the wire. Network calls are retried per the [`RetryPolicy`]; response
/// bodies are checked against their schema and never retried. Snapshot,
/// history and recommendation reads go through the injected [`ApiCaches`].
/// Every failure is also forwarded to the [`ErrorSink`].
pub struct StockApiClient {
    inner: Client,
    policy: RetryPolicy,
    caches: ApiCaches,
    errors: Arc<dyn ErrorSink>,
}

/// One row of a watchlist fetch.
#[derive(Debug)]
pub struct WatchlistEntry {
    pub code: StockCode,
    pub result: Result<StockData, ClientError>,
}

impl StockApiClient {
    /// Builds a client from validated configuration and injected collaborators.
    pub fn new(
        config: &ApiClientConfig,
        caches: ApiCaches,
        errors: Arc<dyn ErrorSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let inner = Client::new(&config.transport_config())
            .map_err(|e| ConfigError::Transport(e.to_string()))?;
        Ok(Self::with_transport(
            inner,
            RetryPolicy::new(config.retries, config.retry_delay()),
            caches,
            errors,
        ))
    }

    /// Default caches and an error sink that writes to `tracing`.
    pub fn with_defaults(config: &ApiClientConfig) -> Result<Self, ConfigError> {
        Self::new(config, ApiCaches::default(), Arc::new(TracingErrorSink))
    }

    /// Wraps an already configured transport, e.g. one with custom hooks.
    pub fn with_transport(
        inner: Client,
        policy: RetryPolicy,
        caches: ApiCaches,
        errors: Arc<dyn ErrorSink>,
    ) -> Self {
        Self {
            inner,
            policy,
            caches,
            errors,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Fetches a full snapshot via `GET /stocks/{code}`.
    ///
    /// Cached in `stock_data` under `stock:{code}:{real|mock}`.
    pub async fn get_stock_data(
        &self,
        code: &str,
        use_real_data: bool,
    ) -> Result<StockData, ClientError> {
        let code = self.validate_stock_code(code, "/stocks/{code}")?;
        self.fetch_stock_data(&code, use_real_data).await
    }

    async fn fetch_stock_data(
        &self,
        code: &StockCode,
        use_real_data: bool,
    ) -> Result<StockData, ClientError> {
        let cache_key = format!("stock:{}:{}", code, data_mode(use_real_data));
        if let Some(hit) = self.cached(self.caches.stock_data.as_ref(), &cache_key) {
            return Ok(hit);
        }

        let path = format!("/stocks/{}", code);
        let query = [("use_real_data", use_real_data.to_string())];
        let body = self.fetch("stock", &path, &query).await?;
        let stock: StockData = self.decode_body(&path, &query, &body)?;

        self.store(self.caches.stock_data.as_ref(), cache_key, &stock);
        Ok(stock)
    }

    /// Fetches the live price via `GET /stocks/{code}/current`. Never cached.
    pub async fn get_current_price(
        &self,
        code: &str,
        use_real_data: bool,
    ) -> Result<CurrentPriceResponse, ClientError> {
        let code = self.validate_stock_code(code, "/stocks/{code}/current")?;
        let path = format!("/stocks/{}/current", code);
        let query = [("use_real_data", use_real_data.to_string())];
        let body = self.fetch("current price", &path, &query).await?;
        self.decode_body(&path, &query, &body)
    }

    /// Fetches daily bars via `GET /stocks/{code}/history`.
    ///
    /// Cached in `price_history` under `history:{code}:{days}:{real|mock}`.
    pub async fn get_price_history(
        &self,
        code: &str,
        days: u32,
        use_real_data: bool,
    ) -> Result<Vec<PriceHistoryPoint>, ClientError> {
        let code = self.validate_stock_code(code, "/stocks/{code}/history")?;
        let days = validation::validate_history_days(days).map_err(|e| self.reject(e, None))?;

        let cache_key = format!("history:{}:{}:{}", code, days, data_mode(use_real_data));
        if let Some(hit) = self.cached(self.caches.price_history.as_ref(), &cache_key) {
            return Ok(hit);
        }

        let path = format!("/stocks/{}/history", code);
        let query = [
            ("days", days.to_string()),
            ("use_real_data", use_real_data.to_string()),
        ];
        let body = self.fetch("price history", &path, &query).await?;
        let points: Vec<PriceHistoryPoint> = self.decode_list_body(&path, &query, &body)?;

        self.store(self.caches.price_history.as_ref(), cache_key, &points);
        Ok(points)
    }

    /// Fetches today's picks via `GET /recommendations/today`.
    ///
    /// Cached in `recommendations` under `recommendations:{limit}`.
    pub async fn get_recommendations(
        &self,
        limit: u32,
    ) -> Result<Vec<Recommendation>, ClientError> {
        let limit = validation::validate_limit(limit).map_err(|e| self.reject(e, None))?;

        let cache_key = format!("recommendations:{}", limit);
        if let Some(hit) = self.cached(self.caches.recommendations.as_ref(), &cache_key) {
            return Ok(hit);
        }

        let path = "/recommendations/today";
        let query = [("limit", limit.to_string())];
        let body = self.fetch("recommendations", path, &query).await?;
        let recs: Vec<Recommendation> = self.decode_list_body(path, &query, &body)?;

        self.store(self.caches.recommendations.as_ref(), cache_key, &recs);
        Ok(recs)
    }

    /// Fetches snapshots for several codes, one after another.
    ///
    /// Every code is validated first; a single bad code fails the call
    /// before any request is made. After that, each code gets its own
    /// result so one failing ticker does not hide the rest.
    pub async fn get_watchlist<S: AsRef<str>>(
        &self,
        codes: &[S],
        use_real_data: bool,
    ) -> Result<Vec<WatchlistEntry>, ClientError> {
        let codes = validation::validate_watchlist(codes).map_err(|e| self.reject(e, None))?;
        let mut entries = Vec::with_capacity(codes.len());
        for code in codes {
            let result = self.fetch_stock_data(&code, use_real_data).await;
            if let Err(ref e) = result {
                tracing::warn!("watchlist entry {} failed: {}", code, e);
            }
            entries.push(WatchlistEntry { code, result });
        }
        Ok(entries)
    }

    /// `GET /health`. The body is returned as the server sent it, keys in
    /// their original order. Numbers go through `f64`/`i64`, so a float
    /// literal may be re-rendered with a different spelling of the same value.
    pub async fn health_check(&self) -> Result<serde_json::Value, ClientError> {
        let path = "/health";
        let body = self.fetch("health", path, &[]).await?;
        serde_json::from_str(&body).map_err(|e| {
            self.reject(
                ValidationError::MalformedResponse {
                    endpoint: self.url_for(path, &[]),
                    reason: DecodeError::InvalidJson(e.to_string()),
                },
                Some(self.request_info(path, &[])),
            )
        })
    }

    /// Empties all three caches.
    pub fn clear_cache(&self) {
        self.caches.stock_data.clear();
        self.caches.price_history.clear();
        self.caches.recommendations.clear();
        tracing::debug!("cleared stock data, price history and recommendation caches");
    }

    pub fn cache_stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            stock_data: self.caches.stock_data.stats(),
            price_history: self.caches.price_history.stats(),
            recommendations: self.caches.recommendations.stats(),
        }
    }

    // -- internals --

    fn validate_stock_code(&self, code: &str, endpoint: &str) -> Result<StockCode, ClientError> {
        validation::validate_stock_code(code).map_err(|e| {
            tracing::debug!("rejected stock code {:?} for {}", code, endpoint);
            self.reject(e, None)
        })
    }

    /// Logs a validation failure and wraps it for the caller.
    fn reject(&self, err: ValidationError, request: Option<RequestInfo>) -> ClientError {
        self.errors.record(&ErrorRecord::new(
            ErrorCategory::Validation,
            ErrorSeverity::Low,
            request,
            err.to_string(),
        ));
        ClientError::Validation(err)
    }

    async fn fetch(
        &self,
        label: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<String, ClientError> {
        self.policy
            .run(
                label,
                || self.inner.get(path, query),
                |failure| self.errors.record(&attempt_record(failure)),
            )
            .await
            .map_err(|exhausted| {
                let err = StockApiError::from_transport(&exhausted.error, exhausted.attempts);
                tracing::error!(
                    "{} request gave up after {} attempt(s): {}",
                    label,
                    exhausted.attempts,
                    err
                );
                ClientError::Api(err)
            })
    }

    fn decode_body<T: Schema>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &str,
    ) -> Result<T, ClientError> {
        decode::<T>(body).map_err(|reason| self.malformed(path, query, reason))
    }

    fn decode_list_body<T: Schema>(
        &self,
        path: &str,
        query: &[(&str, String)],
        body: &str,
    ) -> Result<Vec<T>, ClientError> {
        decode_list::<T>(body).map_err(|reason| self.malformed(path, query, reason))
    }

    fn malformed(&self, path: &str, query: &[(&str, String)], reason: DecodeError) -> ClientError {
        self.reject(
            ValidationError::MalformedResponse {
                endpoint: self.url_for(path, query),
                reason,
            },
            Some(self.request_info(path, query)),
        )
    }

    /// Reads and decodes a cache entry. An entry that no longer decodes is
    /// logged, dropped and treated as a miss.
    fn cached<T: DeserializeOwned>(&self, cache: &dyn ResponseCache, key: &str) -> Option<T> {
        let raw = cache.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => {
                tracing::debug!("cache hit {}", key);
                Some(value)
            }
            Err(e) => {
                self.errors.record(&ErrorRecord::new(
                    ErrorCategory::Cache,
                    ErrorSeverity::Low,
                    None,
                    format!("discarding unreadable cache entry {}: {}", key, e),
                ));
                cache.invalidate(key);
                None
            }
        }
    }

    fn store<T: Serialize>(&self, cache: &dyn ResponseCache, key: String, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => cache.set(key, json),
            Err(e) => self.errors.record(&ErrorRecord::new(
                ErrorCategory::Cache,
                ErrorSeverity::Low,
                None,
                format!("failed to serialize cache entry {}: {}", key, e),
            )),
        }
    }

    fn url_for(&self, path: &str, query: &[(&str, String)]) -> String {
        self.inner
            .get_url(path, query)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| format!("{}{}", self.inner.base_url(), path))
    }

    fn request_info(&self, path: &str, query: &[(&str, String)]) -> RequestInfo {
        RequestInfo {
            method: stockdash_api::Method::Get,
            url: self.url_for(path, query),
        }
    }
}

fn data_mode(use_real_data: bool) -> &'static str {
    if use_real_data {
        "real"
    } else {
        "mock"
    }
}

/// Maps a failed attempt to its category and severity.
///
/// Transient failures are logged one step milder while a retry is still pending.
fn attempt_record(failure: &AttemptFailure<'_>) -> ErrorRecord {
    use stockdash_api::Error;

    let (category, severity, request) = match failure.error {
        Error::Network { method, url, .. } => (
            ErrorCategory::Network,
            if failure.will_retry {
                ErrorSeverity::Medium
            } else {
                ErrorSeverity::High
            },
            Some(RequestInfo {
                method: *method,
                url: url.clone(),
            }),
        ),
        Error::HttpStatus {
            status,
            method,
            url,
            ..
        } => {
            let severity = match (*status >= 500, failure.will_retry) {
                (true, true) => ErrorSeverity::High,
                (true, false) => ErrorSeverity::Critical,
                (false, _) => ErrorSeverity::Medium,
            };
            (
                ErrorCategory::Server,
                severity,
                Some(RequestInfo {
                    method: *method,
                    url: url.clone(),
                }),
            )
        }
        Error::InvalidUrl(_) | Error::ClientBuild(_) => {
            (ErrorCategory::Network, ErrorSeverity::Critical, None)
        }
    };
    ErrorRecord::new(
        category,
        severity,
        request,
        format!("attempt {}: {}", failure.attempt, failure.error),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdash_api::{Error, Method};

    fn failure_record(error: Error, will_retry: bool) -> ErrorRecord {
        attempt_record(&AttemptFailure {
            error: &error,
            attempt: 1,
            will_retry,
        })
    }

    #[test]
    fn network_severity_depends_on_retry() {
        let err = || Error::Network {
            method: Method::Get,
            url: "http://x/health".to_string(),
            message: "reset".to_string(),
            timed_out: false,
        };
        let pending = failure_record(err(), true);
        assert_eq!(pending.category, ErrorCategory::Network);
        assert_eq!(pending.severity, ErrorSeverity::Medium);
        assert_eq!(failure_record(err(), false).severity, ErrorSeverity::High);
    }

    #[test]
    fn server_errors_escalate_when_terminal() {
        let err = |status| Error::HttpStatus {
            status,
            message: "x".to_string(),
            method: Method::Get,
            url: "http://x/stocks/7203".to_string(),
        };
        assert_eq!(failure_record(err(500), true).severity, ErrorSeverity::High);
        assert_eq!(failure_record(err(500), false).severity, ErrorSeverity::Critical);
        let client = failure_record(err(404), false);
        assert_eq!(client.category, ErrorCategory::Server);
        assert_eq!(client.severity, ErrorSeverity::Medium);
        assert_eq!(
            client.request.unwrap().url,
            "http://x/stocks/7203".to_string()
        );
    }

    #[test]
    fn data_mode_labels() {
        assert_eq!(data_mode(true), "real");
        assert_eq!(data_mode(false), "mock");
    }
}
