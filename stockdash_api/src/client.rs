//! HTTP transport for the stock dashboard backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use url::Url;

use crate::{
    hooks::{PassThrough, RequestContext, RequestHook, ResponseHook},
    Error, Method,
};

/// Timeout used by [`Client::with_base_url`].
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings fixed at construction.
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Base URL every request path is appended to, e.g. `http://localhost:8000/api`.
    pub base_url: String,
    /// Upper bound for a single attempt.
    pub timeout: Duration,
}

/// HTTP transport for the stock API.
///
/// Each call to [`Client::get`] is exactly one attempt: retries, caching
/// and response validation belong to the caller. The underlying
/// `reqwest::Client` is built once and reused, with JSON `Content-Type`
/// and `Accept` headers on every request.
#[derive(Clone)]
pub struct Client {
    http: reqwest::Client,
    base_api_url: String,
    request_hook: Arc<dyn RequestHook>,
    response_hook: Arc<dyn ResponseHook>,
}

impl Client {
    /// Creates a transport from the given configuration with pass-through hooks.
    pub fn new(config: &TransportConfig) -> Result<Self, Error> {
        Url::parse(&config.base_url)
            .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                tracing::error!("Failed to build HTTP client: {}", e);
                Error::ClientBuild(e.to_string())
            })?;

        Ok(Self {
            http,
            base_api_url: config.base_url.trim_end_matches('/').to_string(),
            request_hook: Arc::new(PassThrough),
            response_hook: Arc::new(PassThrough),
        })
    }

    /// Creates a transport with a custom base URL and the default timeout. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::new(&TransportConfig {
            base_url: base_url.to_string(),
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replaces the request interceptor.
    pub fn with_request_hook(mut self, hook: impl RequestHook + 'static) -> Self {
        self.request_hook = Arc::new(hook);
        self
    }

    /// Replaces the response interceptor.
    pub fn with_response_hook(mut self, hook: impl ResponseHook + 'static) -> Self {
        self.response_hook = Arc::new(hook);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_api_url
    }

    /// Builds the absolute URL for `path` with the given query pairs.
    pub fn get_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url, Error> {
        let mut url = Url::parse(format!("{}{}", &self.base_api_url, path).as_str())
            .map_err(|e| {
                tracing::error!("Invalid URL constructed: {}", e);
                Error::InvalidUrl(format!("{}{}: {}", self.base_api_url, path, e))
            })?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Sends one GET request and returns the raw body of a 2xx response.
    pub async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<String, Error> {
        let url = self.get_url(path, query)?;
        let ctx = RequestContext {
            method: Method::Get,
            url: url.to_string(),
        };

        let request = self.request_hook.on_request(&ctx, self.http.get(url));
        let started = Instant::now();
        let resp = match request.send().await {
            Ok(resp) => resp,
            Err(e) => {
                self.response_hook.on_response(&ctx, None, started.elapsed());
                return Err(network_error(&ctx, e));
            }
        };

        let status = resp.status();
        self.response_hook
            .on_response(&ctx, Some(status.as_u16()), started.elapsed());

        let body = resp.text().await.map_err(|e| network_error(&ctx, e))?;

        if !status.is_success() {
            let message = server_message(&body)
                .unwrap_or_else(|| fallback_message(status, &body));
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                message,
                method: ctx.method,
                url: ctx.url,
            });
        }

        Ok(body)
    }
}

fn network_error(ctx: &RequestContext, e: reqwest::Error) -> Error {
    Error::Network {
        method: ctx.method,
        url: ctx.url.clone(),
        message: e.to_string(),
        timed_out: e.is_timeout(),
    }
}

/// Pulls a human-readable message out of a JSON error body.
///
/// Looks at `detail`, then `message`, then `error`. Non-string values are
/// rendered as compact JSON.
fn server_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| object.get(*key))
        .map(|v| match v.as_str() {
            Some(s) => s.to_string(),
            None => v.to_string(),
        })
}

fn fallback_message(status: reqwest::StatusCode, body: &str) -> String {
    if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown status")
            .to_string()
    } else {
        truncate_body(body)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...[truncated]", &body[..end])
    }
}
