//! Request/response interceptors installed on the transport.
//!
//! Both hooks run on every attempt. The request hook may decorate the
//! outgoing request (auth or tracing headers); the response hook only
//! observes. Neither can change the outcome of an attempt.

use std::time::Duration;

use reqwest::RequestBuilder;

use crate::errors::Method;

/// Identifies the request an interceptor is looking at.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub method: Method,
    pub url: String,
}

/// Called just before a request is sent.
pub trait RequestHook: Send + Sync {
    fn on_request(&self, ctx: &RequestContext, request: RequestBuilder) -> RequestBuilder;
}

/// Called once an attempt has finished. `status` is `None` when no HTTP
/// response was received.
pub trait ResponseHook: Send + Sync {
    fn on_response(&self, ctx: &RequestContext, status: Option<u16>, elapsed: Duration);
}

/// Default interceptor: forwards the request untouched and logs the outcome.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

impl RequestHook for PassThrough {
    fn on_request(&self, ctx: &RequestContext, request: RequestBuilder) -> RequestBuilder {
        tracing::debug!("{} {}", ctx.method, ctx.url);
        request
    }
}

impl ResponseHook for PassThrough {
    fn on_response(&self, ctx: &RequestContext, status: Option<u16>, elapsed: Duration) {
        match status {
            Some(status) => tracing::debug!(
                "{} {} -> {} in {}ms",
                ctx.method,
                ctx.url,
                status,
                elapsed.as_millis()
            ),
            None => tracing::debug!(
                "{} {} -> no response after {}ms",
                ctx.method,
                ctx.url,
                elapsed.as_millis()
            ),
        }
    }
}
