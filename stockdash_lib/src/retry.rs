//! Fixed-delay retry loop and the table deciding which failures are transient.

use std::future::Future;
use std::time::Duration;

use stockdash_api::Error;

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// Transient: try again if attempts remain.
    Retry,
    /// Terminal: surface immediately.
    Fail,
}

/// Classifies a transport failure.
///
/// | failure                       | disposition |
/// |-------------------------------|-------------|
/// | network error or timeout      | Retry       |
/// | HTTP 5xx                      | Retry       |
/// | HTTP 4xx (or any other status)| Fail        |
/// | invalid URL / client build    | Fail        |
pub fn classify(err: &Error) -> Disposition {
    match err {
        Error::Network { .. } => Disposition::Retry,
        Error::HttpStatus { status, .. } if *status >= 500 => Disposition::Retry,
        Error::HttpStatus { .. } => Disposition::Fail,
        Error::InvalidUrl(_) | Error::ClientBuild(_) => Disposition::Fail,
    }
}

/// A failed attempt, reported to the observer before the loop decides.
pub struct AttemptFailure<'a> {
    pub error: &'a Error,
    /// 1-based attempt number.
    pub attempt: u32,
    pub will_retry: bool,
}

/// The last failure once the loop gives up.
#[derive(Debug)]
pub struct RetryExhausted {
    pub error: Error,
    pub attempts: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Additional attempts after the first.
    pub retries: u32,
    /// Fixed wait between attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    pub fn new(retries: u32, delay: Duration) -> Self {
        Self { retries, delay }
    }

    pub fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }

    /// Runs `f` until it succeeds, fails terminally, or attempts run out.
    /// `on_failure` sees every failed attempt, including ones that are retried.
    pub async fn run<T, F, Fut, O>(
        &self,
        label: &str,
        mut f: F,
        mut on_failure: O,
    ) -> Result<T, RetryExhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, Error>>,
        O: FnMut(&AttemptFailure<'_>),
    {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match f().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::info!("{} succeeded on attempt {}", label, attempt);
                    }
                    return Ok(value);
                }
                Err(error) => {
                    let will_retry =
                        classify(&error) == Disposition::Retry && attempt < self.max_attempts();
                    on_failure(&AttemptFailure {
                        error: &error,
                        attempt,
                        will_retry,
                    });
                    if !will_retry {
                        return Err(RetryExhausted {
                            error,
                            attempts: attempt,
                        });
                    }
                    tracing::warn!(
                        "{} request failed (attempt {}/{}), retrying in {}ms: {}",
                        label,
                        attempt,
                        self.max_attempts(),
                        self.delay.as_millis(),
                        error
                    );
                    tokio::time::sleep(self.delay).await;
                }
            }
        }
    }
}
