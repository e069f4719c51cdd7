//! Error records and the sinks they are forwarded to.
//!
//! Every failure the client sees, retried or not, becomes an [`ErrorRecord`]
//! handed to an [`ErrorSink`]. Sinks are fire-and-forget: they never return
//! errors and never influence the caller's control flow.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::Serialize;
use stockdash_api::Method;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Network,
    Validation,
    Cache,
    Server,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Cache => "cache",
            ErrorCategory::Server => "server",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorSeverity::Low => "low",
            ErrorSeverity::Medium => "medium",
            ErrorSeverity::High => "high",
            ErrorSeverity::Critical => "critical",
        };
        write!(f, "{}", s)
    }
}

/// The request an error originated from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    #[serde(serialize_with = "serialize_method")]
    pub method: Method,
    pub url: String,
}

fn serialize_method<S: serde::Serializer>(method: &Method, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(method)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ErrorRecord {
    pub category: ErrorCategory,
    pub severity: ErrorSeverity,
    /// `None` when the failure happened before a request existed (bad input).
    pub request: Option<RequestInfo>,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorRecord {
    pub fn new(
        category: ErrorCategory,
        severity: ErrorSeverity,
        request: Option<RequestInfo>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            severity,
            request,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.category, self.severity)?;
        if let Some(req) = &self.request {
            write!(f, " {} {}", req.method, req.url)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Receives error records. Must not panic.
pub trait ErrorSink: Send + Sync {
    fn record(&self, record: &ErrorRecord);
}

/// Emits each record as a `tracing` event; level follows severity.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingErrorSink;

impl ErrorSink for TracingErrorSink {
    fn record(&self, record: &ErrorRecord) {
        match record.severity {
            ErrorSeverity::Low => tracing::info!("{}", record),
            ErrorSeverity::Medium => tracing::warn!("{}", record),
            ErrorSeverity::High | ErrorSeverity::Critical => tracing::error!("{}", record),
        }
    }
}

/// Keeps the most recent records in memory.
pub struct MemoryErrorSink {
    records: Mutex<VecDeque<ErrorRecord>>,
    capacity: usize,
}

impl MemoryErrorSink {
    /// Creates a sink that retains at most `capacity` records, dropping the oldest.
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
            capacity,
        }
    }

    /// Returns a copy of the retained records, oldest first.
    pub fn records(&self) -> Vec<ErrorRecord> {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

impl Default for MemoryErrorSink {
    fn default() -> Self {
        Self::new(100)
    }
}

impl ErrorSink for MemoryErrorSink {
    fn record(&self, record: &ErrorRecord) {
        if self.capacity == 0 {
            return;
        }
        let mut records = self.records.lock().unwrap_or_else(|e| e.into_inner());
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record.clone());
    }
}

/// Forwards every record to several sinks in order.
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ErrorSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn ErrorSink>>) -> Self {
        Self { sinks }
    }
}

impl ErrorSink for FanoutSink {
    fn record(&self, record: &ErrorRecord) {
        for sink in &self.sinks {
            sink.record(record);
        }
    }
}
