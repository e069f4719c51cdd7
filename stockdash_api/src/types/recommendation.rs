//! Daily recommendation entries.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, Schema};
use crate::StockCode;

/// A ranked pick from `GET /recommendations/today`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Recommendation {
    /// 1-based position in today's list.
    pub rank: i64,
    pub stock_code: StockCode,
    pub company_name: String,
    pub current_price: f64,
    pub target_price: f64,
    /// Expected return to target, in percent.
    pub expected_return: f64,
    /// Model confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub reason: String,
}

impl Schema for Recommendation {
    const NAME: &'static str = "Recommendation";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("rank", FieldKind::Integer),
        ("stock_code", FieldKind::String),
        ("company_name", FieldKind::String),
        ("current_price", FieldKind::Number),
        ("target_price", FieldKind::Number),
        ("expected_return", FieldKind::Number),
        ("confidence", FieldKind::Number),
        ("reason", FieldKind::String),
    ];
}
