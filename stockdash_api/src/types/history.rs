use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, Schema};

/// One daily OHLCV bar from `GET /stocks/{code}/history`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PriceHistoryPoint {
    /// Trading date, `YYYY-MM-DD`.
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl Schema for PriceHistoryPoint {
    const NAME: &'static str = "PriceHistoryPoint";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("date", FieldKind::String),
        ("open", FieldKind::Number),
        ("high", FieldKind::Number),
        ("low", FieldKind::Number),
        ("close", FieldKind::Number),
        ("volume", FieldKind::Integer),
    ];
}
