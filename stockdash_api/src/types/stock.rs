//! Stock snapshot types returned by the `/stocks/{code}` endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::{FieldKind, Schema};
use crate::StockCode;

/// Full snapshot of a security, returned by `GET /stocks/{code}`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct StockData {
    pub stock_code: StockCode,
    pub company_name: String,
    pub current_price: f64,
    pub previous_close: f64,
    /// Absolute change from the previous close.
    pub price_change: f64,
    /// Change from the previous close, in percent.
    pub price_change_pct: f64,
    pub day_high: f64,
    pub day_low: f64,
    /// 52-week high.
    pub year_high: f64,
    /// 52-week low.
    pub year_low: f64,
    pub volume: i64,
    /// Market capitalization in yen. Not reported for every issue.
    #[serde(default)]
    pub market_cap: Option<f64>,
    /// Server timestamp of the snapshot (ISO 8601).
    pub last_updated: String,
}

impl Schema for StockData {
    const NAME: &'static str = "StockData";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("stock_code", FieldKind::String),
        ("company_name", FieldKind::String),
        ("current_price", FieldKind::Number),
        ("previous_close", FieldKind::Number),
        ("price_change", FieldKind::Number),
        ("price_change_pct", FieldKind::Number),
        ("day_high", FieldKind::Number),
        ("day_low", FieldKind::Number),
        ("year_high", FieldKind::Number),
        ("year_low", FieldKind::Number),
        ("volume", FieldKind::Integer),
        ("last_updated", FieldKind::String),
    ];
}

/// Trading session state reported alongside a live price.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MarketStatus {
    Open,
    Closed,
    PreMarket,
    AfterHours,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for MarketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MarketStatus::Open => "open",
            MarketStatus::Closed => "closed",
            MarketStatus::PreMarket => "pre_market",
            MarketStatus::AfterHours => "after_hours",
            MarketStatus::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

/// Live price, returned by `GET /stocks/{code}/current`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CurrentPriceResponse {
    pub stock_code: StockCode,
    pub current_price: f64,
    pub previous_close: f64,
    pub price_change: f64,
    pub price_change_pct: f64,
    pub timestamp: String,
    pub market_status: MarketStatus,
}

impl Schema for CurrentPriceResponse {
    const NAME: &'static str = "CurrentPriceResponse";
    const FIELDS: &'static [(&'static str, FieldKind)] = &[
        ("stock_code", FieldKind::String),
        ("current_price", FieldKind::Number),
        ("previous_close", FieldKind::Number),
        ("price_change", FieldKind::Number),
        ("price_change_pct", FieldKind::Number),
        ("timestamp", FieldKind::String),
        ("market_status", FieldKind::String),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{decode, DecodeError};

    #[test]
    fn unknown_market_status_decodes() {
        let status: MarketStatus = serde_json::from_str("\"lunch_break\"").unwrap();
        assert_eq!(status, MarketStatus::Unknown);
        let status: MarketStatus = serde_json::from_str("\"pre_market\"").unwrap();
        assert_eq!(status, MarketStatus::PreMarket);
        assert_eq!(MarketStatus::AfterHours.to_string(), "after_hours");
    }

    #[test]
    fn bad_stock_code_in_body_is_a_shape_error() {
        let body = serde_json::json!({
            "stock_code": "72O3",
            "current_price": 1.0,
            "previous_close": 1.0,
            "price_change": 0.0,
            "price_change_pct": 0.0,
            "timestamp": "2024-01-01T00:00:00",
            "market_status": "open"
        })
        .to_string();
        let err = decode::<CurrentPriceResponse>(&body).unwrap_err();
        assert!(matches!(err, DecodeError::Shape { .. }));
    }
}
