//! Stock code newtype for exchange tickers of the form `^\d{4}$` (e.g. `7203`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reasons a string is not a stock code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StockCodeError {
    #[error("stock code is empty")]
    Empty,
    #[error("stock code '{0}' must be exactly 4 characters")]
    WrongLength(String),
    #[error("stock code '{0}' must contain only ASCII digits")]
    NotNumeric(String),
}

/// A validated 4-digit stock code.
///
/// The only way to obtain one is [`StockCode::parse`] (or its `FromStr` /
/// `TryFrom` equivalents), so every value is known to be well formed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StockCode(String);

impl StockCode {
    pub fn parse(input: &str) -> Result<Self, StockCodeError> {
        if input.is_empty() {
            return Err(StockCodeError::Empty);
        }
        // Length is checked on chars so multi-byte digits report as non-numeric below.
        if input.chars().count() != 4 {
            return Err(StockCodeError::WrongLength(input.to_string()));
        }
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StockCodeError::NotNumeric(input.to_string()));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StockCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StockCode {
    type Err = StockCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StockCode {
    type Error = StockCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StockCode> for String {
    fn from(code: StockCode) -> Self {
        code.0
    }
}

impl AsRef<str> for StockCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_four_digits() {
        assert_eq!(StockCode::parse("7203").unwrap().as_str(), "7203");
        assert_eq!(StockCode::parse("0001").unwrap().to_string(), "0001");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(StockCode::parse(""), Err(StockCodeError::Empty));
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(matches!(
            StockCode::parse("720"),
            Err(StockCodeError::WrongLength(_))
        ));
        assert!(matches!(
            StockCode::parse("72030"),
            Err(StockCodeError::WrongLength(_))
        ));
    }

    #[test]
    fn rejects_non_digits() {
        assert!(matches!(
            StockCode::parse("ABCD"),
            Err(StockCodeError::NotNumeric(_))
        ));
        assert!(matches!(
            StockCode::parse("72 3"),
            Err(StockCodeError::NotNumeric(_))
        ));
        // Full-width digits are not ASCII.
        assert!(matches!(
            StockCode::parse("\u{FF17}203"),
            Err(StockCodeError::NotNumeric(_))
        ));
    }

    #[test]
    fn deserialize_validates() {
        let ok: StockCode = serde_json::from_str("\"6758\"").unwrap();
        assert_eq!(ok.as_str(), "6758");
        assert!(serde_json::from_str::<StockCode>("\"67a8\"").is_err());
    }
}
