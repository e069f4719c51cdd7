use stockdash_api::StockCode;

use crate::error::ValidationError;

pub const MAX_HISTORY_DAYS: u32 = 3650;
pub const MAX_RECOMMENDATIONS: u32 = 100;
pub const MAX_WATCHLIST_SIZE: usize = 50;

/// Validate a stock code: exactly four ASCII digits, no trimming.
pub fn validate_stock_code(input: &str) -> Result<StockCode, ValidationError> {
    Ok(StockCode::parse(input)?)
}

/// Validate the look-back window for price history, in days.
pub fn validate_history_days(days: u32) -> Result<u32, ValidationError> {
    if days == 0 || days > MAX_HISTORY_DAYS {
        return Err(ValidationError::InvalidParameter {
            name: "days",
            reason: format!("must be between 1 and {}, got {}", MAX_HISTORY_DAYS, days),
        });
    }
    Ok(days)
}

/// Validate the number of recommendations requested.
pub fn validate_limit(limit: u32) -> Result<u32, ValidationError> {
    if limit == 0 || limit > MAX_RECOMMENDATIONS {
        return Err(ValidationError::InvalidParameter {
            name: "limit",
            reason: format!(
                "must be between 1 and {}, got {}",
                MAX_RECOMMENDATIONS, limit
            ),
        });
    }
    Ok(limit)
}

/// Validate every code in a watchlist. The first bad code fails the whole list.
pub fn validate_watchlist<S: AsRef<str>>(codes: &[S]) -> Result<Vec<StockCode>, ValidationError> {
    if codes.is_empty() {
        return Err(ValidationError::InvalidParameter {
            name: "codes",
            reason: "watchlist is empty".to_string(),
        });
    }
    if codes.len() > MAX_WATCHLIST_SIZE {
        return Err(ValidationError::InvalidParameter {
            name: "codes",
            reason: format!(
                "watchlist holds at most {} codes, got {}",
                MAX_WATCHLIST_SIZE,
                codes.len()
            ),
        });
    }
    codes
        .iter()
        .map(|c| validate_stock_code(c.as_ref()))
        .collect()
}

#[cfg(test)]
#[path = "validation_tests.rs"]
mod tests;
