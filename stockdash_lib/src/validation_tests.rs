use super::*;

// -- Stock code validation --

#[test]
fn code_valid() {
    assert_eq!(validate_stock_code("7203").unwrap().as_str(), "7203");
}

#[test]
fn code_leading_zeros() {
    assert_eq!(validate_stock_code("0001").unwrap().as_str(), "0001");
}

#[test]
fn code_empty() {
    assert!(validate_stock_code("").is_err());
}

#[test]
fn code_three_digits() {
    assert!(validate_stock_code("720").is_err());
}

#[test]
fn code_five_digits() {
    assert!(validate_stock_code("72030").is_err());
}

#[test]
fn code_alphabetic() {
    assert!(validate_stock_code("ABCD").is_err());
}

#[test]
fn code_padded_with_whitespace() {
    assert!(validate_stock_code(" 7203").is_err());
    assert!(validate_stock_code("7203\n").is_err());
}

#[test]
fn code_with_suffix() {
    assert!(validate_stock_code("7203.T").is_err());
}

#[test]
fn code_error_variant() {
    assert!(matches!(
        validate_stock_code("abc"),
        Err(ValidationError::InvalidStockCode(_))
    ));
}

// -- History days --

#[test]
fn days_bounds() {
    assert_eq!(validate_history_days(1).unwrap(), 1);
    assert_eq!(validate_history_days(MAX_HISTORY_DAYS).unwrap(), MAX_HISTORY_DAYS);
}

#[test]
fn days_zero() {
    assert!(matches!(
        validate_history_days(0),
        Err(ValidationError::InvalidParameter { name: "days", .. })
    ));
}

#[test]
fn days_too_large() {
    assert!(validate_history_days(MAX_HISTORY_DAYS + 1).is_err());
}

// -- Recommendation limit --

#[test]
fn limit_bounds() {
    assert_eq!(validate_limit(1).unwrap(), 1);
    assert_eq!(validate_limit(MAX_RECOMMENDATIONS).unwrap(), MAX_RECOMMENDATIONS);
}

#[test]
fn limit_out_of_range() {
    assert!(validate_limit(0).is_err());
    assert!(validate_limit(MAX_RECOMMENDATIONS + 1).is_err());
}

// -- Watchlist --

#[test]
fn watchlist_valid() {
    let codes = validate_watchlist(&["7203", "6758", "9984"]).unwrap();
    let as_str: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
    assert_eq!(as_str, vec!["7203", "6758", "9984"]);
}

#[test]
fn watchlist_one_bad_code_fails_all() {
    assert!(matches!(
        validate_watchlist(&["7203", "67X8"]),
        Err(ValidationError::InvalidStockCode(_))
    ));
}

#[test]
fn watchlist_empty() {
    let empty: [&str; 0] = [];
    assert!(validate_watchlist(&empty).is_err());
}

#[test]
fn watchlist_too_long() {
    let codes: Vec<String> = (0..=MAX_WATCHLIST_SIZE).map(|i| format!("{:04}", i)).collect();
    assert!(validate_watchlist(codes.as_slice()).is_err());
}
