use anyhow::Result;
use serde::Serialize;
use stockdash_lib::types::{CurrentPriceResponse, PriceHistoryPoint, Recommendation, StockData};
use stockdash_lib::{CacheStatsReport, WatchlistEntry};
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

impl OutputFormat {
    /// Unknown names fall back to a table.
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => OutputFormat::Json,
            "csv" => OutputFormat::Csv,
            "markdown" | "md" => OutputFormat::Markdown,
            _ => OutputFormat::Table,
        }
    }
}

#[derive(Tabled, Serialize)]
struct StockRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Day Range")]
    #[serde(rename = "Day Range")]
    day_range: String,
    #[tabled(rename = "52w Range")]
    #[serde(rename = "52w Range")]
    year_range: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Market Cap")]
    #[serde(rename = "Market Cap")]
    market_cap: String,
    #[tabled(rename = "Updated")]
    #[serde(rename = "Updated")]
    updated: String,
}

#[derive(Tabled, Serialize)]
struct PriceRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Prev Close")]
    #[serde(rename = "Prev Close")]
    previous_close: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Market")]
    #[serde(rename = "Market")]
    market: String,
    #[tabled(rename = "Time")]
    #[serde(rename = "Time")]
    timestamp: String,
}

#[derive(Tabled, Serialize)]
struct HistoryRow {
    #[tabled(rename = "Date")]
    #[serde(rename = "Date")]
    date: String,
    #[tabled(rename = "Open")]
    #[serde(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    #[serde(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    #[serde(rename = "Low")]
    low: String,
    #[tabled(rename = "Close")]
    #[serde(rename = "Close")]
    close: String,
    #[tabled(rename = "Volume")]
    #[serde(rename = "Volume")]
    volume: String,
}

#[derive(Tabled, Serialize)]
struct RecommendationRow {
    #[tabled(rename = "Rank")]
    #[serde(rename = "Rank")]
    rank: i64,
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Target")]
    #[serde(rename = "Target")]
    target: String,
    #[tabled(rename = "Return")]
    #[serde(rename = "Return")]
    expected_return: String,
    #[tabled(rename = "Confidence")]
    #[serde(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Reason")]
    #[serde(rename = "Reason")]
    reason: String,
}

#[derive(Tabled, Serialize)]
struct WatchlistRow {
    #[tabled(rename = "Code")]
    #[serde(rename = "Code")]
    code: String,
    #[tabled(rename = "Company")]
    #[serde(rename = "Company")]
    company: String,
    #[tabled(rename = "Price")]
    #[serde(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    #[serde(rename = "Change")]
    change: String,
    #[tabled(rename = "Error")]
    #[serde(rename = "Error")]
    error: String,
}

#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct CacheRow {
    #[tabled(rename = "Cache")]
    #[serde(rename = "Cache")]
    cache: &'static str,
    #[tabled(rename = "Entries")]
    #[serde(rename = "Entries")]
    entries: String,
    #[tabled(rename = "Hits")]
    #[serde(rename = "Hits")]
    hits: u64,
    #[tabled(rename = "Misses")]
    #[serde(rename = "Misses")]
    misses: u64,
    #[tabled(rename = "TTL")]
    #[serde(rename = "TTL")]
    ttl: String,
}

/// JSON shape of one watchlist entry.
#[derive(Serialize)]
struct WatchlistJson<'a> {
    code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a StockData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

// -- Row builders --

fn build_stock_rows(stocks: &[StockData]) -> Vec<StockRow> {
    stocks
        .iter()
        .map(|s| StockRow {
            code: s.stock_code.to_string(),
            company: s.company_name.clone(),
            price: format_price(s.current_price),
            change: format_change(s.price_change, s.price_change_pct),
            day_range: format!("{} - {}", format_price(s.day_low), format_price(s.day_high)),
            year_range: format!(
                "{} - {}",
                format_price(s.year_low),
                format_price(s.year_high)
            ),
            volume: format_volume(s.volume),
            market_cap: s.market_cap.map(format_large).unwrap_or_else(|| "-".to_string()),
            updated: s.last_updated.clone(),
        })
        .collect()
}

fn build_price_rows(prices: &[CurrentPriceResponse]) -> Vec<PriceRow> {
    prices
        .iter()
        .map(|p| PriceRow {
            code: p.stock_code.to_string(),
            price: format_price(p.current_price),
            previous_close: format_price(p.previous_close),
            change: format_change(p.price_change, p.price_change_pct),
            market: p.market_status.to_string(),
            timestamp: p.timestamp.clone(),
        })
        .collect()
}

fn build_history_rows(points: &[PriceHistoryPoint]) -> Vec<HistoryRow> {
    points
        .iter()
        .map(|p| HistoryRow {
            date: p.date.clone(),
            open: format_price(p.open),
            high: format_price(p.high),
            low: format_price(p.low),
            close: format_price(p.close),
            volume: format_volume(p.volume),
        })
        .collect()
}

fn build_recommendation_rows(recs: &[Recommendation]) -> Vec<RecommendationRow> {
    recs.iter()
        .map(|r| RecommendationRow {
            rank: r.rank,
            code: r.stock_code.to_string(),
            company: r.company_name.clone(),
            price: format_price(r.current_price),
            target: format_price(r.target_price),
            expected_return: format!("{:+.2}%", r.expected_return),
            confidence: format!("{:.0}%", r.confidence * 100.0),
            reason: r.reason.clone(),
        })
        .collect()
}

fn build_watchlist_rows(entries: &[WatchlistEntry]) -> Vec<WatchlistRow> {
    entries
        .iter()
        .map(|e| match &e.result {
            Ok(s) => WatchlistRow {
                code: e.code.to_string(),
                company: s.company_name.clone(),
                price: format_price(s.current_price),
                change: format_change(s.price_change, s.price_change_pct),
                error: String::new(),
            },
            Err(err) => WatchlistRow {
                code: e.code.to_string(),
                company: "-".to_string(),
                price: "-".to_string(),
                change: "-".to_string(),
                error: err.to_string(),
            },
        })
        .collect()
}

fn build_health_rows(health: &serde_json::Value) -> Vec<FieldRow> {
    match health.as_object() {
        Some(map) => map
            .iter()
            .map(|(k, v)| FieldRow {
                field: k.clone(),
                value: match v {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                },
            })
            .collect(),
        None => vec![FieldRow {
            field: "response".to_string(),
            value: health.to_string(),
        }],
    }
}

fn build_cache_rows(report: &CacheStatsReport) -> Vec<CacheRow> {
    [
        ("stock data", &report.stock_data),
        ("price history", &report.price_history),
        ("recommendations", &report.recommendations),
    ]
    .into_iter()
    .map(|(cache, stats)| CacheRow {
        cache,
        entries: format!("{}/{}", stats.size, stats.max_size),
        hits: stats.hits,
        misses: stats.misses,
        ttl: format!("{}s", stats.ttl_secs),
    })
    .collect()
}

// -- Rendering --

fn print_rows<T: Tabled + Serialize>(rows: Vec<T>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => println!("{}", Table::new(rows)),
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Json => print_json(&rows),
    }
    Ok(())
}

pub fn print_stock(stock: &StockData, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(stock);
            Ok(())
        }
        _ => print_rows(build_stock_rows(std::slice::from_ref(stock)), format),
    }
}

pub fn print_price(price: &CurrentPriceResponse, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(price);
            Ok(())
        }
        _ => print_rows(build_price_rows(std::slice::from_ref(price)), format),
    }
}

pub fn print_history(points: &[PriceHistoryPoint], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&points);
            Ok(())
        }
        _ => print_rows(build_history_rows(points), format),
    }
}

pub fn print_recommendations(recs: &[Recommendation], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&recs);
            Ok(())
        }
        _ => print_rows(build_recommendation_rows(recs), format),
    }
}

pub fn print_watchlist(entries: &[WatchlistEntry], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(&watchlist_json(entries));
            Ok(())
        }
        _ => print_rows(build_watchlist_rows(entries), format),
    }
}

pub fn print_health(health: &serde_json::Value, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(health);
            Ok(())
        }
        _ => print_rows(build_health_rows(health), format),
    }
}

pub fn print_cache_stats(report: &CacheStatsReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            print_json(report);
            Ok(())
        }
        _ => print_rows(build_cache_rows(report), format),
    }
}

fn watchlist_json(entries: &[WatchlistEntry]) -> Vec<WatchlistJson<'_>> {
    entries
        .iter()
        .map(|e| WatchlistJson {
            code: e.code.as_str(),
            data: e.result.as_ref().ok(),
            error: e.result.as_ref().err().map(|err| err.to_string()),
        })
        .collect()
}

pub fn print_json<T: Serialize + ?Sized>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

// -- Formatting --

fn format_price(value: f64) -> String {
    format!("{:.2}", value)
}

fn format_change(change: f64, pct: f64) -> String {
    format!("{:+.2} ({:+.2}%)", change, pct)
}

fn format_volume(value: i64) -> String {
    if value >= 1_000_000 {
        format!("{:.1}M", value as f64 / 1_000_000.0)
    } else if value >= 1_000 {
        format!("{:.1}K", value as f64 / 1_000.0)
    } else {
        value.to_string()
    }
}

fn format_large(value: f64) -> String {
    if value >= 1e12 {
        format!("{:.1}T", value / 1e12)
    } else if value >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if value >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else {
        format!("{:.0}", value)
    }
}
