mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stockdash_lib::{
    ApiCaches, ApiClientConfig, ErrorSink, FanoutSink, MemoryErrorSink, StockApiClient,
    TracingErrorSink,
};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "stockdash")]
#[command(about = "Query quotes, price history and recommendations from the stock dashboard API")]
struct Cli {
    /// Output format: table, json, csv, markdown
    #[arg(long, default_value = "table", global = true)]
    output: String,

    /// TOML config file (base_url, timeout_ms, retries, retry_delay_ms)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// API base URL, overrides config file and STOCKDASH_API_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Ask the backend for mock data instead of live market data
    #[arg(long, global = true)]
    mock_data: bool,

    /// Print recorded errors to stderr after the command
    #[arg(long, global = true)]
    show_errors: bool,

    /// Print cache statistics after the command
    #[arg(long, global = true)]
    cache_stats: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full snapshot for one stock
    Quote(commands::quote::QuoteArgs),
    /// Live price for one stock
    Price(commands::price::PriceArgs),
    /// Daily price history for one stock
    History(commands::history::HistoryArgs),
    /// Today's recommended stocks
    Recommendations(commands::recommendations::RecommendationsArgs),
    /// Snapshots for several stocks
    Watchlist(commands::watchlist::WatchlistArgs),
    /// Backend health check
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stockdash=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);
    let use_real_data = !cli.mock_data;

    let mut config = ApiClientConfig::load(cli.config.as_deref())?;
    if let Some(ref base_url) = cli.base_url {
        config.base_url = base_url.clone();
    }
    tracing::debug!(
        "API {} (timeout {}ms, {} retries)",
        config.base_url,
        config.timeout_ms,
        config.retries
    );

    let recorded = Arc::new(MemoryErrorSink::default());
    let sink = FanoutSink::new(vec![
        Arc::new(TracingErrorSink) as Arc<dyn ErrorSink>,
        recorded.clone() as Arc<dyn ErrorSink>,
    ]);
    let client = StockApiClient::new(&config, ApiCaches::default(), Arc::new(sink))?;

    let result = match &cli.command {
        Commands::Quote(args) => commands::quote::run(args, &client, format, use_real_data).await,
        Commands::Price(args) => commands::price::run(args, &client, format, use_real_data).await,
        Commands::History(args) => {
            commands::history::run(args, &client, format, use_real_data).await
        }
        Commands::Recommendations(args) => {
            commands::recommendations::run(args, &client, format).await
        }
        Commands::Watchlist(args) => {
            commands::watchlist::run(args, &client, format, use_real_data).await
        }
        Commands::Health => commands::health::run(&client, format).await,
    };

    if cli.show_errors {
        for record in recorded.records() {
            eprintln!("{}", record);
        }
    }
    if cli.cache_stats {
        output::print_cache_stats(&client.cache_stats(), format)?;
    }

    result
}
