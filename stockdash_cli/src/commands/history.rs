use anyhow::Result;
use clap::Args;
use stockdash_lib::StockApiClient;

use crate::output::{print_history, OutputFormat};

#[derive(Args)]
pub struct HistoryArgs {
    /// Four-digit stock code (e.g. 7203)
    pub code: String,

    /// Number of trailing days to fetch (1-3650)
    #[arg(long, default_value = "30")]
    pub days: u32,
}

pub async fn run(
    args: &HistoryArgs,
    client: &StockApiClient,
    format: OutputFormat,
    use_real_data: bool,
) -> Result<()> {
    let points = client
        .get_price_history(&args.code, args.days, use_real_data)
        .await?;

    eprintln!("{} daily bars for {}", points.len(), args.code);
    print_history(&points, format)
}
