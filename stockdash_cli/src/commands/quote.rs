use anyhow::Result;
use clap::Args;
use stockdash_lib::StockApiClient;

use crate::output::{print_stock, OutputFormat};

#[derive(Args)]
pub struct QuoteArgs {
    /// Four-digit stock code (e.g. 7203)
    pub code: String,
}

pub async fn run(
    args: &QuoteArgs,
    client: &StockApiClient,
    format: OutputFormat,
    use_real_data: bool,
) -> Result<()> {
    let stock = client.get_stock_data(&args.code, use_real_data).await?;
    print_stock(&stock, format)
}
