use anyhow::Result;
use clap::Args;
use stockdash_lib::StockApiClient;

use crate::output::{print_price, OutputFormat};

#[derive(Args)]
pub struct PriceArgs {
    /// Four-digit stock code (e.g. 7203)
    pub code: String,
}

pub async fn run(
    args: &PriceArgs,
    client: &StockApiClient,
    format: OutputFormat,
    use_real_data: bool,
) -> Result<()> {
    let price = client.get_current_price(&args.code, use_real_data).await?;
    print_price(&price, format)
}
