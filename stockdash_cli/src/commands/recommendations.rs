use anyhow::Result;
use clap::Args;
use stockdash_lib::StockApiClient;

use crate::output::{print_recommendations, OutputFormat};

#[derive(Args)]
pub struct RecommendationsArgs {
    /// Maximum number of picks to show (1-100)
    #[arg(long, default_value = "10")]
    pub limit: u32,
}

pub async fn run(
    args: &RecommendationsArgs,
    client: &StockApiClient,
    format: OutputFormat,
) -> Result<()> {
    let recs = client.get_recommendations(args.limit).await?;
    print_recommendations(&recs, format)
}
