use anyhow::Result;
use stockdash_lib::StockApiClient;

use crate::output::{print_health, OutputFormat};

pub async fn run(client: &StockApiClient, format: OutputFormat) -> Result<()> {
    let health = client.health_check().await?;
    print_health(&health, format)
}
