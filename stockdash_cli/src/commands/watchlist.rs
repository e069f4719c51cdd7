use anyhow::{bail, Result};
use clap::Args;
use stockdash_lib::StockApiClient;

use crate::output::{print_watchlist, OutputFormat};

#[derive(Args)]
pub struct WatchlistArgs {
    /// Stock codes to fetch, space separated
    #[arg(required = true, num_args = 1..)]
    pub codes: Vec<String>,

    /// Exit non-zero if any code failed
    #[arg(long)]
    pub strict: bool,
}

pub async fn run(
    args: &WatchlistArgs,
    client: &StockApiClient,
    format: OutputFormat,
    use_real_data: bool,
) -> Result<()> {
    let entries = client
        .get_watchlist(args.codes.as_slice(), use_real_data)
        .await?;
    let failed = entries.iter().filter(|e| e.result.is_err()).count();

    eprintln!("{} of {} codes fetched", entries.len() - failed, entries.len());
    print_watchlist(&entries, format)?;

    if args.strict && failed > 0 {
        bail!("{} watchlist code(s) failed", failed);
    }
    Ok(())
}
