//! dailybar CLI: fetch one ticker's latest daily bar from Yahoo Finance and
//! Alpha Vantage, merge them on date, and write the row as CSV to S3.
//!
//! Usage:
//! `dailybar <TICKER> <ALPHA_VANTAGE_API_KEY> <S3_URI_BASE> <S3_KEY_PREFIX>`
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use anyhow::{Context, Result};
use clap::Parser;
use dailybar_core::storage::store_for;
use dailybar_core::{run_job, AlphaVantageProvider, JobConfig, RunClock, RunOutcome, YahooProvider};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(
    name = "dailybar",
    version,
    about = "Fetch, reconcile, and publish one ticker's latest daily bar"
)]
struct Cli {
    /// Exchange ticker symbol (e.g., NVDA).
    #[arg(value_name = "TICKER")]
    ticker: String,

    /// Alpha Vantage API key.
    #[arg(value_name = "ALPHA_VANTAGE_API_KEY")]
    api_key: String,

    /// Storage address base (e.g., s3://bucket-name/ or file:///tmp/bars/).
    #[arg(value_name = "S3_URI_BASE")]
    storage_uri: String,

    /// Object key prefix (e.g., daily/). May be empty.
    #[arg(value_name = "S3_KEY_PREFIX")]
    key_prefix: String,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let cli = Cli::parse();

    let config = JobConfig::new(cli.ticker, cli.api_key, cli.storage_uri, cli.key_prefix)
        .context("invalid arguments")?;
    let clock = RunClock::now();
    tracing::debug!(?config, ?clock, "validated job configuration");

    let primary = YahooProvider::new()?;
    let secondary = AlphaVantageProvider::new(config.api_key())?;
    let store = store_for(&config.storage_location()?)
        .context("failed to set up object storage client")?;

    let outcome = run_job(&config, &clock, &primary, &secondary, store.as_ref())?;
    Ok(report(&outcome))
}

/// Print the run result and map it to the process exit status.
///
/// A date mismatch is not an error, but it exits 1 so a scheduler sees that
/// nothing was written.
fn report(outcome: &RunOutcome) -> ExitCode {
    match outcome {
        RunOutcome::Published(publication) => {
            println!(
                "Uploaded {} ({} bytes, blake3 {})",
                publication.destination, publication.bytes, publication.digest
            );
            ExitCode::SUCCESS
        }
        RunOutcome::DatesOutOfSync { primary, secondary } => {
            eprintln!(
                "No data written: Yahoo Finance reports {primary}, Alpha Vantage reports {secondary}. \
                 Re-run later once both providers have published the same day."
            );
            ExitCode::FAILURE
        }
    }
}
