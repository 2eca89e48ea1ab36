//! # RU News Harvest
//!
//! Walks the Interfax and RBC news archives backward one day at a time and
//! stores every day's articles as a JSON file per source.
//!
//! ## Usage
//!
//! ```sh
//! ru_news_harvest ./news
//! ru_news_harvest ./news --stats
//! ```
//!
//! ## Architecture
//!
//! Each source runs its own pipeline; both run side by side in one process:
//! 1. **Driving**: move a date cursor back one day after every harvest
//! 2. **Indexing**: collect the day's article links (paginated listing or feed)
//! 3. **Fetching**: download and parse articles with a bounded pool
//!    (Interfax 10 at a time, RBC one at a time)
//! 4. **Output**: write `{source}_{Www Mmm DD YYYY}.json`, skipped on later runs
//!
//! With `--stats` nothing is fetched: the existing daily files are counted
//! per source and the counts are printed as JSON.

use chrono::Local;
use clap::Parser;
use reqwest::Client;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod driver;
mod harvester;
mod models;
mod outputs;
mod pool;
mod retry;
mod scrapers;
mod stats;
mod utils;
mod walker;

use cli::Cli;
use driver::{DateDriver, DriverSummary, StopCondition, start_cursor};
use retry::RetryPolicy;
use scrapers::NewsSource;
use scrapers::interfax::Interfax;
use scrapers::rbc::Rbc;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("ru_news_harvest starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if args.stats {
        let stats = stats::collect_stats(&args.output_dir).await?;
        if stats.is_empty() {
            warn!(path = %args.output_dir.display(), "No daily files found");
        }
        for (source, counts) in &stats {
            info!(%source, days = counts.days, articles = counts.articles, "Source stats");
        }
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir.display(),
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client = Client::builder().build()?;
    let timeout = args.timeout_ms.map(Duration::from_millis);
    let retry = RetryPolicy::new(args.retries, Duration::from_secs(1));
    let stop = StopCondition {
        earliest: args.until,
        max_days: args.max_days,
    };

    let interfax = Interfax::new(client.clone(), timeout);
    let rbc = Rbc::new(client, timeout);

    let interfax_run = async {
        if args.source.includes_interfax() {
            Some(run_source(&interfax, &args.output_dir, &retry, stop).await)
        } else {
            None
        }
    };
    let rbc_run = async {
        if args.source.includes_rbc() {
            Some(run_source(&rbc, &args.output_dir, &retry, stop).await)
        } else {
            None
        }
    };

    tokio::select! {
        (interfax_summary, rbc_summary) = async { tokio::join!(interfax_run, rbc_run) } => {
            if let Some(summary) = interfax_summary {
                info!(source = "interfax", ?summary, "Source finished");
            }
            if let Some(summary) = rbc_summary {
                info!(source = "rbc", ?summary, "Source finished");
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal?;
            warn!("Interrupted; stopping");
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");

    Ok(())
}

/// Drive one source backward from today until `stop` holds.
async fn run_source<S: NewsSource>(
    source: &S,
    output_dir: &Path,
    retry: &RetryPolicy,
    stop: StopCondition,
) -> DriverSummary {
    let config = source.config();
    let start = start_cursor(Local::now(), config.floor_to_midnight);
    info!(
        source = config.name,
        concurrency = config.concurrency,
        timeout = ?config.request_timeout,
        %start,
        "Starting source"
    );
    DateDriver::new(source, output_dir, retry.clone(), stop)
        .run(start)
        .await
}
