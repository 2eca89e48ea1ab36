//! Harvest one (source, date) pair into its daily JSON file.

use crate::models::HarvestStatus;
use crate::outputs::json::{daily_path, write_daily};
use crate::pool::run_bounded;
use crate::scrapers::NewsSource;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument, warn};

/// Fetch every article `source` lists for `date` and save them.
///
/// # Arguments
///
/// * `source` - The news source to index and fetch from
/// * `output_dir` - Directory holding the daily JSON files
/// * `date` - Cursor for the day; only its local calendar date names the file
///
/// # Returns
///
/// [`HarvestStatus::Skipped`] without touching the network if the day's file
/// already exists, otherwise [`HarvestStatus::Saved`] with the article and
/// error counts.
///
/// # Errors
///
/// Listing and write failures propagate and leave no file behind. Failures
/// of individual articles are counted and the articles left out.
#[instrument(level = "info", skip_all, fields(source = source.config().name, date = %date.date_naive()))]
pub async fn harvest_day<S: NewsSource>(
    source: &S,
    output_dir: &Path,
    date: DateTime<Local>,
) -> Result<HarvestStatus, Box<dyn Error>> {
    let config = source.config();
    let path = daily_path(output_dir, config.name, &date);

    if fs::try_exists(&path).await? {
        info!(path = %path.display(), "Already harvested; skipping");
        return Ok(HarvestStatus::Skipped { path });
    }

    info!(%date, "Fetching news for date");
    let links = source.index_articles(date).await?;
    info!(count = links.len(), "Found news");

    let outcome = run_bounded(links, config.concurrency, move |_, link: String| async move {
        source.fetch_article(&link).await
    })
    .await;

    if outcome.error_count > 0 {
        warn!(errors = outcome.error_count, "Got {} errors!", outcome.error_count);
    }

    write_daily(&path, &outcome.results).await?;
    info!(path = %path.display(), articles = outcome.results.len(), "Saved day");

    Ok(HarvestStatus::Saved {
        path,
        articles: outcome.results.len(),
        errors: outcome.error_count,
    })
}
