//! JSON output for one harvested day.
//!
//! The file content is a pretty-printed (2-space indent) array of
//! [`ArticleRecord`]s. It is written to a `.tmp` sibling first and renamed
//! into place, so the final name only ever holds a complete array.

use crate::models::ArticleRecord;
use chrono::{DateTime, Local};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// `Mon Jan 01 2024`, the day label used in output file names.
pub fn date_label(date: &DateTime<Local>) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// `{output_dir}/{source}_{date_label}.json`
pub fn daily_path(output_dir: &Path, source: &str, date: &DateTime<Local>) -> PathBuf {
    output_dir.join(format!("{source}_{}.json", date_label(date)))
}

/// Serialize `records` and write them as the complete content of `path`.
#[instrument(level = "info", skip_all, fields(path = %path.display(), count = records.len()))]
pub async fn write_daily(path: &Path, records: &[ArticleRecord]) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(records)?;

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    if let Err(e) = fs::write(&tmp, json).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to write JSON");
        return Err(e.into());
    }
    fs::rename(&tmp, path).await?;
    info!("Wrote daily JSON file");

    Ok(())
}
