//! Article counts over an output directory.
//!
//! Every `{source}_{date}.json` file is read back as a list of
//! [`ArticleRecord`]s and counted under its source prefix. Leftover `.tmp`
//! files, sub-directories and names without a `source_` prefix are ignored.

use crate::models::ArticleRecord;
use serde::Serialize;
use std::collections::BTreeMap;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, instrument};

/// What one source has on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceStats {
    /// Daily files found.
    pub days: usize,
    /// Records across all of those files.
    pub articles: usize,
}

/// Source name of a daily file: everything before the first `_`.
fn source_of(path: &Path) -> Option<&str> {
    let stem = path.file_stem()?.to_str()?;
    let (source, _) = stem.split_once('_')?;
    (!source.is_empty()).then_some(source)
}

/// Count daily files and records per source in `output_dir`.
///
/// # Arguments
///
/// * `output_dir` - Directory the harvester writes into
///
/// # Returns
///
/// Counts keyed by source name, in name order. A source with no files does
/// not appear. Fails on the first daily file that is not a valid record
/// array, naming the file.
#[instrument(level = "info", skip_all, fields(dir = %output_dir.display()))]
pub async fn collect_stats(output_dir: &Path) -> Result<BTreeMap<String, SourceStats>, Box<dyn Error>> {
    let mut stats: BTreeMap<String, SourceStats> = BTreeMap::new();
    let mut entries = fs::read_dir(output_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some("json")
        {
            continue;
        }
        let Some(source) = source_of(&path) else {
            debug!(path = %path.display(), "Skipping file without a source prefix");
            continue;
        };

        let content = fs::read_to_string(&path).await?;
        let records: Vec<ArticleRecord> = serde_json::from_str(&content)
            .map_err(|e| format!("{} is not a daily article file: {e}", path.display()))?;

        let counts = stats.entry(source.to_string()).or_default();
        counts.days += 1;
        counts.articles += records.len();
    }

    debug!(sources = stats.len(), "Collected output stats");
    Ok(stats)
}
