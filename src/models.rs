//! Data models for harvested articles and per-day results.
//!
//! - [`ArticleRecord`]: one parsed article as it is written to disk
//! - [`FetchOutcome`]: what the fetch pool hands back for a batch of links
//! - [`ListingPage`]: one parsed page of a source's daily news index
//! - [`HarvestStatus`]: what happened to a single (source, date) pair

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single parsed news article.
///
/// Field order matters: it is the key order of every object in the daily
/// JSON files (`full_link`, `timestamp`, `title`, `text`, `tags`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    /// Absolute URL of the article page.
    pub full_link: String,
    /// Publication datetime exactly as the source exposes it in markup.
    pub timestamp: String,
    /// Headline, trimmed.
    pub title: String,
    /// Body paragraphs joined with `\n`, trimmed.
    pub text: String,
    /// Tag labels in page order.
    pub tags: Vec<String>,
}

/// Result of running a batch through the fetch pool.
///
/// `results` holds the successful items in completion order, which is not
/// necessarily the input order.
#[derive(Debug)]
pub struct FetchOutcome<T> {
    pub results: Vec<T>,
    pub error_count: usize,
}

impl<T> Default for FetchOutcome<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            error_count: 0,
        }
    }
}

/// One page of a paginated daily listing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingPage {
    /// The page number the site marks as current, if any.
    pub active_page: Option<u32>,
    /// Article links in markup order.
    pub links: Vec<String>,
}

/// Outcome of harvesting one day for one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarvestStatus {
    /// Output already existed; nothing was fetched.
    Skipped { path: PathBuf },
    /// A new daily file was written.
    Saved {
        path: PathBuf,
        articles: usize,
        errors: usize,
    },
}
