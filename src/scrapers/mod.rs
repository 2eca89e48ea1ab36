//! News sources and the shared plumbing they are built on.
//!
//! Each source follows the same two-phase pattern:
//!
//! 1. **Indexing**: collect every article link published on a given date
//! 2. **Fetching**: download one article page and parse it into an
//!    [`ArticleRecord`]
//!
//! # Supported Sources
//!
//! | Source | Module | Index method | Encoding | Pool bound |
//! |--------|--------|--------------|----------|------------|
//! | Interfax | [`interfax`] | Paginated HTML listing | windows-1251 | 10 |
//! | RBC | [`rbc`] | JSON news feed (limit 99) | UTF-8 | 1 |
//!
//! Everything above this module (walker, pool, harvester, driver) talks to
//! a source only through [`NewsSource`], which keeps the network out of
//! tests.

use crate::models::{ArticleRecord, ListingPage};
use chrono::{DateTime, Local};
use encoding_rs::Encoding;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

pub mod interfax;
pub mod rbc;

#[cfg(test)]
pub mod testing;

/// Fixed per-source settings.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Short name used as the output file prefix and in logs.
    pub name: &'static str,
    /// Origin that relative article links are resolved against.
    pub base_url: &'static str,
    /// Maximum number of article fetches in flight.
    pub concurrency: usize,
    /// Deadline for a single article request; the request is dropped when it
    /// passes. Listing and feed requests have no deadline.
    pub request_timeout: Option<Duration>,
    /// Encoding the source serves its pages in.
    pub encoding: &'static Encoding,
    /// Whether the date cursor starts at local midnight instead of "now".
    pub floor_to_midnight: bool,
}

/// A news site that can list one day's articles and parse each of them.
pub trait NewsSource {
    fn config(&self) -> &SourceConfig;

    /// Return every article link for `date`, in listing order.
    async fn index_articles(&self, date: DateTime<Local>) -> Result<Vec<String>, Box<dyn Error>>;

    /// Fetch and parse one article.
    async fn fetch_article(&self, link: &str) -> Result<ArticleRecord, Box<dyn Error>>;
}

/// A source whose daily index is split over numbered pages.
pub trait ListingPages {
    /// Fetch and parse page `page` (1-based) of the listing for `date`.
    async fn fetch_listing_page(
        &self,
        date: DateTime<Local>,
        page: u32,
    ) -> Result<ListingPage, Box<dyn Error>>;
}

/// CSS selectors locating the fields of an article page.
#[derive(Debug, Clone, Copy)]
pub struct ArticleSelectors {
    pub title: &'static str,
    /// Element carrying a `datetime` attribute.
    pub timestamp: &'static str,
    pub paragraphs: &'static str,
    pub tags: &'static str,
}

/// Resolve a possibly relative link against the source's origin.
pub fn resolve_link(base_url: &str, link: &str) -> Result<String, Box<dyn Error>> {
    let base = Url::parse(base_url)?;
    Ok(base.join(link)?.to_string())
}

/// Decode raw page bytes from the source's encoding into UTF-8 text.
pub fn decode_body(bytes: &[u8], encoding: &'static Encoding) -> String {
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "Malformed byte sequences replaced while decoding");
    }
    text.into_owned()
}

/// GET `url` and return its body decoded from `config.encoding`.
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `url` - Absolute URL to request
/// * `config` - Source settings; only its name and encoding are used here
/// * `timeout` - Deadline for the whole request, body included. Article
///   fetches pass [`SourceConfig::request_timeout`]; listing and feed
///   requests pass `None` and wait for as long as the server takes.
///
/// # Returns
///
/// The decoded body. When the deadline passes the request future is
/// dropped, which aborts the connection, and a "timed out" error is
/// returned.
#[instrument(level = "debug", skip_all, fields(%url, source = config.name))]
pub async fn fetch_text(
    client: &Client,
    url: &str,
    config: &SourceConfig,
    timeout: Option<Duration>,
) -> Result<String, Box<dyn Error>> {
    let request = async {
        let response = client.get(url).send().await?;
        Ok::<_, reqwest::Error>(response.bytes().await?)
    };

    let bytes = match timeout {
        Some(limit) => tokio::time::timeout(limit, request)
            .await
            .map_err(|_| format!("request to {url} timed out after {}ms", limit.as_millis()))??,
        None => request.await?,
    };

    debug!(bytes = bytes.len(), "Fetched page");
    Ok(decode_body(&bytes, config.encoding))
}

/// Parse an article page into an [`ArticleRecord`].
///
/// # Arguments
///
/// * `html` - Decoded article page
/// * `full_link` - Absolute URL of the page, stored as the record's link
/// * `css` - Where the source keeps each field
///
/// # Returns
///
/// The record with trimmed title and text. Paragraphs are joined with
/// newlines. Every tag link contributes one trimmed entry, empty ones
/// included. Paragraphs and tags may be absent.
///
/// # Errors
///
/// Fails when the title element, or the timestamp element with its
/// `datetime` attribute, is missing.
pub fn extract_article(
    html: &str,
    full_link: &str,
    css: &ArticleSelectors,
) -> Result<ArticleRecord, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let title_selector = Selector::parse(css.title)?;
    let timestamp_selector = Selector::parse(css.timestamp)?;
    let paragraph_selector = Selector::parse(css.paragraphs)?;
    let tag_selector = Selector::parse(css.tags)?;

    let title = document
        .select(&title_selector)
        .next()
        .ok_or_else(|| format!("missing title element `{}` in {full_link}", css.title))?
        .text()
        .collect::<String>();

    let timestamp = document
        .select(&timestamp_selector)
        .next()
        .and_then(|element| element.value().attr("datetime"))
        .ok_or_else(|| format!("missing timestamp `{}` with a datetime attribute in {full_link}", css.timestamp))?
        .to_string();

    let mut text = String::new();
    for paragraph in document.select(&paragraph_selector) {
        text.extend(paragraph.text());
        text.push('\n');
    }

    let tags = document
        .select(&tag_selector)
        .map(|tag| tag.text().collect::<String>().trim().to_string())
        .collect::<Vec<_>>();

    Ok(ArticleRecord {
        full_link: full_link.to_string(),
        timestamp,
        title: title.trim().to_string(),
        text: text.trim().to_string(),
        tags,
    })
}
