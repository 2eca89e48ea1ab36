//! RBC news feed scraper.
//!
//! RBC exposes its news stream as a JSON feed keyed by a Unix timestamp:
//! every item published before `lastDate` is returned, newest first, up to
//! `limit` items. Each item carries a rendered HTML snippet whose first
//! `href` is the article URL. The feed is not paginated here, so a day with
//! more than [`FEED_LIMIT`] items is truncated.

use super::{ArticleSelectors, NewsSource, SourceConfig, extract_article, fetch_text, resolve_link};
use crate::models::ArticleRecord;
use chrono::{DateTime, Local};
use encoding_rs::UTF_8;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

pub const SOURCE_NAME: &str = "rbc";
const BASE_URL: &str = "https://www.rbc.ru";
pub const FEED_LIMIT: usize = 99;
const CONCURRENCY: usize = 1;
const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

const ARTICLE: ArticleSelectors = ArticleSelectors {
    title: "h1",
    timestamp: ".article__header__date",
    paragraphs: ".article__text p",
    tags: ".article__tags__container a",
};

static HREF: Lazy<Regex> = Lazy::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());

#[derive(Debug, Deserialize)]
struct Feed {
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    html: String,
}

#[derive(Debug, Clone)]
pub struct Rbc {
    client: Client,
    config: SourceConfig,
}

impl Rbc {
    /// Article requests time out after 3 s unless `request_timeout` overrides it.
    pub fn new(client: Client, request_timeout: Option<Duration>) -> Self {
        Self {
            client,
            config: SourceConfig {
                name: SOURCE_NAME,
                base_url: BASE_URL,
                concurrency: CONCURRENCY,
                request_timeout: request_timeout.or(Some(DEFAULT_TIMEOUT)),
                encoding: UTF_8,
                floor_to_midnight: true,
            },
        }
    }
}

pub fn feed_url(date: DateTime<Local>) -> String {
    format!(
        "{BASE_URL}/v10/ajax/get-news-feed/project/rbcnews.uploaded/lastDate/{}/limit/{FEED_LIMIT}",
        date.timestamp()
    )
}

/// Extract article links from a feed response, in feed order.
///
/// Items whose snippet has no `href` are skipped.
pub fn parse_feed(body: &str) -> Result<Vec<String>, Box<dyn Error>> {
    let feed: Feed = serde_json::from_str(body)?;
    let total = feed.items.len();

    let links: Vec<String> = feed
        .items
        .iter()
        .filter_map(|item| HREF.captures(&item.html))
        .map(|caps| caps[1].to_string())
        .collect();

    if links.len() < total {
        warn!(skipped = total - links.len(), "Feed items without a link");
    }
    Ok(links)
}

impl NewsSource for Rbc {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    #[instrument(level = "info", skip_all, fields(source = SOURCE_NAME, date = %date.date_naive()))]
    async fn index_articles(&self, date: DateTime<Local>) -> Result<Vec<String>, Box<dyn Error>> {
        let url = feed_url(date);
        let body = fetch_text(&self.client, &url, &self.config, None).await?;
        let links = parse_feed(&body)?;
        info!(count = links.len(), limit = FEED_LIMIT, "Read RBC news feed");
        Ok(links)
    }

    #[instrument(level = "debug", skip(self), fields(source = SOURCE_NAME))]
    async fn fetch_article(&self, link: &str) -> Result<ArticleRecord, Box<dyn Error>> {
        let full_link = resolve_link(self.config.base_url, link)?;
        debug!(%full_link, "Fetching RBC article");
        let html =
            fetch_text(&self.client, &full_link, &self.config, self.config.request_timeout).await?;
        extract_article(&html, &full_link, &ARTICLE)
    }
}
