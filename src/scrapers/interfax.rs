//! Interfax archive scraper.
//!
//! Interfax publishes a paginated archive per day at
//! `https://www.interfax.ru/news/{year}/{month}/{day}/all/page_{n}`. The
//! current page is marked with `.pages a.active`; requesting a page past the
//! end returns a page whose indicator no longer matches. All pages are served
//! in windows-1251.
//!
//! Article links in the archive are relative (`/russia/912345`).

use super::{
    ArticleSelectors, ListingPages, NewsSource, SourceConfig, extract_article, fetch_text,
    resolve_link,
};
use crate::models::{ArticleRecord, ListingPage};
use crate::walker::walk_listing;
use chrono::{DateTime, Datelike, Local};
use encoding_rs::WINDOWS_1251;
use reqwest::Client;
use scraper::{Html, Selector};
use std::error::Error;
use std::time::Duration;
use tracing::{debug, instrument};

pub const SOURCE_NAME: &str = "interfax";
const BASE_URL: &str = "https://www.interfax.ru";
const CONCURRENCY: usize = 10;

const ARTICLE: ArticleSelectors = ArticleSelectors {
    title: "h1",
    timestamp: "time[datetime]",
    paragraphs: "article p",
    tags: ".textMTags a",
};

#[derive(Debug, Clone)]
pub struct Interfax {
    client: Client,
    config: SourceConfig,
}

impl Interfax {
    /// Interfax article requests have no deadline unless `request_timeout` is given.
    pub fn new(client: Client, request_timeout: Option<Duration>) -> Self {
        Self {
            client,
            config: SourceConfig {
                name: SOURCE_NAME,
                base_url: BASE_URL,
                concurrency: CONCURRENCY,
                request_timeout,
                encoding: WINDOWS_1251,
                floor_to_midnight: false,
            },
        }
    }
}

/// Archive URL for one page of one day. Month and day are not zero-padded.
pub fn listing_url(date: DateTime<Local>, page: u32) -> String {
    format!(
        "{BASE_URL}/news/{}/{}/{}/all/page_{page}",
        date.year(),
        date.month(),
        date.day()
    )
}

/// Parse an archive page: the active page number and the first link of
/// every `.an div` block, in markup order.
pub fn parse_listing_page(html: &str) -> Result<ListingPage, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let active_selector = Selector::parse(".pages a.active")?;
    let block_selector = Selector::parse(".an div")?;
    let link_selector = Selector::parse("a")?;

    let active_page = document
        .select(&active_selector)
        .next()
        .and_then(|a| a.text().collect::<String>().trim().parse::<u32>().ok());

    let links = document
        .select(&block_selector)
        .filter_map(|block| block.select(&link_selector).next())
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect();

    Ok(ListingPage { active_page, links })
}

impl ListingPages for Interfax {
    #[instrument(level = "debug", skip(self, date), fields(source = SOURCE_NAME))]
    async fn fetch_listing_page(
        &self,
        date: DateTime<Local>,
        page: u32,
    ) -> Result<ListingPage, Box<dyn Error>> {
        let url = listing_url(date, page);
        let html = fetch_text(&self.client, &url, &self.config, None).await?;
        let listing = parse_listing_page(&html)?;
        debug!(%url, active = ?listing.active_page, count = listing.links.len(), "Parsed Interfax listing page");
        Ok(listing)
    }
}

impl NewsSource for Interfax {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn index_articles(&self, date: DateTime<Local>) -> Result<Vec<String>, Box<dyn Error>> {
        walk_listing(self, date).await
    }

    #[instrument(level = "debug", skip(self), fields(source = SOURCE_NAME))]
    async fn fetch_article(&self, link: &str) -> Result<ArticleRecord, Box<dyn Error>> {
        let full_link = resolve_link(self.config.base_url, link)?;
        let html =
            fetch_text(&self.client, &full_link, &self.config, self.config.request_timeout).await?;
        extract_article(&html, &full_link, &ARTICLE)
    }
}
