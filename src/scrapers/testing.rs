//! In-memory [`NewsSource`] used by harvester and driver tests.

use super::{ListingPages, NewsSource, SourceConfig};
use crate::models::{ArticleRecord, ListingPage};
use crate::walker::walk_listing;
use chrono::{DateTime, Local, NaiveDate};
use std::collections::HashSet;
use std::error::Error;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Serves the same listing pages for every date and fabricates a record for
/// every link that is not marked as failing.
pub struct StubSource {
    pub config: SourceConfig,
    pub pages: Vec<Vec<String>>,
    pub failing_links: HashSet<String>,
    /// Dates whose listing request fails, with the number of failures left.
    pub failing_dates: Mutex<Vec<(NaiveDate, usize)>>,
    pub listing_requests: AtomicUsize,
    pub article_requests: AtomicUsize,
    pub dates_seen: Mutex<Vec<NaiveDate>>,
}

impl StubSource {
    pub fn new(pages: Vec<Vec<&str>>) -> Self {
        Self {
            config: SourceConfig {
                name: "source",
                base_url: "https://news.example",
                concurrency: 3,
                request_timeout: None,
                encoding: encoding_rs::UTF_8,
                floor_to_midnight: false,
            },
            pages: pages
                .into_iter()
                .map(|page| page.into_iter().map(str::to_string).collect())
                .collect(),
            failing_links: HashSet::new(),
            failing_dates: Mutex::new(Vec::new()),
            listing_requests: AtomicUsize::new(0),
            article_requests: AtomicUsize::new(0),
            dates_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_link(mut self, link: &str) -> Self {
        self.failing_links.insert(link.to_string());
        self
    }

    /// Make the listing for `date` fail `times` times before succeeding.
    pub fn failing_date(self, date: NaiveDate, times: usize) -> Self {
        self.failing_dates.lock().unwrap().push((date, times));
        self
    }

    pub fn network_calls(&self) -> usize {
        self.listing_requests.load(Ordering::SeqCst) + self.article_requests.load(Ordering::SeqCst)
    }

    pub fn record_for(link: &str) -> ArticleRecord {
        ArticleRecord {
            full_link: format!("https://news.example{link}"),
            timestamp: "2024-01-01T12:00:00+03:00".to_string(),
            title: format!("Title {link}"),
            text: format!("Body of {link}"),
            tags: vec!["stub".to_string()],
        }
    }
}

impl ListingPages for StubSource {
    async fn fetch_listing_page(
        &self,
        date: DateTime<Local>,
        page: u32,
    ) -> Result<ListingPage, Box<dyn Error>> {
        self.listing_requests.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        let day = date.date_naive();
        if page == 1 {
            self.dates_seen.lock().unwrap().push(day);
            let mut failing = self.failing_dates.lock().unwrap();
            if let Some((_, left)) = failing.iter_mut().find(|(d, left)| *d == day && *left > 0) {
                *left -= 1;
                return Err(format!("listing for {day} unavailable").into());
            }
        }

        Ok(match self.pages.get(page as usize - 1) {
            Some(links) => ListingPage {
                active_page: Some(page),
                links: links.clone(),
            },
            None => ListingPage {
                active_page: Some(page),
                links: Vec::new(),
            },
        })
    }
}

impl NewsSource for StubSource {
    fn config(&self) -> &SourceConfig {
        &self.config
    }

    async fn index_articles(&self, date: DateTime<Local>) -> Result<Vec<String>, Box<dyn Error>> {
        walk_listing(self, date).await
    }

    async fn fetch_article(&self, link: &str) -> Result<ArticleRecord, Box<dyn Error>> {
        self.article_requests.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        if self.failing_links.contains(link) {
            return Err(format!("missing title element in {link}").into());
        }
        Ok(Self::record_for(link))
    }
}
