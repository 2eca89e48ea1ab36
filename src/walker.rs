//! Pagination over a source's daily news listing.

use crate::scrapers::ListingPages;
use chrono::{DateTime, Local};
use std::error::Error;
use tracing::{debug, info, instrument};

/// Collect every article link listed for `date`.
///
/// Requests pages 1, 2, 3, ... and stops at the first page whose active page
/// indicator is missing or differs from the requested number, or that
/// carries no links. That page's links are discarded. An empty result is the
/// normal outcome for a day without news.
#[instrument(level = "info", skip_all, fields(date = %date.date_naive()))]
pub async fn walk_listing<P>(pages: &P, date: DateTime<Local>) -> Result<Vec<String>, Box<dyn Error>>
where
    P: ListingPages + ?Sized,
{
    let mut links = Vec::new();
    let mut page = 1u32;

    loop {
        let listing = pages.fetch_listing_page(date, page).await?;

        if listing.active_page != Some(page) {
            debug!(page, active = ?listing.active_page, "Listing page indicator mismatch; stopping");
            break;
        }
        if listing.links.is_empty() {
            debug!(page, "Listing page is empty; stopping");
            break;
        }

        debug!(page, count = listing.links.len(), "Collected listing page");
        links.extend(listing.links);
        page += 1;
    }

    info!(pages = page - 1, count = links.len(), "Walked daily listing");
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListingPage;
    use chrono::TimeZone;
    use std::sync::Mutex;

    /// Serves `pages` in order; anything past the end reports page 1 as active.
    struct PagedListing {
        pages: Vec<Vec<&'static str>>,
        requests: Mutex<Vec<u32>>,
    }

    impl PagedListing {
        fn new(pages: Vec<Vec<&'static str>>) -> Self {
            Self {
                pages,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ListingPages for PagedListing {
        async fn fetch_listing_page(
            &self,
            _date: DateTime<Local>,
            page: u32,
        ) -> Result<ListingPage, Box<dyn Error>> {
            self.requests.lock().unwrap().push(page);
            let listing = match self.pages.get(page as usize - 1) {
                Some(links) => ListingPage {
                    active_page: Some(page),
                    links: links.iter().map(|l| l.to_string()).collect(),
                },
                None => ListingPage {
                    active_page: Some(1),
                    links: vec!["/stale/1".to_string()],
                },
            };
            Ok(listing)
        }
    }

    struct FailingListing;

    impl ListingPages for FailingListing {
        async fn fetch_listing_page(
            &self,
            _date: DateTime<Local>,
            _page: u32,
        ) -> Result<ListingPage, Box<dyn Error>> {
            Err("connection reset".into())
        }
    }

    fn day() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_walks_until_mismatched_page() {
        let listing = PagedListing::new(vec![vec!["/a/1", "/a/2"], vec!["/a/3"], vec!["/a/4", "/a/4"]]);

        let links = walk_listing(&listing, day()).await.unwrap();

        assert_eq!(links, vec!["/a/1", "/a/2", "/a/3", "/a/4", "/a/4"]);
        assert_eq!(*listing.requests.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stops_on_empty_page() {
        let listing = PagedListing::new(vec![vec!["/a/1"], vec![]]);

        let links = walk_listing(&listing, day()).await.unwrap();

        assert_eq!(links, vec!["/a/1"]);
        assert_eq!(listing.requests.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_first_page_mismatch_yields_empty() {
        struct NoIndicator;
        impl ListingPages for NoIndicator {
            async fn fetch_listing_page(
                &self,
                _date: DateTime<Local>,
                _page: u32,
            ) -> Result<ListingPage, Box<dyn Error>> {
                Ok(ListingPage {
                    active_page: None,
                    links: vec!["/a/1".to_string()],
                })
            }
        }

        let links = walk_listing(&NoIndicator, day()).await.unwrap();
        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        assert!(walk_listing(&FailingListing, day()).await.is_err());
    }
}
