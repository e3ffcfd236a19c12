//! In-memory site used by the engine tests.
//!
//! Each page is a list of hrefs; the "HTML" handed to the extractor is those
//! hrefs joined by newlines. The fetcher counts requests per path and can be
//! told to delay, or to panic on specific paths. Unknown paths answer 404.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use link_crawler::extract::LinkExtractor;
use link_crawler::fetch::{FetchError, Fetcher, Page};
use link_crawler::{CrawlConfig, Crawler};
use url::Url;

pub const SEED: &str = "http://example.test/";

#[derive(Default)]
pub struct FakeSite {
    pages: HashMap<String, Vec<String>>,
    panics_on: Vec<String>,
    delay: Option<Duration>,
    requests: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight_seen: AtomicUsize,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a page at `path` whose body links to `hrefs`.
    pub fn page<I, S>(mut self, path: &str, hrefs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pages
            .insert(path.to_string(), hrefs.into_iter().map(Into::into).collect());
        self
    }

    pub fn panic_on(mut self, path: &str) -> Self {
        self.panics_on.push(path.to_string());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `path` was fetched.
    pub fn requests_for(&self, path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .get(path)
            .copied()
            .unwrap_or(0)
    }

    /// How many fetches were made across all paths.
    pub fn total_requests(&self) -> usize {
        self.requests.lock().unwrap().values().sum()
    }

    pub fn max_in_flight_seen(&self) -> usize {
        self.max_in_flight_seen.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for FakeSite {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        let path = url.path().to_string();
        *self.requests.lock().unwrap().entry(path.clone()).or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight_seen.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.panics_on.contains(&path) {
            panic!("fake site told to panic on {path}");
        }

        match self.pages.get(&path) {
            Some(hrefs) => Ok(Page::new(url.clone(), hrefs.join("\n"))),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

pub struct LineExtractor;

impl LinkExtractor for LineExtractor {
    fn extract(&self, page: &Page) -> Vec<String> {
        page.html.lines().map(str::to_string).collect()
    }
}

/// A crawler over `site` seeded at [`SEED`].
pub fn crawler(site: Arc<FakeSite>, config: CrawlConfig) -> Crawler {
    Crawler::new(config, site, Arc::new(LineExtractor)).expect("valid test config")
}

pub fn config(max_depth: usize) -> CrawlConfig {
    CrawlConfig::new(SEED).unwrap().with_max_depth(max_depth)
}

pub fn page_url(path: &str) -> String {
    format!("http://example.test{path}")
}
