// src/fetch/mod.rs
// =============================================================================
// This module turns a URL into page content.
//
// The crawl engine never talks to reqwest directly. It only sees the
// `Fetcher` trait, so tests can swap in an in-memory site and the engine
// doesn't care where pages come from.
//
// Submodules:
// - error: the typed failures a fetch can end with
// - http: the real implementation backed by reqwest
//
// Rust concepts:
// - Traits as seams: `Arc<dyn Fetcher>` is shared by every crawl task
// - async-trait: lets an async method live on a trait object
// =============================================================================

mod error;
mod http;

pub use error::FetchError;
pub use http::HttpFetcher;

use async_trait::async_trait;
use url::Url;

// A fetched HTML page
//
// The body is kept as text: scraper's parsed DOM is not Send, so it can't
// be held across an .await inside a spawned task. The extractor parses it.
#[derive(Debug, Clone)]
pub struct Page {
    /// The URL that was requested.
    pub url: Url,
    /// The response body.
    pub html: String,
}

impl Page {
    pub fn new(url: Url, html: impl Into<String>) -> Self {
        Self {
            url,
            html: html.into(),
        }
    }
}

/// Resolves an absolute URL to page content.
///
/// Implementations must not retry: every error is final for the task
/// that asked.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError>;
}
