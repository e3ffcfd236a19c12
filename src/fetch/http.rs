// src/fetch/http.rs
// =============================================================================
// This module fetches pages over HTTP with reqwest.
//
// Key functionality:
// - One shared Client (connection pooling) built from the crawl config
// - Plain GET, no retries
// - Any non-2xx status is a failure carrying the code and the URL
//
// Rust concepts:
// - async/await: For network I/O that doesn't block other crawl tasks
// - map_err: Wrap library errors into our own FetchError variants
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use tracing::trace;
use url::Url;

use super::{FetchError, Fetcher, Page};
use crate::config::CrawlConfig;

// The production Fetcher
//
// Client is cheap to clone (it's an Arc internally), so HttpFetcher is too.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client with the config's timeout and user agent.
    pub fn new(config: &CrawlConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<Page, FetchError> {
        trace!(url = %url, "GET");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        // 2xx only. Redirects were already followed by the client, so a
        // 3xx here means the redirect limit was hit or Location was missing.
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await.map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })?;

        Ok(Page::new(url.clone(), html))
    }
}
