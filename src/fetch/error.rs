// src/fetch/error.rs
// Typed fetch failures: transport, non-success status, unreadable body.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout...).
    #[error("network error fetching {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 2xx.
    #[error("HTTP {status} for URL: {url}")]
    Status { url: String, status: u16 },

    /// The response body could not be read as text.
    #[error("could not read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client itself could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
