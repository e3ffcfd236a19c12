// src/config.rs
// =============================================================================
// This module holds the settings for one crawl run.
//
// A CrawlConfig is built once (usually from the command line), validated,
// and then shared read-only by every traversal task. Nothing in here changes
// while a crawl is running.
//
// Rust concepts:
// - Builder-style methods: `with_*` take `self` by value and return it
// - thiserror: derive Display/Error for our own error enum
// =============================================================================

use std::time::Duration;

use thiserror::Error;
use url::Url;

/// How many hops from the seed are followed when nothing else is asked for.
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// How many pages may be fetched at the same time across the whole run.
pub const DEFAULT_MAX_IN_FLIGHT: usize = 16;

/// Per-request timeout handed to the HTTP client.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// Errors raised while building or validating a CrawlConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The seed could not be parsed as an absolute URL.
    #[error("invalid seed URL '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        #[source]
        source: url::ParseError,
    },

    /// Only web pages can be crawled.
    #[error("unsupported scheme '{scheme}' in seed URL (expected http or https)")]
    UnsupportedScheme { scheme: String },

    /// Scoping compares hosts, so the seed needs one.
    #[error("seed URL has no host: {seed}")]
    MissingHost { seed: String },

    #[error("max depth must be at least 1")]
    ZeroDepth,

    #[error("max in-flight fetches must be at least 1")]
    ZeroConcurrency,

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
}

// Everything one crawl run needs to know
//
// Fields are public so callers can read them; use the `with_*` methods (or
// struct update syntax) to change them and call `validate()` afterwards.
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// The parsed seed URL. Also the base every discovered href resolves against.
    pub seed: Url,
    /// Maximum number of hops from the seed that are recorded.
    pub max_depth: usize,
    /// Global cap on concurrent page fetches.
    pub max_in_flight: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
    /// Treat `*.seed-host` as in scope as well as the seed host itself.
    pub allow_subdomains: bool,
}

impl CrawlConfig {
    /// Parses `seed` and fills every other field with its default.
    pub fn new(seed: &str) -> Result<Self, ConfigError> {
        let parsed = Url::parse(seed.trim()).map_err(|source| ConfigError::InvalidSeed {
            seed: seed.to_string(),
            source,
        })?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ConfigError::UnsupportedScheme {
                scheme: parsed.scheme().to_string(),
            });
        }

        if parsed.host_str().map_or(true, str::is_empty) {
            return Err(ConfigError::MissingHost {
                seed: seed.to_string(),
            });
        }

        Ok(Self {
            seed: parsed,
            max_depth: DEFAULT_MAX_DEPTH,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: default_user_agent(),
            allow_subdomains: false,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_subdomains(mut self, allow: bool) -> Self {
        self.allow_subdomains = allow;
        self
    }

    /// Checks the numeric limits. The seed was already checked by `new`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if self.max_in_flight == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
