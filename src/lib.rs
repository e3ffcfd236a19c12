// src/lib.rs
// =============================================================================
// link-crawler maps every page on a site that is reachable from a seed URL
// within a fixed number of link hops.
//
// Modules:
// - cli: command-line parsing (clap)
// - config: settings for one crawl run
// - fetch: turning a URL into page content (reqwest)
// - extract: pulling href values out of HTML (scraper)
// - crawl: the parallel, depth-bounded traversal
// - output: printing the result
// =============================================================================

pub mod cli;
pub mod config;
pub mod crawl;
pub mod extract;
pub mod fetch;
pub mod output;

pub use config::{ConfigError, CrawlConfig};
pub use crawl::{CrawlReport, Crawler, SetupError};
