// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::config::{
    ConfigError, CrawlConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_IN_FLIGHT, DEFAULT_REQUEST_TIMEOUT,
};

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Map every same-host page reachable from a seed URL",
    long_about = "link-crawler follows links from a seed page, in parallel, up to a fixed \
                  number of hops. Only pages on the seed's host are recorded and fetched; \
                  links to other hosts are reported and skipped."
)]
pub struct Cli {
    /// Seed URL to start crawling from (e.g., https://example.com)
    ///
    /// This is a positional argument (required, no flag needed)
    pub seed_url: String,

    /// Maximum number of link hops from the seed
    ///
    /// Depth 1 = the seed and the pages it links to
    /// Depth 2 = ... plus the pages those link to
    /// etc.
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of pages fetched at the same time
    #[arg(long, default_value_t = DEFAULT_MAX_IN_FLIGHT)]
    pub max_in_flight: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs())]
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    #[arg(long)]
    pub user_agent: Option<String>,

    /// Also crawl subdomains of the seed host (www.example.com for example.com)
    #[arg(long)]
    pub allow_subdomains: bool,

    /// Print only the crawled URLs as a JSON object
    #[arg(long)]
    pub json: bool,

    /// More log output on stderr (-v debug, -vv trace). RUST_LOG overrides this.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Turns the parsed arguments into a crawl configuration.
    ///
    /// Limits are checked later, by `Crawler::new`.
    pub fn to_config(&self) -> Result<CrawlConfig, ConfigError> {
        let mut config = CrawlConfig::new(&self.seed_url)?
            .with_max_depth(self.max_depth)
            .with_max_in_flight(self.max_in_flight)
            .with_request_timeout(Duration::from_secs(self.timeout_secs))
            .with_subdomains(self.allow_subdomains);

        if let Some(user_agent) = &self.user_agent {
            config = config.with_user_agent(user_agent.clone());
        }

        Ok(config)
    }

    /// The default log filter for this verbosity.
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
