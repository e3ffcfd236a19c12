// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (stderr) so stdout only carries the result
// 3. Run one crawl from the seed URL
// 4. Print the result and exit with a proper code (0 = done, 2 = error)
//
// A crawl never fails because of one bad link: broken pages and external
// links show up in the log and the summary, not in the exit code.
// =============================================================================

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use tracing::debug;
use tracing_subscriber::EnvFilter;

use link_crawler::cli::Cli;
use link_crawler::output;
use link_crawler::Crawler;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    init_tracing(cli.log_level());
    debug!(?cli, "CLI arguments parsed");

    let config = cli.to_config()?;
    let crawler = Crawler::with_http(config).context("could not set up the crawler")?;

    let report = crawler.run().await;

    output::print_report(&report, cli.json).context("failed to write the report")?;

    Ok(0)
}

// RUST_LOG wins when set; otherwise the level comes from -v/-q
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
