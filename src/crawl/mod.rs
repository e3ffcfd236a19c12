// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Depth-first, parallel expansion starting from a seed URL
// - Exact same-host restriction (external links are logged, never fetched)
// - Configurable depth limit
// - One shared visited set, so every page is recorded once
// - A global cap on concurrent fetches
//
// Submodules:
// - engine: the recursive traversal and its fan-out / fan-in
// - scope: href resolution and host scoping
// - state: the shared visited set
// - report: per-task outcomes and the run's aggregated result
// =============================================================================

mod engine;
mod report;
mod scope;
mod state;

pub use engine::{Crawler, SetupError, TraversalTask};
pub use report::{CrawlFailure, CrawlReport, CrawlTally, FailureKind, TaskOutcome};
pub use scope::{resolve, HostScope, ResolveError};
pub use state::{Claim, CrawlState};
