// src/crawl/engine.rs
// =============================================================================
// This module implements the crawl itself: a recursive, depth-bounded,
// parallel expansion of every same-host link reachable from the seed.
//
// How one traversal task works:
// 1. Resolve the raw href against the seed URL
// 2. Skip it if it's on another host (logged as external)
// 3. Claim it in the shared visited set; stop if someone already has it
// 4. Stop if there's no depth left (the URL is still recorded)
// 5. Fetch the page and extract its hrefs
// 6. Spawn one child task per href with one less hop of depth
// 7. Wait for every child, then hand the subtree's tally to our parent
//
// Step 7 is what makes the root's completion mean "the whole reachable set
// has been explored": no task returns while any of its children still runs.
//
// Rust concepts:
// - Arc: every task shares the run context without copying it
// - JoinSet: owns the spawned children; we drain it to wait for all of them
// - BoxFuture: an async fn can't call itself directly (its future would
//   contain itself), so the recursive future is boxed
// - Semaphore: caps how many pages are fetched at once across the run
// =============================================================================

use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::report::{CrawlReport, CrawlTally, TaskOutcome};
use super::scope::{self, HostScope};
use super::state::{Claim, CrawlState};
use crate::config::{ConfigError, CrawlConfig};
use crate::extract::{HtmlLinkExtractor, LinkExtractor};
use crate::fetch::{FetchError, Fetcher, HttpFetcher};

// Errors that stop a crawl before it starts
//
// Once running, nothing is fatal: every failure is local to one task.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// "Expand this one href with this much depth left."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalTask {
    /// The href as found on the page (or the seed itself for the root).
    pub href: String,
    /// Hops still allowed below this page.
    pub remaining_depth: usize,
}

// Everything one run's tasks share
//
// The visited set lives here rather than on Crawler, so each run() starts
// from an empty set.
struct RunContext {
    seed: Url,
    scope: HostScope,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    state: CrawlState,
    // Held only around fetch + extract. Holding it while waiting on
    // children would deadlock once every permit belongs to a waiting parent.
    fetch_permits: Semaphore,
}

/// A configured crawler. Call `run()` to crawl from the seed.
pub struct Crawler {
    config: CrawlConfig,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
}

impl Crawler {
    /// Builds a crawler from any fetcher and extractor.
    pub fn new(
        config: CrawlConfig,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self {
            config,
            fetcher,
            extractor,
        })
    }

    /// Builds a crawler that fetches over HTTP and parses HTML.
    pub fn with_http(config: CrawlConfig) -> Result<Self, SetupError> {
        let fetcher = HttpFetcher::new(&config)?;
        Self::new(config, Arc::new(fetcher), Arc::new(HtmlLinkExtractor::new()))
    }

    /// Crawls from the seed and returns once every task has finished.
    pub async fn run(&self) -> CrawlReport {
        let seed = self.config.seed.clone();
        let context = Arc::new(RunContext {
            seed: seed.clone(),
            scope: HostScope::new(&seed, self.config.allow_subdomains),
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            state: CrawlState::new(),
            fetch_permits: Semaphore::new(self.config.max_in_flight),
        });

        info!(
            seed = %seed,
            max_depth = self.config.max_depth,
            max_in_flight = self.config.max_in_flight,
            "starting crawl"
        );

        let root = TraversalTask {
            href: seed.to_string(),
            remaining_depth: self.config.max_depth,
        };

        // The root lives in a JoinSet owned by this future, like any child:
        // a panic in it is contained, and dropping run() aborts the root,
        // which drops its JoinSet and so on down the tree.
        let mut root_set = JoinSet::new();
        root_set.spawn(expand(Arc::clone(&context), root));

        let tally = match root_set.join_next().await {
            Some(Ok(tally)) => tally,
            Some(Err(join_error)) => {
                warn!(error = %join_error, "root crawl task failed");
                let mut tally = CrawlTally::default();
                tally.record_panic(join_error.to_string());
                tally
            }
            None => CrawlTally::default(),
        };

        let visited = context.state.snapshot();
        info!(
            pages = visited.len(),
            external = tally.external.len(),
            failures = tally.total_failures(),
            "crawl finished"
        );

        CrawlReport {
            seed,
            visited,
            tally,
        }
    }
}

// Runs one task and, transitively, its whole subtree
fn expand(context: Arc<RunContext>, task: TraversalTask) -> BoxFuture<'static, CrawlTally> {
    async move {
        let (outcome, child_hrefs) = context.visit(&task).await;
        let mut tally = CrawlTally::from_outcome(outcome);

        if child_hrefs.is_empty() {
            return tally;
        }

        // visit() only returns hrefs when remaining_depth > 0
        let child_depth = task.remaining_depth - 1;

        // Fan out
        let mut children = JoinSet::new();
        for href in child_hrefs {
            let child = TraversalTask {
                href,
                remaining_depth: child_depth,
            };
            children.spawn(expand(Arc::clone(&context), child));
        }

        // Fan in: drain the set so we return only after every child has
        while let Some(joined) = children.join_next().await {
            match joined {
                Ok(child_tally) => tally.merge(child_tally),
                Err(join_error) => {
                    warn!(parent = %task.href, error = %join_error, "crawl task failed");
                    tally.record_panic(join_error.to_string());
                }
            }
        }

        tally
    }
    .boxed()
}

impl RunContext {
    // Does this task's own work. Returns its outcome plus the hrefs to
    // spawn children for (empty unless the page was expanded).
    async fn visit(&self, task: &TraversalTask) -> (TaskOutcome, Vec<String>) {
        let url = match scope::resolve(&self.seed, &task.href) {
            Ok(url) => url,
            Err(error) => {
                warn!(href = %task.href, error = %error, "skipping malformed link");
                return (TaskOutcome::ResolutionFailed(error), Vec::new());
            }
        };

        if !self.scope.contains(&url) {
            info!(url = %url, "not storing external URL");
            return (TaskOutcome::OutOfScope { url }, Vec::new());
        }

        let claim = self.state.claim(url.as_str(), task.remaining_depth);
        if !claim.should_expand() {
            trace!(url = %url, "already visited");
            return (TaskOutcome::AlreadyVisited { url }, Vec::new());
        }
        if claim == Claim::Deeper {
            debug!(
                url = %url,
                remaining_depth = task.remaining_depth,
                "revisiting with more depth"
            );
        }

        if task.remaining_depth == 0 {
            trace!(url = %url, "depth limit reached, not fetching");
            return (TaskOutcome::Frontier { url }, Vec::new());
        }

        // The semaphore is never closed, so acquire() can't fail here
        let permit = self.fetch_permits.acquire().await.ok();

        debug!(url = %url, remaining_depth = task.remaining_depth, "fetching");
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(error) => {
                warn!(url = %url, error = %error, "fetch failed");
                return (TaskOutcome::FetchFailed { url, error }, Vec::new());
            }
        };

        let hrefs = self.extractor.extract(&page);
        drop(permit);

        debug!(url = %url, links = hrefs.len(), "expanded");
        let children = hrefs.len();
        (TaskOutcome::Expanded { url, children }, hrefs)
    }
}
