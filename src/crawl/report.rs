// src/crawl/report.rs
// =============================================================================
// This module describes what each traversal task did, and how those answers
// add up into the result of a whole run.
//
// Every task returns a CrawlTally for its entire subtree. A parent folds
// its children's tallies into its own, so when the root returns, its tally
// covers the run. Failures are data here, not just log lines, so tests and
// callers can inspect them directly.
// =============================================================================

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use url::Url;

use super::scope::ResolveError;
use crate::fetch::FetchError;

/// How a single traversal task ended.
#[derive(Debug)]
pub enum TaskOutcome {
    /// The href could not be resolved to an absolute URL.
    ResolutionFailed(ResolveError),
    /// Resolved to a URL on another host (or a non-web scheme).
    OutOfScope { url: Url },
    /// Another task already claimed this URL with at least as much depth left.
    AlreadyVisited { url: Url },
    /// Recorded, but it sits at the depth limit so it isn't fetched.
    Frontier { url: Url },
    /// Recorded, but the page couldn't be fetched.
    FetchFailed { url: Url, error: FetchError },
    /// Recorded, fetched, and `children` child tasks were spawned.
    Expanded { url: Url, children: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Resolution,
    Fetch,
    Panic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureKind::Resolution => "resolution",
            FailureKind::Fetch => "fetch",
            FailureKind::Panic => "panic",
        };
        f.write_str(name)
    }
}

// One failed branch of the crawl tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    /// The offending URL (or raw href, when it never became a URL).
    pub url: String,
    pub kind: FailureKind,
    pub message: String,
    /// HTTP status, when the failure was a non-2xx response.
    pub status: Option<u16>,
}

/// Counters and details aggregated over a subtree of tasks.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlTally {
    pub expanded: usize,
    pub frontier: usize,
    pub already_visited: usize,
    pub out_of_scope: usize,
    pub resolution_failures: usize,
    pub fetch_failures: usize,
    pub task_panics: usize,
    /// Distinct out-of-scope URLs, in sorted order.
    pub external: BTreeSet<String>,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlTally {
    /// A tally holding just one outcome.
    pub fn from_outcome(outcome: TaskOutcome) -> Self {
        let mut tally = Self::default();
        tally.record(outcome);
        tally
    }

    pub fn record(&mut self, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::ResolutionFailed(error) => {
                self.resolution_failures += 1;
                self.failures.push(CrawlFailure {
                    url: error.raw().to_string(),
                    kind: FailureKind::Resolution,
                    message: error.to_string(),
                    status: None,
                });
            }
            TaskOutcome::OutOfScope { url } => {
                self.out_of_scope += 1;
                self.external.insert(url.to_string());
            }
            TaskOutcome::AlreadyVisited { .. } => self.already_visited += 1,
            TaskOutcome::Frontier { .. } => self.frontier += 1,
            TaskOutcome::FetchFailed { url, error } => {
                self.fetch_failures += 1;
                let status = match &error {
                    FetchError::Status { status, .. } => Some(*status),
                    _ => None,
                };
                self.failures.push(CrawlFailure {
                    url: url.to_string(),
                    kind: FailureKind::Fetch,
                    message: error.to_string(),
                    status,
                });
            }
            TaskOutcome::Expanded { .. } => self.expanded += 1,
        }
    }

    /// A child task died instead of returning a tally.
    pub fn record_panic(&mut self, message: String) {
        self.task_panics += 1;
        self.failures.push(CrawlFailure {
            url: String::new(),
            kind: FailureKind::Panic,
            message,
            status: None,
        });
    }

    /// Folds a child's subtree into this one.
    pub fn merge(&mut self, other: CrawlTally) {
        self.expanded += other.expanded;
        self.frontier += other.frontier;
        self.already_visited += other.already_visited;
        self.out_of_scope += other.out_of_scope;
        self.resolution_failures += other.resolution_failures;
        self.fetch_failures += other.fetch_failures;
        self.task_panics += other.task_panics;
        self.external.extend(other.external);
        self.failures.extend(other.failures);
    }

    pub fn total_failures(&self) -> usize {
        self.resolution_failures + self.fetch_failures + self.task_panics
    }
}

// The result of a finished crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub seed: Url,
    /// Every in-scope URL recorded during the run.
    pub visited: BTreeSet<String>,
    pub tally: CrawlTally,
}

impl CrawlReport {
    /// The visited set as a URL → `true` map, the shape printed as JSON.
    pub fn to_json_map(&self) -> BTreeMap<String, bool> {
        self.visited.iter().map(|url| (url.clone(), true)).collect()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}
