// src/crawl/state.rs
// =============================================================================
// This module owns the one piece of mutable state shared by every task:
// the set of URLs already recorded during this run.
//
// There is exactly one way to write to it, `claim()`, and it does the
// membership check and the insert under the same lock. Nobody can read
// "absent" and then insert after another task already did.
//
// Rust concepts:
// - Mutex<T>: the data lives inside the lock, so it can't be touched unlocked
// - std vs tokio Mutex: the critical section never awaits, so std's is right
// =============================================================================

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// What `claim()` found for a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Claim {
    /// First time this URL was seen. It is now recorded.
    Fresh,
    /// Seen before, but with less depth left than this task has.
    /// The task should expand it again to reach what the earlier one couldn't.
    ///
    /// This costs a second fetch of the page, possibly while the shallower
    /// claim is still fetching it. In exchange the final set doesn't depend
    /// on which path reached the URL first.
    Deeper,
    /// Seen before with at least as much depth left. Nothing more to do.
    Seen,
}

impl Claim {
    /// Whether the claiming task should go on to fetch and expand the URL.
    pub fn should_expand(self) -> bool {
        matches!(self, Claim::Fresh | Claim::Deeper)
    }
}

// The visited set for one crawl run
//
// Each URL maps to the largest remaining depth it has been claimed with.
// Keys are only ever added; values only ever grow.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited: Mutex<HashMap<String, usize>>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically records `url` and reports whether it was new.
    pub fn claim(&self, url: &str, remaining_depth: usize) -> Claim {
        let mut visited = self.lock();

        match visited.get_mut(url) {
            None => {
                visited.insert(url.to_string(), remaining_depth);
                Claim::Fresh
            }
            Some(best) if remaining_depth > *best => {
                *best = remaining_depth;
                Claim::Deeper
            }
            Some(_) => Claim::Seen,
        }
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// A sorted copy of every recorded URL.
    pub fn snapshot(&self) -> BTreeSet<String> {
        self.lock().keys().cloned().collect()
    }

    // A panic while holding the lock can't leave the map half-written
    // (every mutation is a single insert or store), so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, usize>> {
        self.visited.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
