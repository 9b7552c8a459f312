//! Shared crawl bookkeeping
//!
//! [`VisitedSet`] is the single synchronization point that keeps a link from
//! being expanded twice. [`RetrievedFiles`] is reporting only and has its own
//! lock so it never contends with link claims.

use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Links already claimed for expansion
#[derive(Debug, Default)]
pub struct VisitedSet {
    links: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically checks and inserts `link`
    ///
    /// Returns `true` only for the first caller to claim a link; every later
    /// or concurrent caller gets `false`.
    pub fn claim(&self, link: &str) -> bool {
        let mut links = lock(&self.links);
        if links.contains(link) {
            return false;
        }
        links.insert(link.to_string())
    }

    pub fn contains(&self, link: &str) -> bool {
        lock(&self.links).contains(link)
    }

    pub fn len(&self) -> usize {
        lock(&self.links).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of every claimed link
    pub fn to_vec(&self) -> Vec<String> {
        let mut links: Vec<String> = lock(&self.links).iter().cloned().collect();
        links.sort();
        links
    }
}

/// Append-only set of files written or read during a crawl
#[derive(Debug, Default)]
pub struct RetrievedFiles {
    paths: Mutex<BTreeSet<PathBuf>>,
}

impl RetrievedFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path`, returning `true` if it was not recorded before
    pub fn record(&self, path: PathBuf) -> bool {
        lock(&self.paths).insert(path)
    }

    pub fn len(&self) -> usize {
        lock(&self.paths).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted copy of every recorded path
    pub fn to_vec(&self) -> Vec<PathBuf> {
        lock(&self.paths).iter().cloned().collect()
    }
}
