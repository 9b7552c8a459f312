//! Per-call crawl report
//!
//! A report covers one call to [`crate::Crawler::crawl`] or
//! [`crate::Crawler::crawl_sequential`]. It is assembled by the task driving
//! the crawl, never by the branch tasks themselves.

use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// A branch that was abandoned
#[derive(Debug)]
pub struct BranchFailure {
    /// Link the branch was expanding
    pub link: String,
    /// Why it stopped
    pub error: CrawlError,
}

/// Summary of a single crawl call
#[derive(Debug)]
pub struct CrawlReport {
    /// When the call started
    pub started_at: DateTime<Utc>,

    /// Wall time of the call
    pub elapsed: Duration,

    /// Links claimed and expanded during the call
    pub links_expanded: usize,

    /// Files written or read during the call, in retrieval order
    pub retrieved: Vec<PathBuf>,

    /// How many of the retrieved files were already on disk
    pub cache_hits: usize,

    /// Branches abandoned during the call
    pub failures: Vec<BranchFailure>,
}

impl CrawlReport {
    /// Number of pages fetched from the network during the call
    pub fn pages_fetched(&self) -> usize {
        self.retrieved.len() - self.cache_hits
    }

    /// Returns true if no branch was abandoned
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Accumulates a [`CrawlReport`] while a crawl runs
#[derive(Debug)]
pub(crate) struct ReportBuilder {
    started_at: DateTime<Utc>,
    clock: Instant,
    links_expanded: usize,
    retrieved: Vec<PathBuf>,
    cache_hits: usize,
    failures: Vec<BranchFailure>,
}

impl ReportBuilder {
    pub(crate) fn start() -> Self {
        Self {
            started_at: Utc::now(),
            clock: Instant::now(),
            links_expanded: 0,
            retrieved: Vec::new(),
            cache_hits: 0,
            failures: Vec::new(),
        }
    }

    pub(crate) fn expanded(&mut self, path: PathBuf, cached: bool) {
        self.links_expanded += 1;
        if cached {
            self.cache_hits += 1;
        }
        self.retrieved.push(path);
    }

    pub(crate) fn failed(&mut self, link: String, error: CrawlError) {
        self.failures.push(BranchFailure { link, error });
    }

    pub(crate) fn finish(self) -> CrawlReport {
        CrawlReport {
            started_at: self.started_at,
            elapsed: self.clock.elapsed(),
            links_expanded: self.links_expanded,
            retrieved: self.retrieved,
            cache_hits: self.cache_hits,
            failures: self.failures,
        }
    }
}
