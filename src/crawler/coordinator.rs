//! Crawler coordinator - main crawl orchestration logic
//!
//! Every link is handled by one *branch*:
//! 1. Parse the link; give up on this branch if it is not a URL
//! 2. Claim the link in the [`VisitedSet`]; stop if someone already did
//! 3. Get the page through the [`PageStore`] (disk first, then network)
//! 4. Record the stored file
//! 5. Extract links and hand back the ones nobody has claimed yet
//!
//! Branches are driven either depth-first from a work stack on the calling
//! task, or as a tokio task group where every returned link becomes a new
//! task. Only step 2 takes the visited lock, so fetches and file I/O run in
//! parallel. A semaphore can cap how many branches fetch at once.

use crate::crawler::parser::extract_links;
use crate::crawler::visited::{RetrievedFiles, VisitedSet};
use crate::crawler::{Fetcher, HttpClient};
use crate::output::{CrawlReport, ReportBuilder};
use crate::storage::{DiskStorage, PageStore};
use crate::url::{parse_link, trim_slashes};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Result of expanding one link
#[derive(Debug)]
struct Expansion {
    path: PathBuf,
    cached: bool,
    next: Vec<String>,
}

type BranchResult = crate::Result<Option<Expansion>>;

/// Crawl engine for a single host
///
/// The visited set lives as long as the crawler, so crawling the same seed
/// twice on one instance does nothing the second time.
pub struct Crawler {
    store: PageStore,
    visited: VisitedSet,
    retrieved: RetrievedFiles,
    limiter: Option<Arc<Semaphore>>,
}

impl Crawler {
    /// Creates a crawler that reads and writes pages through `store`
    pub fn new(store: PageStore) -> Self {
        Self {
            store,
            visited: VisitedSet::new(),
            retrieved: RetrievedFiles::new(),
            limiter: None,
        }
    }

    /// Creates a crawler storing pages as files in `downloads_dir`
    ///
    /// The directory must already exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use hostcrawl::config::HttpConfig;
    /// use hostcrawl::crawler::{Crawler, ReqwestClient};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = ReqwestClient::from_config(&HttpConfig::default())?;
    /// let crawler = Arc::new(Crawler::with_client(client, "storage/downloads"));
    /// let report = crawler.crawl("https://example.com").await;
    /// println!("retrieved {} files", report.retrieved.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_client(client: impl HttpClient + 'static, downloads_dir: impl Into<PathBuf>) -> Self {
        let storage = Arc::new(DiskStorage::new(downloads_dir));
        Self::new(PageStore::new(storage, Fetcher::new(client)))
    }

    /// Caps the number of branches fetching at the same time
    ///
    /// A limit of zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    /// Every link claimed so far, sorted
    pub fn visited_links(&self) -> Vec<String> {
        self.visited.to_vec()
    }

    /// Every file written or read so far, sorted
    pub fn retrieved_files(&self) -> Vec<PathBuf> {
        self.retrieved.to_vec()
    }

    /// Returns true if `link` has been claimed for expansion
    pub fn has_visited(&self, link: &str) -> bool {
        self.visited.contains(link)
    }

    /// Crawls from `seed`, expanding new links as concurrent tasks
    ///
    /// Returns once every transitively spawned branch has finished. Branch
    /// failures are logged and listed in the report; they never stop other
    /// branches.
    pub async fn crawl(self: &Arc<Self>, seed: &str) -> CrawlReport {
        let mut report = ReportBuilder::start();
        let mut tasks = JoinSet::new();

        self.spawn_branch(&mut tasks, trim_slashes(seed).to_string());

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((link, outcome)) => {
                    for next in settle(&mut report, link, outcome) {
                        self.spawn_branch(&mut tasks, next);
                    }
                }
                Err(e) => tracing::error!("Crawl task did not complete: {}", e),
            }
        }

        let report = report.finish();
        tracing::info!(
            "Crawl of {} finished: {} links expanded, {} failed, in {:?}",
            seed,
            report.links_expanded,
            report.failures.len(),
            report.elapsed
        );
        report
    }

    /// Crawls from `seed` depth-first on the calling task
    pub async fn crawl_sequential(&self, seed: &str) -> CrawlReport {
        let mut report = ReportBuilder::start();
        let mut stack = vec![trim_slashes(seed).to_string()];

        while let Some(link) = stack.pop() {
            let outcome = self.expand(&link).await;
            stack.extend(settle(&mut report, link, outcome));
        }

        let report = report.finish();
        tracing::info!(
            "Sequential crawl of {} finished: {} links expanded, {} failed, in {:?}",
            seed,
            report.links_expanded,
            report.failures.len(),
            report.elapsed
        );
        report
    }

    fn spawn_branch(
        self: &Arc<Self>,
        tasks: &mut JoinSet<(String, BranchResult)>,
        link: String,
    ) {
        let crawler = Arc::clone(self);
        tasks.spawn(async move {
            let outcome = crawler.expand(&link).await;
            (link, outcome)
        });
    }

    /// Runs one branch
    ///
    /// Returns `Ok(None)` when the link was already claimed.
    async fn expand(&self, link: &str) -> BranchResult {
        let url = parse_link(link)?;

        if !self.visited.claim(link) {
            return Ok(None);
        }
        tracing::info!("-- {}", link);

        let _permit = self.acquire_permit().await;
        let page = self.store.get_or_fetch(&url).await?;
        self.retrieved.record(page.path.clone());

        let next = extract_links(&url, page.contents.as_slice())
            .into_iter()
            .filter(|candidate| !self.visited.contains(candidate))
            .collect();

        Ok(Some(Expansion {
            path: page.path,
            cached: page.cached,
            next,
        }))
    }

    async fn acquire_permit(&self) -> Option<OwnedSemaphorePermit> {
        match &self.limiter {
            Some(limiter) => Arc::clone(limiter).acquire_owned().await.ok(),
            None => None,
        }
    }
}

/// Folds a branch outcome into the report and returns the links to expand next
fn settle(report: &mut ReportBuilder, link: String, outcome: BranchResult) -> Vec<String> {
    match outcome {
        Ok(Some(expansion)) => {
            report.expanded(expansion.path, expansion.cached);
            expansion.next
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Abandoning branch {}: {}", link, e);
            report.failed(link, e);
            Vec::new()
        }
    }
}
