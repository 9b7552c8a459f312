//! Hostcrawl: a single-host mirroring web crawler
//!
//! This crate fetches a seed page, follows every same-host link it can find,
//! and stores each page it retrieves under a deterministic file name. Links
//! are expanded at most once per crawler, either depth-first on one task or
//! fanned out across tokio tasks.

pub mod config;
pub mod crawler;
pub mod output;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Error raised while expanding a single crawl branch
///
/// Branch errors never escape the crawler; they are logged and collected in
/// the [`output::CrawlReport`] so sibling branches keep going.
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Failed to parse URL {url}: {source}")]
    UrlParse {
        url: String,
        source: ::url::ParseError,
    },

    #[error(transparent)]
    Store(#[from] storage::StoreError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for branch-level crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{extract_links, Crawler, Fetcher, HttpClient, ReqwestClient};
pub use storage::{DiskStorage, PageKey, PageStore, StoreError};
