use crate::storage::{DEFAULT_DOWNLOADS_DIR, DEFAULT_STORAGE_ROOT};
use serde::Deserialize;

/// Main configuration structure for Hostcrawl
///
/// Every table and field is optional; missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub http: HttpConfig,
    pub storage: StorageConfig,
}

/// How discovered links are expanded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlMode {
    /// Every new link runs as its own task
    #[default]
    Concurrent,
    /// Depth-first on a single task
    Sequential,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Expansion strategy
    pub mode: CrawlMode,

    /// Maximum number of branches fetching at once (unbounded when absent)
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: Option<usize>,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-secs")]
    pub connect_timeout_secs: u64,

    /// Skip TLS certificate verification
    #[serde(rename = "accept-invalid-certs")]
    pub accept_invalid_certs: bool,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("hostcrawl/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 30,
            connect_timeout_secs: 10,
            accept_invalid_certs: false,
        }
    }
}

/// Where pages are written
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage root directory
    pub root: String,

    /// Subdirectory of the root that receives the pages
    pub directory: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_STORAGE_ROOT.to_string(),
            directory: DEFAULT_DOWNLOADS_DIR.to_string(),
        }
    }
}
