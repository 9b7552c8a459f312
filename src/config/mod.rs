//! Configuration module for Hostcrawl
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so a crawl can run
//! without one.
//!
//! # Example
//!
//! ```no_run
//! use hostcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("hostcrawl.toml")).unwrap();
//! println!("Request timeout: {}s", config.http.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlMode, CrawlerConfig, HttpConfig, StorageConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_directory_name};
