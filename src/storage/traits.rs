//! Storage traits and error types
//!
//! This module defines the byte-store interface the page store writes through
//! and the errors a cache lookup or write can produce.

use crate::crawler::FetchError;
use crate::storage::PageKey;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while serving or persisting a page
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read cached page {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create page file {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write page file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for page storage backends
///
/// Implementations only need three primitives: locate an entry, read it in
/// full if it exists, and create-then-append its contents. Entries are never
/// deleted or overwritten through this interface.
#[async_trait]
pub trait PageStorage: Send + Sync {
    /// Returns where the entry for `key` lives
    fn locate(&self, key: &PageKey) -> PathBuf;

    /// Reads the whole entry for `key`
    ///
    /// Returns `Ok(None)` when no entry exists yet.
    async fn read(&self, key: &PageKey) -> StoreResult<Option<Vec<u8>>>;

    /// Creates the entry for `key` if needed and appends `contents` in a
    /// single write
    async fn write(&self, key: &PageKey, contents: &[u8]) -> StoreResult<()>;
}
