//! Storage module for persisting crawled pages
//!
//! This module handles everything that touches durable storage:
//! - Deriving a deterministic [`PageKey`] for each URL
//! - The [`PageStorage`] interface and its filesystem backend
//! - The fetch-through [`PageStore`] cache used by the crawler
//! - Bootstrapping the downloads directory

mod disk;
mod key;
mod page_store;
mod traits;

pub use disk::DiskStorage;
pub use key::PageKey;
pub use page_store::{PageStore, StoredPage};
pub use traits::{PageStorage, StoreError, StoreResult};

use std::path::{Path, PathBuf};

/// Default storage root, relative to the working directory
pub const DEFAULT_STORAGE_ROOT: &str = "storage";

/// Default downloads subdirectory beneath the storage root
pub const DEFAULT_DOWNLOADS_DIR: &str = "downloads";

/// Creates `<root>/<name>` if it does not exist yet and returns its path
///
/// On unix the directory is created with mode `0750`.
///
/// # Example
///
/// ```no_run
/// use hostcrawl::storage::prepare_downloads_dir;
/// use std::path::Path;
///
/// let dir = prepare_downloads_dir(Path::new("storage"), "downloads").unwrap();
/// assert!(dir.ends_with("storage/downloads"));
/// ```
pub fn prepare_downloads_dir(root: &Path, name: &str) -> std::io::Result<PathBuf> {
    let dir = root.join(name);
    if dir.is_dir() {
        return Ok(dir);
    }

    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(0o750);
    }
    builder.create(&dir)?;

    tracing::debug!("Created downloads directory {}", dir.display());
    Ok(dir)
}
