//! Filesystem-backed page storage

use crate::storage::{PageKey, PageStorage, StoreError, StoreResult};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Stores each page as one file inside a downloads directory
///
/// The directory must already exist; see [`crate::storage::prepare_downloads_dir`].
#[derive(Debug, Clone)]
pub struct DiskStorage {
    dir: PathBuf,
}

impl DiskStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl PageStorage for DiskStorage {
    fn locate(&self, key: &PageKey) -> PathBuf {
        self.dir.join(key.as_str())
    }

    async fn read(&self, key: &PageKey) -> StoreResult<Option<Vec<u8>>> {
        let path = self.locate(key);
        match fs::read(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Read { path, source }),
        }
    }

    async fn write(&self, key: &PageKey, contents: &[u8]) -> StoreResult<()> {
        let path = self.locate(key);
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|source| StoreError::Create {
                path: path.clone(),
                source,
            })?;

        file.write_all(contents)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;
        file.flush()
            .await
            .map_err(|source| StoreError::Write { path, source })?;

        Ok(())
    }
}
