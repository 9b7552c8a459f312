//! Fetch-through page cache
//!
//! The page store is the only place that decides between the network and the
//! local copy of a page. An existing entry is always trusted: a file truncated
//! by an interrupted earlier run is served as if it were complete.
//!
//! Lookups are serialized per [`PageKey`], so distinct links that map to the
//! same key never both miss. The first one fetches and writes the entry; the
//! rest are served the stored copy.

use crate::crawler::Fetcher;
use crate::storage::{PageKey, PageStorage, StoreResult};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use url::Url;

type KeySlot = Arc<tokio::sync::Mutex<()>>;

/// A page served by [`PageStore::get_or_fetch`]
#[derive(Debug, Clone)]
pub struct StoredPage {
    /// Key the page is stored under
    pub key: PageKey,
    /// Location of the stored copy
    pub path: PathBuf,
    /// Full page body
    pub contents: Vec<u8>,
    /// True when the page came from storage instead of the network
    pub cached: bool,
}

/// Serves pages from storage, fetching and persisting them on a miss
#[derive(Clone)]
pub struct PageStore {
    storage: Arc<dyn PageStorage>,
    fetcher: Fetcher,
    in_flight: Arc<Mutex<HashMap<PageKey, KeySlot>>>,
}

impl PageStore {
    pub fn new(storage: Arc<dyn PageStorage>, fetcher: Fetcher) -> Self {
        Self {
            storage,
            fetcher,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Returns the page for `url`, fetching it only if no stored copy exists
    ///
    /// On a miss the body is read in full, written to a new entry in one
    /// append, and returned. Any read, fetch or write failure is returned
    /// with its cause intact.
    pub async fn get_or_fetch(&self, url: &Url) -> StoreResult<StoredPage> {
        let key = PageKey::from_url(url);
        let slot = self.enter(&key);

        let result = {
            let _held = slot.lock().await;
            self.load(url, key.clone()).await
        };

        self.leave(&key, slot);
        result
    }

    fn enter(&self, key: &PageKey) -> KeySlot {
        let mut slots = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(slots.entry(key.clone()).or_default())
    }

    /// Drops the slot for `key` once no other lookup holds or awaits it
    fn leave(&self, key: &PageKey, slot: KeySlot) {
        let mut slots = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map, one held here.
        if Arc::strong_count(&slot) == 2 {
            slots.remove(key);
        }
    }

    async fn load(&self, url: &Url, key: PageKey) -> StoreResult<StoredPage> {
        let path = self.storage.locate(&key);

        if let Some(contents) = self.storage.read(&key).await? {
            tracing::debug!("Cache hit for {} ({})", url, key);
            return Ok(StoredPage {
                key,
                path,
                contents,
                cached: true,
            });
        }

        let contents = self.fetcher.fetch(url.as_str()).await?;
        self.storage.write(&key, &contents).await?;
        tracing::debug!("Stored {} as {}", url, key);

        Ok(StoredPage {
            key,
            path,
            contents,
            cached: false,
        })
    }
}
