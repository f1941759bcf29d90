//! Durable resolution cache.
//!
//! Maps each `(raw title, year)` query to the record it resolved to, or to
//! an explicit miss. The whole map is loaded once at startup and flushed to
//! the backend after every new entry, so an interrupted run loses at most
//! the query in flight.

mod json_file;
mod memory;
mod types;

pub use json_file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use types::{CacheEntry, CacheKey};

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

/// All cached entries, ordered by key for stable output.
pub type CacheEntries = BTreeMap<CacheKey, CacheEntry>;

/// Errors from loading or persisting the cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache I/O error at {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Cache file {0:?} is not valid JSON: {1}")]
    Corrupt(PathBuf, #[source] serde_json::Error),

    #[error("Failed to serialize cache: {0}")]
    Serialize(String),
}

/// Where cache entries are stored between runs.
pub trait CacheBackend: Send + Sync {
    /// Read every persisted entry. No persisted state is an empty map.
    fn load(&self) -> Result<CacheEntries, CacheError>;

    /// Durably replace the persisted state with `entries`.
    fn persist(&self, entries: &CacheEntries) -> Result<(), CacheError>;
}

/// The in-process view of the cache plus the backend it flushes to.
pub struct ResolutionCache {
    entries: CacheEntries,
    backend: Box<dyn CacheBackend>,
}

impl ResolutionCache {
    /// Load the cache from `backend`.
    pub fn load(backend: impl CacheBackend + 'static) -> Result<Self, CacheError> {
        let entries = backend.load()?;
        debug!("Loaded {} cached resolutions", entries.len());
        Ok(Self {
            entries,
            backend: Box::new(backend),
        })
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert or overwrite `key`, then flush the full map.
    ///
    /// On a flush error the entry stays in memory and the next successful
    /// flush persists it.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry) -> Result<(), CacheError> {
        self.entries.insert(key, entry);
        self.flush()
    }

    /// Persist the current state.
    pub fn flush(&self) -> Result<(), CacheError> {
        self.backend.persist(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl std::fmt::Debug for ResolutionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionCache")
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}
