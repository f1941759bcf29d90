//! In-memory cache backend for tests.

use std::sync::{Arc, Mutex};

use super::{CacheBackend, CacheEntries, CacheError};

/// Keeps the serialized cache in memory.
///
/// Clones share storage, so a test can hand one clone to a cache, drop the
/// cache, and load a fresh one from another clone to simulate a restart.
/// The state is stored as JSON text to go through the same encoding as the
/// file backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    json: Option<String>,
    persist_count: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times the cache was flushed.
    pub fn persist_count(&self) -> usize {
        self.state.lock().unwrap().persist_count
    }

    /// The last persisted JSON document.
    pub fn snapshot(&self) -> Option<String> {
        self.state.lock().unwrap().json.clone()
    }
}

impl CacheBackend for MemoryBackend {
    fn load(&self) -> Result<CacheEntries, CacheError> {
        match &self.state.lock().unwrap().json {
            Some(json) => {
                serde_json::from_str(json).map_err(|e| CacheError::Serialize(e.to_string()))
            }
            None => Ok(CacheEntries::new()),
        }
    }

    fn persist(&self, entries: &CacheEntries) -> Result<(), CacheError> {
        let json =
            serde_json::to_string(entries).map_err(|e| CacheError::Serialize(e.to_string()))?;
        let mut state = self.state.lock().unwrap();
        state.json = Some(json);
        state.persist_count += 1;
        Ok(())
    }
}
