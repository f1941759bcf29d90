//! JSON file cache backend.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{CacheBackend, CacheEntries, CacheError};

/// Persists the whole cache as one pretty-printed JSON object.
///
/// Writes go to a sibling temp file that is then renamed over the target, so
/// an interrupted write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl CacheBackend for JsonFileBackend {
    fn load(&self) -> Result<CacheEntries, CacheError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No cache file at {:?}, starting empty", self.path);
                return Ok(CacheEntries::new());
            }
            Err(e) => return Err(CacheError::Io(self.path.clone(), e)),
        };

        serde_json::from_str(&raw).map_err(|e| CacheError::Corrupt(self.path.clone(), e))
    }

    fn persist(&self, entries: &CacheEntries) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| CacheError::Serialize(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CacheError::Io(parent.to_path_buf(), e))?;
        }

        let temp = self.temp_path();
        let mut file = fs::File::create(&temp).map_err(|e| CacheError::Io(temp.clone(), e))?;
        file.write_all(json.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| CacheError::Io(temp.clone(), e))?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|e| CacheError::Io(self.path.clone(), e))
    }
}
