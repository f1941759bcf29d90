use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::external_catalog::{RetryPolicy, Throttle};

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub omdb: OmdbConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
}

/// OMDb client configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct OmdbConfig {
    /// API key. Usually supplied through `OMDB_API_KEY`; enrichment is
    /// skipped when absent.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Endpoint URL (default: http://www.omdbapi.com/)
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 8)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Total attempts per call, first one included (default: 2)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Pause between attempts in milliseconds (default: 500)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
    /// Pause after every call in milliseconds (default: 250)
    #[serde(default = "default_call_delay_ms")]
    pub call_delay_ms: u64,
}

impl OmdbConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.max_attempts,
            Duration::from_millis(self.retry_backoff_ms),
        )
    }

    pub fn throttle(&self) -> Throttle {
        Throttle::new(Duration::from_millis(self.call_delay_ms))
    }

    /// The API key, if one is set and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for OmdbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OmdbConfig")
            .field("api_key_configured", &self.api_key().is_some())
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("call_delay_ms", &self.call_delay_ms)
            .finish()
    }
}

impl Default for OmdbConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            call_delay_ms: default_call_delay_ms(),
        }
    }
}

fn default_base_url() -> String {
    "http://www.omdbapi.com/".to_string()
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    500
}

fn default_call_delay_ms() -> u64 {
    250
}

/// Tiered resolver configuration
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Minimum similarity (0-100) for a fuzzy search candidate to be accepted
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
        }
    }
}

fn default_fuzzy_threshold() -> u8 {
    85
}

/// Lookup cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
        }
    }
}

fn default_cache_path() -> PathBuf {
    PathBuf::from("omdb_cache.json")
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("movies.db")
}

/// Input files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_movies_path")]
    pub movies_path: PathBuf,
    #[serde(default = "default_ratings_path")]
    pub ratings_path: PathBuf,
    /// Only enrich the first N catalog entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            movies_path: default_movies_path(),
            ratings_path: default_ratings_path(),
            limit: None,
        }
    }
}

fn default_movies_path() -> PathBuf {
    PathBuf::from("movies.csv")
}

fn default_ratings_path() -> PathBuf {
    PathBuf::from("ratings.csv")
}
