pub mod cache;
pub mod config;
pub mod enrich;
pub mod external_catalog;
pub mod ingest;
pub mod pipeline;
pub mod resolver;
pub mod storage;
pub mod testing;
pub mod title;

pub use cache::{
    CacheBackend, CacheEntry, CacheError, CacheKey, JsonFileBackend, MemoryBackend,
    ResolutionCache,
};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, CacheConfig,
    Config, ConfigError, DatabaseConfig, IngestConfig, OmdbConfig, ResolverConfig,
};
pub use enrich::{parse_runtime, MovieEnrichment};
pub use external_catalog::{
    ExternalCatalog, ExternalCatalogError, ExternalRecord, OmdbClient, SearchCandidate,
    SearchResults,
};
pub use ingest::{dedup_ratings, load_movies, load_ratings, IngestError, MovieRow, RatingRow};
pub use pipeline::{EtlPipeline, RunSummary};
pub use resolver::{
    token_sort_ratio, MatchTier, Resolution, ResolutionOutcome, TieredResolver,
};
pub use storage::{MovieStore, SqliteMovieStore, StorageError, StoredMovie};
pub use title::{normalize_title, split_title_year};
