use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinematch_core::{
    load_config, load_config_from_env, load_movies, load_ratings, validate_config, Config,
    EtlPipeline, ExternalCatalog, JsonFileBackend, MovieStore, OmdbClient, ResolutionCache,
    SqliteMovieStore, TieredResolver,
};

/// Config file picked up from the working directory when `--config` is not given.
const DEFAULT_CONFIG_PATH: &str = "cinematch.toml";

/// Enrich a MovieLens catalog with OMDb metadata and load it into SQLite.
#[derive(Parser, Debug)]
#[clap(version)]
struct CliArgs {
    /// Path to the TOML configuration file.
    #[clap(long, env = "CINEMATCH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to movies.csv.
    #[clap(long)]
    pub movies: Option<PathBuf>,

    /// Path to ratings.csv.
    #[clap(long)]
    pub ratings: Option<PathBuf>,

    /// Path to the SQLite database to write.
    #[clap(long)]
    pub db: Option<PathBuf>,

    /// Path to the JSON lookup cache.
    #[clap(long)]
    pub cache: Option<PathBuf>,

    /// Only enrich the first N movies.
    #[clap(long)]
    pub limit: Option<usize>,
}

impl CliArgs {
    /// Command-line paths take precedence over the config file and env.
    fn apply(&self, config: &mut Config) {
        if let Some(path) = &self.movies {
            config.ingest.movies_path = path.clone();
        }
        if let Some(path) = &self.ratings {
            config.ingest.ratings_path = path.clone();
        }
        if let Some(path) = &self.db {
            config.database.path = path.clone();
        }
        if let Some(path) = &self.cache {
            config.cache.path = path.clone();
        }
        if self.limit.is_some() {
            config.ingest.limit = self.limit;
        }
    }
}

#[tokio::main]
async fn main() {
    let args = CliArgs::parse();
    if let Err(e) = run(args).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = resolve_config(&args)?;
    args.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    info!("Movies: {:?}", config.ingest.movies_path);
    info!("Ratings: {:?}", config.ingest.ratings_path);
    info!("Database path: {:?}", config.database.path);
    info!("Cache path: {:?}", config.cache.path);

    let movies = load_movies(&config.ingest.movies_path).context("Failed to load movies")?;
    let ratings = load_ratings(&config.ingest.ratings_path).context("Failed to load ratings")?;

    let catalog: Arc<dyn ExternalCatalog> =
        Arc::new(OmdbClient::new(&config.omdb).context("Failed to create OMDb client")?);

    let cache = ResolutionCache::load(JsonFileBackend::new(&config.cache.path))
        .with_context(|| format!("Failed to load cache from {:?}", config.cache.path))?;
    info!("Loaded {} cached lookups", cache.len());

    let store: Arc<dyn MovieStore> = Arc::new(
        SqliteMovieStore::new(&config.database.path).context("Failed to open database")?,
    );

    let resolver = TieredResolver::new(catalog, cache, config.resolver);
    let mut pipeline = EtlPipeline::new(resolver, store.clone()).with_limit(config.ingest.limit);
    let summary = pipeline.run(&movies, ratings).await.context("ETL run failed")?;

    info!(
        "Done: {} movies and {} ratings in {:?}",
        store.movie_count()?,
        store.rating_count()?,
        config.database.path
    );
    if summary.storage_failures > 0 {
        warn!("{} movies could not be stored", summary.storage_failures);
    }

    Ok(())
}

/// Explicit `--config` must exist; otherwise use the default file if present,
/// falling back to defaults plus environment.
fn resolve_config(args: &CliArgs) -> Result<Config> {
    if let Some(path) = &args.config {
        info!("Loading configuration from {:?}", path);
        return load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path));
    }

    let default_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        info!("Loading configuration from {:?}", default_path);
        return load_config(&default_path)
            .with_context(|| format!("Failed to load config from {:?}", default_path));
    }

    info!("No config file, using defaults and environment");
    load_config_from_env().context("Failed to load config from environment")
}
