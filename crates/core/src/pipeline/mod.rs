//! ETL orchestration.
//!
//! Walks the catalog in file order, resolves each movie, maps the match to
//! enrichment columns and writes the movie, its genres and finally the
//! ratings. Movies are processed one at a time.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::enrich::MovieEnrichment;
use crate::ingest::{dedup_ratings, MovieRow, RatingRow};
use crate::resolver::{MatchTier, ResolutionOutcome, TieredResolver};
use crate::storage::{MovieStore, StorageError};

/// Per-outcome counts of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub movies_processed: usize,
    pub found_exact: usize,
    pub found_cleaned: usize,
    pub found_fuzzy: usize,
    pub cached_found: usize,
    pub cached_missing: usize,
    pub not_found: usize,
    pub skipped: usize,
    pub storage_failures: usize,
    pub ratings_read: usize,
    pub ratings_inserted: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Skipped => self.skipped += 1,
            ResolutionOutcome::Cached { found: true } => self.cached_found += 1,
            ResolutionOutcome::Cached { found: false } => self.cached_missing += 1,
            ResolutionOutcome::Found(MatchTier::Exact) => self.found_exact += 1,
            ResolutionOutcome::Found(MatchTier::Cleaned) => self.found_cleaned += 1,
            ResolutionOutcome::Found(MatchTier::Fuzzy { .. }) => self.found_fuzzy += 1,
            ResolutionOutcome::NotFound => self.not_found += 1,
        }
    }

    /// Movies that ended up with a matched record.
    pub fn enriched(&self) -> usize {
        self.found_exact + self.found_cleaned + self.found_fuzzy + self.cached_found
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} movies ({} enriched: {} exact, {} cleaned, {} fuzzy, {} cached; \
             {} not found, {} cached misses, {} skipped, {} storage failures), \
             {}/{} ratings inserted",
            self.movies_processed,
            self.enriched(),
            self.found_exact,
            self.found_cleaned,
            self.found_fuzzy,
            self.cached_found,
            self.not_found,
            self.cached_missing,
            self.skipped,
            self.storage_failures,
            self.ratings_inserted,
            self.ratings_read,
        )
    }
}

/// Resolves, enriches and stores a movie catalog.
pub struct EtlPipeline {
    resolver: TieredResolver,
    store: Arc<dyn MovieStore>,
    limit: Option<usize>,
}

impl EtlPipeline {
    pub fn new(resolver: TieredResolver, store: Arc<dyn MovieStore>) -> Self {
        Self {
            resolver,
            store,
            limit: None,
        }
    }

    /// Process only the first `limit` movies of the catalog.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn resolver(&self) -> &TieredResolver {
        &self.resolver
    }

    pub fn into_resolver(self) -> TieredResolver {
        self.resolver
    }

    /// Run the ETL over `movies` and `ratings`.
    ///
    /// A failure to store one movie is logged and counted; only a failure
    /// to write the ratings aborts the run.
    pub async fn run(
        &mut self,
        movies: &[MovieRow],
        ratings: Vec<RatingRow>,
    ) -> Result<RunSummary, StorageError> {
        let mut summary = RunSummary::default();
        let total = self.limit.map_or(movies.len(), |l| l.min(movies.len()));
        info!("Processing {} of {} movies", total, movies.len());

        for (i, movie) in movies.iter().take(total).enumerate() {
            let resolution = self.resolver.resolve(&movie.title, movie.year).await;
            summary.movies_processed += 1;
            summary.record(resolution.outcome);

            let enrichment = MovieEnrichment::from_record(resolution.record.as_ref());
            if let Err(e) = self.store_movie(movie, &enrichment) {
                error!("Failed to store movie {} '{}': {}", movie.movie_id, movie.title, e);
                summary.storage_failures += 1;
            }

            if (i + 1) % 100 == 0 {
                info!("Processed {}/{} movies", i + 1, total);
            }
        }

        summary.ratings_read = ratings.len();
        let ratings = dedup_ratings(ratings);
        summary.ratings_inserted = self.store.insert_ratings(&ratings)?;

        info!("ETL finished: {}", summary);
        Ok(summary)
    }

    fn store_movie(
        &self,
        movie: &MovieRow,
        enrichment: &MovieEnrichment,
    ) -> Result<(), StorageError> {
        self.store.upsert_movie(movie, enrichment)?;
        self.store.link_genres(movie.movie_id, &movie.genres)
    }
}
