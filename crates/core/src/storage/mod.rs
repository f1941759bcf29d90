//! Relational storage for enriched movies, genres and ratings.

mod sqlite;

pub use sqlite::SqliteMovieStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enrich::MovieEnrichment;
use crate::ingest::{MovieRow, RatingRow};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::Database(e.to_string())
    }
}

/// A movie row as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMovie {
    pub movie_id: i64,
    pub title: String,
    pub year: Option<i32>,
    pub enrichment: MovieEnrichment,
}

/// Trait for movie storage.
pub trait MovieStore: Send + Sync {
    /// Insert a movie or replace the stored one with the same catalog id.
    fn upsert_movie(
        &self,
        movie: &MovieRow,
        enrichment: &MovieEnrichment,
    ) -> Result<(), StorageError>;

    /// Attach genres to a movie, creating unknown genres. Idempotent.
    fn link_genres(&self, movie_id: i64, genres: &[String]) -> Result<(), StorageError>;

    /// Insert ratings for movies that exist in the store.
    ///
    /// Ratings of unknown movies and ratings already stored are skipped.
    /// Returns the number of rows inserted.
    fn insert_ratings(&self, ratings: &[RatingRow]) -> Result<usize, StorageError>;

    /// Get a movie by catalog id.
    fn get_movie(&self, movie_id: i64) -> Result<Option<StoredMovie>, StorageError>;

    /// Genre names of a movie, sorted.
    fn movie_genres(&self, movie_id: i64) -> Result<Vec<String>, StorageError>;

    fn movie_count(&self) -> Result<usize, StorageError>;

    fn rating_count(&self) -> Result<usize, StorageError>;
}
