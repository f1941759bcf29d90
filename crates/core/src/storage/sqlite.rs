//! SQLite-backed movie store implementation.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection, OptionalExtension};

use super::{MovieStore, StorageError, StoredMovie};
use crate::enrich::MovieEnrichment;
use crate::ingest::{MovieRow, RatingRow};

/// SQLite-backed movie store.
pub struct SqliteMovieStore {
    conn: Mutex<Connection>,
}

impl SqliteMovieStore {
    /// Open the database file, creating it and the tables if needed.
    pub fn new(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            -- One row per catalog movie, enrichment columns nullable
            CREATE TABLE IF NOT EXISTS movies (
                movie_id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                year INTEGER,
                imdb_id TEXT,
                director TEXT,
                plot TEXT,
                box_office TEXT,
                runtime INTEGER,
                language TEXT,
                country TEXT
            );

            CREATE TABLE IF NOT EXISTS genres (
                genre_id INTEGER PRIMARY KEY AUTOINCREMENT,
                genre TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS movie_genres (
                movie_id INTEGER NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
                genre_id INTEGER NOT NULL REFERENCES genres(genre_id),
                PRIMARY KEY (movie_id, genre_id)
            );

            CREATE TABLE IF NOT EXISTS ratings (
                user_id INTEGER NOT NULL,
                movie_id INTEGER NOT NULL REFERENCES movies(movie_id) ON DELETE CASCADE,
                rating REAL NOT NULL,
                timestamp INTEGER NOT NULL,
                UNIQUE (user_id, movie_id, rating, timestamp)
            );

            CREATE INDEX IF NOT EXISTS idx_ratings_movie ON ratings(movie_id);
            "#,
        )?;

        Ok(())
    }
}

impl MovieStore for SqliteMovieStore {
    fn upsert_movie(
        &self,
        movie: &MovieRow,
        enrichment: &MovieEnrichment,
    ) -> Result<(), StorageError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO movies
                (movie_id, title, year, imdb_id, director, plot, box_office, runtime, language, country)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(movie_id) DO UPDATE SET
                title = excluded.title,
                year = excluded.year,
                imdb_id = excluded.imdb_id,
                director = excluded.director,
                plot = excluded.plot,
                box_office = excluded.box_office,
                runtime = excluded.runtime,
                language = excluded.language,
                country = excluded.country",
            params![
                movie.movie_id,
                &movie.title,
                movie.year,
                &enrichment.imdb_id,
                &enrichment.director,
                &enrichment.plot,
                &enrichment.box_office,
                enrichment.runtime_minutes,
                &enrichment.language,
                &enrichment.country,
            ],
        )?;
        Ok(())
    }

    fn link_genres(&self, movie_id: i64, genres: &[String]) -> Result<(), StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        for genre in genres {
            tx.execute(
                "INSERT OR IGNORE INTO genres (genre) VALUES (?)",
                params![genre],
            )?;
            let genre_id: i64 = tx.query_row(
                "SELECT genre_id FROM genres WHERE genre = ?",
                params![genre],
                |row| row.get(0),
            )?;
            tx.execute(
                "INSERT OR IGNORE INTO movie_genres (movie_id, genre_id) VALUES (?, ?)",
                params![movie_id, genre_id],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn insert_ratings(&self, ratings: &[RatingRow]) -> Result<usize, StorageError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut inserted = 0;
        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO ratings (user_id, movie_id, rating, timestamp)
                 SELECT ?1, ?2, ?3, ?4
                 WHERE EXISTS (SELECT 1 FROM movies WHERE movie_id = ?2)",
            )?;
            for rating in ratings {
                inserted += stmt.execute(params![
                    rating.user_id,
                    rating.movie_id,
                    rating.rating,
                    rating.timestamp,
                ])?;
            }
        }
        tx.commit()?;
        Ok(inserted)
    }

    fn get_movie(&self, movie_id: i64) -> Result<Option<StoredMovie>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let movie = conn
            .query_row(
                "SELECT movie_id, title, year, imdb_id, director, plot,
                        box_office, runtime, language, country
                 FROM movies WHERE movie_id = ?",
                params![movie_id],
                |row| {
                    Ok(StoredMovie {
                        movie_id: row.get(0)?,
                        title: row.get(1)?,
                        year: row.get(2)?,
                        enrichment: MovieEnrichment {
                            imdb_id: row.get(3)?,
                            director: row.get(4)?,
                            plot: row.get(5)?,
                            box_office: row.get(6)?,
                            runtime_minutes: row.get(7)?,
                            language: row.get(8)?,
                            country: row.get(9)?,
                        },
                    })
                },
            )
            .optional()?;
        Ok(movie)
    }

    fn movie_genres(&self, movie_id: i64) -> Result<Vec<String>, StorageError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT g.genre FROM genres g
             JOIN movie_genres mg ON mg.genre_id = g.genre_id
             WHERE mg.movie_id = ?
             ORDER BY g.genre",
        )?;
        let rows = stmt.query_map(params![movie_id], |row| row.get(0))?;

        let mut genres = Vec::new();
        for row in rows {
            genres.push(row?);
        }
        Ok(genres)
    }

    fn movie_count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM movies", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn rating_count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM ratings", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> SqliteMovieStore {
        SqliteMovieStore::in_memory().unwrap()
    }

    fn movie(movie_id: i64, title: &str, year: Option<i32>) -> MovieRow {
        MovieRow {
            movie_id,
            title: title.to_string(),
            year,
            genres: vec![],
        }
    }

    fn rating(user_id: i64, movie_id: i64, rating: f64) -> RatingRow {
        RatingRow {
            user_id,
            movie_id,
            rating,
            timestamp: 964982703,
        }
    }

    fn heat_enrichment() -> MovieEnrichment {
        MovieEnrichment {
            imdb_id: Some("tt0113277".to_string()),
            director: Some("Michael Mann".to_string()),
            runtime_minutes: Some(170),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_and_get_movie() {
        let store = create_test_store();
        store
            .upsert_movie(&movie(6, "Heat", Some(1995)), &heat_enrichment())
            .unwrap();

        let stored = store.get_movie(6).unwrap().unwrap();
        assert_eq!(stored.title, "Heat");
        assert_eq!(stored.year, Some(1995));
        assert_eq!(stored.enrichment, heat_enrichment());
        assert!(store.get_movie(7).unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_existing_movie() {
        let store = create_test_store();
        store
            .upsert_movie(&movie(6, "Heat", Some(1995)), &MovieEnrichment::default())
            .unwrap();
        store
            .upsert_movie(&movie(6, "Heat", Some(1995)), &heat_enrichment())
            .unwrap();

        assert_eq!(store.movie_count().unwrap(), 1);
        assert_eq!(
            store.get_movie(6).unwrap().unwrap().enrichment.runtime_minutes,
            Some(170)
        );
    }

    #[test]
    fn test_upsert_keeps_genres_and_ratings() {
        let store = create_test_store();
        let heat = movie(6, "Heat", Some(1995));
        store.upsert_movie(&heat, &MovieEnrichment::default()).unwrap();
        store.link_genres(6, &["Action".to_string()]).unwrap();
        store.insert_ratings(&[rating(1, 6, 4.0)]).unwrap();

        store.upsert_movie(&heat, &heat_enrichment()).unwrap();

        assert_eq!(store.movie_genres(6).unwrap(), vec!["Action"]);
        assert_eq!(store.rating_count().unwrap(), 1);
    }

    #[test]
    fn test_link_genres_is_idempotent_and_shares_genres() {
        let store = create_test_store();
        store
            .upsert_movie(&movie(1, "Toy Story", Some(1995)), &MovieEnrichment::default())
            .unwrap();
        store
            .upsert_movie(&movie(2, "Jumanji", Some(1995)), &MovieEnrichment::default())
            .unwrap();

        let genres = vec!["Children".to_string(), "Adventure".to_string()];
        store.link_genres(1, &genres).unwrap();
        store.link_genres(1, &genres).unwrap();
        store.link_genres(2, &["Adventure".to_string()]).unwrap();

        assert_eq!(store.movie_genres(1).unwrap(), vec!["Adventure", "Children"]);
        assert_eq!(store.movie_genres(2).unwrap(), vec!["Adventure"]);

        let conn = store.conn.lock().unwrap();
        let genre_rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM genres", [], |row| row.get(0))
            .unwrap();
        assert_eq!(genre_rows, 2);
    }

    #[test]
    fn test_insert_ratings_skips_unknown_movies_and_duplicates() {
        let store = create_test_store();
        store
            .upsert_movie(&movie(1, "Toy Story", Some(1995)), &MovieEnrichment::default())
            .unwrap();

        let inserted = store
            .insert_ratings(&[rating(1, 1, 4.0), rating(2, 1, 3.0), rating(1, 999, 5.0)])
            .unwrap();
        assert_eq!(inserted, 2);

        let inserted = store.insert_ratings(&[rating(1, 1, 4.0)]).unwrap();
        assert_eq!(inserted, 0);
        assert_eq!(store.rating_count().unwrap(), 2);
    }

    #[test]
    fn test_file_store_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("movies.db");

        {
            let store = SqliteMovieStore::new(&path).unwrap();
            store
                .upsert_movie(&movie(6, "Heat", Some(1995)), &heat_enrichment())
                .unwrap();
        }

        let store = SqliteMovieStore::new(&path).unwrap();
        assert_eq!(store.movie_count().unwrap(), 1);
    }
}
