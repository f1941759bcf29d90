//! Testing utilities and mock implementations.
//!
//! [`MockExternalCatalog`] stands in for the remote movie catalog so the
//! resolver and the ETL pipeline can be tested without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use cinematch_core::testing::{fixtures, MockExternalCatalog};
//!
//! let catalog = MockExternalCatalog::new();
//! catalog
//!     .set_search_results("heat", vec![fixtures::candidate("Heat", "tt0113277")])
//!     .await;
//! ```

mod mock_external_catalog;

pub use mock_external_catalog::{MockExternalCatalog, RecordedCatalogQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::external_catalog::{ExternalRecord, SearchCandidate, SearchResults};
    use crate::ingest::{MovieRow, RatingRow};

    /// A found record with reasonable defaults.
    pub fn movie_record(title: &str, year: &str, imdb_id: &str) -> ExternalRecord {
        ExternalRecord {
            title: Some(title.to_string()),
            year: Some(year.to_string()),
            imdb_id: Some(imdb_id.to_string()),
            director: Some("Jane Doe".to_string()),
            plot: Some(format!("A film called {}.", title)),
            runtime: Some("120 min".to_string()),
            language: Some("English".to_string()),
            country: Some("USA".to_string()),
            box_office: Some("N/A".to_string()),
            response: Some("True".to_string()),
            ..Default::default()
        }
    }

    /// A found record with the given runtime string.
    pub fn movie_record_with_runtime(
        title: &str,
        year: &str,
        imdb_id: &str,
        runtime: &str,
    ) -> ExternalRecord {
        ExternalRecord {
            runtime: Some(runtime.to_string()),
            ..movie_record(title, year, imdb_id)
        }
    }

    /// The payload the service sends when a title lookup finds nothing.
    pub fn not_found_record() -> ExternalRecord {
        error_record("Movie not found!")
    }

    pub fn error_record(message: &str) -> ExternalRecord {
        ExternalRecord {
            response: Some("False".to_string()),
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn candidate(title: &str, external_id: &str) -> SearchCandidate {
        SearchCandidate {
            title: title.to_string(),
            external_id: external_id.to_string(),
        }
    }

    pub fn search_results(candidates: Vec<SearchCandidate>) -> SearchResults {
        SearchResults {
            candidates,
            response: Some("True".to_string()),
            error: None,
        }
    }

    pub fn empty_search() -> SearchResults {
        SearchResults {
            candidates: vec![],
            response: Some("False".to_string()),
            error: Some("Movie not found!".to_string()),
        }
    }

    pub fn movie_row(movie_id: i64, title: &str, year: Option<i32>, genres: &[&str]) -> MovieRow {
        MovieRow {
            movie_id,
            title: title.to_string(),
            year,
            genres: genres.iter().map(|g| g.to_string()).collect(),
        }
    }

    pub fn rating(user_id: i64, movie_id: i64, rating: f64) -> RatingRow {
        RatingRow {
            user_id,
            movie_id,
            rating,
            timestamp: 964_982_703,
        }
    }
}
