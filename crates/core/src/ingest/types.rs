use serde::{Deserialize, Serialize};

/// One catalog entry with its title split from the release year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRow {
    /// Catalog identifier; the storage key.
    pub movie_id: i64,
    /// Title without the trailing `(YYYY)`; this is the raw title the
    /// resolver receives.
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
}

/// One user rating.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingRow {
    pub user_id: i64,
    pub movie_id: i64,
    pub rating: f64,
    /// Unix timestamp, seconds.
    pub timestamp: i64,
}

/// Record layout of `movies.csv`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawMovie {
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub genres: Option<String>,
}

/// Record layout of `ratings.csv`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawRating {
    #[serde(rename = "userId")]
    pub user_id: i64,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub rating: f64,
    pub timestamp: i64,
}
