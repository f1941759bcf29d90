//! Loading of the movie catalog and the ratings log.
//!
//! Both inputs are MovieLens-style CSV files with a header row:
//! `movieId,title,genres` and `userId,movieId,rating,timestamp`.

mod types;

pub use types::{MovieRow, RatingRow};

use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::title::split_title_year;
use types::{RawMovie, RawRating};

/// Genre label MovieLens uses for movies without genres.
const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {0:?}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Malformed CSV in {0}: {1}")]
    Csv(String, #[source] csv::Error),
}

/// Load `movies.csv`, preserving file order.
pub fn load_movies(path: &Path) -> Result<Vec<MovieRow>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io(path.to_path_buf(), e))?;
    let movies = read_movies(file, &path.display().to_string())?;
    info!("Loaded {} movies from {:?}", movies.len(), path);
    Ok(movies)
}

/// Load `ratings.csv`, preserving file order.
pub fn load_ratings(path: &Path) -> Result<Vec<RatingRow>, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io(path.to_path_buf(), e))?;
    let ratings = read_ratings(file, &path.display().to_string())?;
    info!("Loaded {} ratings from {:?}", ratings.len(), path);
    Ok(ratings)
}

/// Parse catalog rows from any reader; `source` names it in errors.
pub fn read_movies<R: Read>(reader: R, source: &str) -> Result<Vec<MovieRow>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Fields).from_reader(reader);
    let mut movies = Vec::new();
    for record in rdr.deserialize::<RawMovie>() {
        let raw = record.map_err(|e| IngestError::Csv(source.to_string(), e))?;
        let (title, year) = split_title_year(&raw.title);
        movies.push(MovieRow {
            movie_id: raw.movie_id,
            title,
            year,
            genres: split_genres(raw.genres.as_deref().unwrap_or_default()),
        });
    }
    Ok(movies)
}

/// Parse rating rows from any reader; `source` names it in errors.
pub fn read_ratings<R: Read>(reader: R, source: &str) -> Result<Vec<RatingRow>, IngestError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::Fields).from_reader(reader);
    let mut ratings = Vec::new();
    for record in rdr.deserialize::<RawRating>() {
        let raw = record.map_err(|e| IngestError::Csv(source.to_string(), e))?;
        ratings.push(RatingRow {
            user_id: raw.user_id,
            movie_id: raw.movie_id,
            rating: raw.rating,
            timestamp: raw.timestamp,
        });
    }
    Ok(ratings)
}

fn split_genres(genres: &str) -> Vec<String> {
    genres
        .split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES)
        .map(str::to_string)
        .collect()
}

/// Drop exact duplicate ratings, keeping the first occurrence.
pub fn dedup_ratings(ratings: Vec<RatingRow>) -> Vec<RatingRow> {
    let mut seen = HashSet::new();
    ratings
        .into_iter()
        .filter(|r| seen.insert((r.user_id, r.movie_id, r.rating.to_bits(), r.timestamp)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MOVIES: &str = "\
movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
29,\"City of Lost Children, The (Cité des enfants perdus, La) (1995)\",Adventure|Drama|Fantasy|Mystery|Sci-Fi
114335,La cravate (1957),(no genres listed)
149532,Babylon 5,
";

    #[test]
    fn test_read_movies_splits_title_year_and_genres() {
        let movies = read_movies(MOVIES.as_bytes(), "movies.csv").unwrap();
        assert_eq!(movies.len(), 4);

        assert_eq!(movies[0].movie_id, 1);
        assert_eq!(movies[0].title, "Toy Story");
        assert_eq!(movies[0].year, Some(1995));
        assert_eq!(movies[0].genres.len(), 5);

        assert_eq!(
            movies[1].title,
            "City of Lost Children, The (Cité des enfants perdus, La)"
        );
        assert_eq!(movies[1].year, Some(1995));
    }

    #[test]
    fn test_read_movies_handles_missing_year_and_genres() {
        let movies = read_movies(MOVIES.as_bytes(), "movies.csv").unwrap();

        assert!(movies[2].genres.is_empty());
        assert_eq!(movies[3].title, "Babylon 5");
        assert_eq!(movies[3].year, None);
        assert!(movies[3].genres.is_empty());
    }

    #[test]
    fn test_read_movies_reports_bad_rows() {
        let data = "movieId,title,genres\nnot-a-number,Heat (1995),Action\n";
        let err = read_movies(data.as_bytes(), "movies.csv").unwrap_err();
        assert!(matches!(err, IngestError::Csv(ref source, _) if source == "movies.csv"));
    }

    #[test]
    fn test_read_ratings() {
        let data = "userId,movieId,rating,timestamp\n1,1,4.0,964982703\n1,3,4.5,964981247\n";
        let ratings = read_ratings(data.as_bytes(), "ratings.csv").unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[1].movie_id, 3);
        assert_eq!(ratings[1].rating, 4.5);
        assert_eq!(ratings[1].timestamp, 964981247);
    }

    #[test]
    fn test_dedup_ratings_keeps_first_occurrence() {
        let a = RatingRow {
            user_id: 1,
            movie_id: 1,
            rating: 4.0,
            timestamp: 10,
        };
        let b = RatingRow { rating: 3.5, ..a };

        let deduped = dedup_ratings(vec![a, b, a, b, RatingRow { timestamp: 11, ..a }]);
        assert_eq!(deduped, vec![a, b, RatingRow { timestamp: 11, ..a }]);
    }

    #[test]
    fn test_load_movies_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", MOVIES).unwrap();

        let movies = load_movies(file.path()).unwrap();
        assert_eq!(movies.len(), 4);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_ratings(Path::new("/nonexistent/ratings.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io(_, _)));
    }
}
