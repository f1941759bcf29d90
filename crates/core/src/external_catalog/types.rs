//! Types for OMDb API responses.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Value of the `Response` field when the service found something.
pub const RESPONSE_TRUE: &str = "True";

/// A single movie record as returned by a title or id lookup.
///
/// The fields the enrichment pipeline reads are typed; everything else the
/// service sends (ratings, poster, awards, ...) is kept in [`extra`] so a
/// cached record is written back exactly as it was received.
///
/// [`extra`]: ExternalRecord::extra
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExternalRecord {
    /// Canonical title.
    #[serde(rename = "Title", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Release year as sent by the service ("1995", "2010–2013").
    #[serde(rename = "Year", default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// IMDb identifier ("tt0113277").
    #[serde(rename = "imdbID", default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Director", default, skip_serializing_if = "Option::is_none")]
    pub director: Option<String>,
    #[serde(rename = "Plot", default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    /// Runtime as a raw string, e.g. "142 min".
    #[serde(rename = "Runtime", default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(rename = "Language", default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(rename = "Country", default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(rename = "BoxOffice", default, skip_serializing_if = "Option::is_none")]
    pub box_office: Option<String>,
    /// Status flag, "True" or "False".
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    /// Error message accompanying a "False" response.
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fields not modelled above.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExternalRecord {
    /// Whether the service reported this record as found.
    pub fn is_found(&self) -> bool {
        self.response.as_deref() == Some(RESPONSE_TRUE)
    }

    /// First four-digit year in the `Year` field.
    pub fn release_year(&self) -> Option<i32> {
        let year = self.year.as_deref()?;
        let digits: String = year.chars().take_while(|c| c.is_ascii_digit()).collect();
        if digits.len() == 4 {
            digits.parse().ok()
        } else {
            None
        }
    }
}

/// One entry of a search response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchCandidate {
    #[serde(rename = "Title", default)]
    pub title: String,
    #[serde(rename = "imdbID", default)]
    pub external_id: String,
}

/// A search response: a bounded page of candidates plus the status flag.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchResults {
    #[serde(rename = "Search", default)]
    pub candidates: Vec<SearchCandidate>,
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SearchResults {
    /// Whether the service reported any results.
    pub fn is_found(&self) -> bool {
        self.response.as_deref() == Some(RESPONSE_TRUE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_from_lookup_payload() {
        let record: ExternalRecord = serde_json::from_value(json!({
            "Title": "Heat",
            "Year": "1995",
            "Runtime": "170 min",
            "Director": "Michael Mann",
            "imdbID": "tt0113277",
            "Ratings": [{"Source": "Internet Movie Database", "Value": "8.3/10"}],
            "Response": "True"
        }))
        .unwrap();

        assert!(record.is_found());
        assert_eq!(record.title.as_deref(), Some("Heat"));
        assert_eq!(record.imdb_id.as_deref(), Some("tt0113277"));
        assert_eq!(record.release_year(), Some(1995));
        assert!(record.extra.contains_key("Ratings"));
    }

    #[test]
    fn test_not_found_payload() {
        let record: ExternalRecord = serde_json::from_value(json!({
            "Response": "False",
            "Error": "Movie not found!"
        }))
        .unwrap();

        assert!(!record.is_found());
        assert_eq!(record.error.as_deref(), Some("Movie not found!"));
    }

    #[test]
    fn test_unknown_fields_survive_serialization() {
        let payload = json!({
            "Title": "Heat",
            "Awards": "Nominated",
            "Poster": "https://example.invalid/heat.jpg",
            "Response": "True"
        });
        let record: ExternalRecord = serde_json::from_value(payload.clone()).unwrap();
        assert_eq!(serde_json::to_value(&record).unwrap(), payload);
    }

    #[test]
    fn test_release_year_handles_ranges_and_junk() {
        let mut record = ExternalRecord {
            year: Some("2010–2013".to_string()),
            ..Default::default()
        };
        assert_eq!(record.release_year(), Some(2010));

        record.year = Some("N/A".to_string());
        assert_eq!(record.release_year(), None);
    }

    #[test]
    fn test_search_results_payload() {
        let results: SearchResults = serde_json::from_value(json!({
            "Search": [
                {"Title": "Heat", "Year": "1995", "imdbID": "tt0113277", "Type": "movie"},
                {"Title": "Heat", "Year": "1986", "imdbID": "tt0093164", "Type": "movie"}
            ],
            "totalResults": "2",
            "Response": "True"
        }))
        .unwrap();

        assert!(results.is_found());
        assert_eq!(results.candidates.len(), 2);
        assert_eq!(results.candidates[1].external_id, "tt0093164");
    }

    #[test]
    fn test_empty_search_payload() {
        let results: SearchResults =
            serde_json::from_value(json!({"Response": "False", "Error": "Too many results."}))
                .unwrap();
        assert!(!results.is_found());
        assert!(results.candidates.is_empty());
    }
}
