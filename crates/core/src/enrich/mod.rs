//! Flattening of external records into the fields stored per movie.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::external_catalog::ExternalRecord;

static RUNTIME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+) min\s*$").expect("valid runtime regex"));

/// OMDb's placeholder for a missing value.
const NOT_AVAILABLE: &str = "N/A";

/// Enrichment columns written alongside a catalog movie.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieEnrichment {
    pub imdb_id: Option<String>,
    pub director: Option<String>,
    pub plot: Option<String>,
    pub box_office: Option<String>,
    pub runtime_minutes: Option<u32>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl MovieEnrichment {
    /// Map a resolved record. No record, or a record the service did not
    /// report as found, yields all-empty fields.
    pub fn from_record(record: Option<&ExternalRecord>) -> Self {
        let Some(record) = record.filter(|r| r.is_found()) else {
            return Self::default();
        };

        Self {
            imdb_id: present(&record.imdb_id),
            director: present(&record.director),
            plot: present(&record.plot),
            box_office: present(&record.box_office),
            runtime_minutes: record.runtime.as_deref().and_then(parse_runtime),
            language: present(&record.language),
            country: present(&record.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && *v != NOT_AVAILABLE)
        .map(str::to_string)
}

/// Parse a runtime such as `"142 min"` into minutes.
///
/// Anything not of the form `<N> min` (including `"N/A"`) yields `None`.
pub fn parse_runtime(raw: &str) -> Option<u32> {
    RUNTIME.captures(raw)?.get(1)?.as_str().parse().ok()
}
