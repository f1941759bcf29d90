//! Cache keys and entries.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::external_catalog::ExternalRecord;

/// Identifies one `(raw title, year)` query: `"<raw_title>||<year or empty>"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(raw_title: &str, year: Option<i32>) -> Self {
        match year {
            Some(y) => Self(format!("{}||{}", raw_title, y)),
            None => Self(format!("{}||", raw_title)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stored outcome of a resolution.
///
/// `Miss` records a confirmed "not found" and is persisted as `{}`; it is a
/// final answer, not an absence of one.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEntry {
    Found(ExternalRecord),
    Miss,
}

impl CacheEntry {
    pub fn record(&self) -> Option<&ExternalRecord> {
        match self {
            CacheEntry::Found(record) => Some(record),
            CacheEntry::Miss => None,
        }
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, CacheEntry::Miss)
    }
}

impl Serialize for CacheEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CacheEntry::Found(record) => record.serialize(serializer),
            CacheEntry::Miss => Map::new().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for CacheEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // `null` shows up in hand-edited files; treat it like `{}`.
        let map = Option::<Map<String, Value>>::deserialize(deserializer)?;
        match map {
            None => Ok(CacheEntry::Miss),
            Some(map) if map.is_empty() => Ok(CacheEntry::Miss),
            Some(map) => serde_json::from_value(Value::Object(map))
                .map(CacheEntry::Found)
                .map_err(D::Error::custom),
        }
    }
}
