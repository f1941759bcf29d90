//! Mock external catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::external_catalog::{
    ExternalCatalog, ExternalCatalogError, ExternalRecord, SearchCandidate, SearchResults,
};

use super::fixtures;

/// A recorded catalog query for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCatalogQuery {
    LookupByTitle { title: String, year: Option<i32> },
    LookupById { external_id: String },
    Search { query: String },
}

/// Mock implementation of the ExternalCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable title, id and search results
/// - Track queries for assertions
/// - Simulate failures and a missing API key
///
/// Title and search keys match case-insensitively. Anything not registered
/// answers with a `"Response": "False"` payload, like the real service.
///
/// # Example
///
/// ```rust,ignore
/// use cinematch_core::testing::{MockExternalCatalog, fixtures};
///
/// let catalog = MockExternalCatalog::new();
/// catalog
///     .add_title("Heat", Some(1995), fixtures::movie_record("Heat", "1995", "tt0113277"))
///     .await;
///
/// let record = catalog.lookup_by_title("heat", Some(1995)).await?;
/// assert!(record.is_found());
/// ```
#[derive(Debug, Clone)]
pub struct MockExternalCatalog {
    /// Records by (lower-cased title, year).
    titles: Arc<RwLock<HashMap<(String, Option<i32>), ExternalRecord>>>,
    /// Records by external id.
    ids: Arc<RwLock<HashMap<String, ExternalRecord>>>,
    /// Candidates by lower-cased search query.
    searches: Arc<RwLock<HashMap<String, Vec<SearchCandidate>>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedCatalogQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<ExternalCatalogError>>>,
    configured: Arc<AtomicBool>,
}

impl Default for MockExternalCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExternalCatalog {
    /// Create a new empty, configured mock catalog.
    pub fn new() -> Self {
        Self {
            titles: Arc::new(RwLock::new(HashMap::new())),
            ids: Arc::new(RwLock::new(HashMap::new())),
            searches: Arc::new(RwLock::new(HashMap::new())),
            queries: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            configured: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Create a mock that behaves as if no API key was given.
    pub fn unconfigured() -> Self {
        let catalog = Self::new();
        catalog.set_configured(false);
        catalog
    }

    pub fn set_configured(&self, configured: bool) {
        self.configured.store(configured, Ordering::SeqCst);
    }

    // =========================================================================
    // Response Configuration
    // =========================================================================

    /// Answer a title lookup for `(title, year)` with `record`.
    pub async fn add_title(&self, title: &str, year: Option<i32>, record: ExternalRecord) {
        self.titles
            .write()
            .await
            .insert((title.to_lowercase(), year), record);
    }

    /// Answer an id lookup for `external_id` with `record`.
    pub async fn add_id(&self, external_id: &str, record: ExternalRecord) {
        self.ids.write().await.insert(external_id.to_string(), record);
    }

    /// Answer a search for `query` with `candidates`, in order.
    pub async fn set_search_results(&self, query: &str, candidates: Vec<SearchCandidate>) {
        self.searches
            .write()
            .await
            .insert(query.to_lowercase(), candidates);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedCatalogQuery> {
        self.queries.read().await.clone()
    }

    /// Clear recorded queries.
    pub async fn clear_recorded(&self) {
        self.queries.write().await.clear();
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: ExternalCatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Take the next error if set.
    async fn take_error(&self) -> Option<ExternalCatalogError> {
        self.next_error.write().await.take()
    }

    /// Record a query.
    async fn record(&self, query: RecordedCatalogQuery) {
        self.queries.write().await.push(query);
    }

    fn ensure_configured(&self) -> Result<(), ExternalCatalogError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ExternalCatalogError::NotConfigured(
                "OMDb API key is required".to_string(),
            ))
        }
    }
}

#[async_trait]
impl ExternalCatalog for MockExternalCatalog {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn lookup_by_title(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<ExternalRecord, ExternalCatalogError> {
        self.ensure_configured()?;
        self.record(RecordedCatalogQuery::LookupByTitle {
            title: title.to_string(),
            year,
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .titles
            .read()
            .await
            .get(&(title.to_lowercase(), year))
            .cloned()
            .unwrap_or_else(fixtures::not_found_record))
    }

    async fn lookup_by_id(
        &self,
        external_id: &str,
    ) -> Result<ExternalRecord, ExternalCatalogError> {
        self.ensure_configured()?;
        self.record(RecordedCatalogQuery::LookupById {
            external_id: external_id.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        Ok(self
            .ids
            .read()
            .await
            .get(external_id)
            .cloned()
            .unwrap_or_else(|| fixtures::error_record("Incorrect IMDb ID.")))
    }

    async fn search(&self, query: &str) -> Result<SearchResults, ExternalCatalogError> {
        self.ensure_configured()?;
        self.record(RecordedCatalogQuery::Search {
            query: query.to_string(),
        })
        .await;

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        let searches = self.searches.read().await;
        match searches.get(&query.to_lowercase()) {
            Some(candidates) if !candidates.is_empty() => {
                Ok(fixtures::search_results(candidates.clone()))
            }
            _ => Ok(fixtures::empty_search()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_title_lookup_is_case_insensitive_and_year_sensitive() {
        let catalog = MockExternalCatalog::new();
        catalog
            .add_title(
                "Heat",
                Some(1995),
                fixtures::movie_record("Heat", "1995", "tt0113277"),
            )
            .await;

        assert!(catalog
            .lookup_by_title("heat", Some(1995))
            .await
            .unwrap()
            .is_found());
        assert!(!catalog.lookup_by_title("Heat", None).await.unwrap().is_found());
        assert_eq!(catalog.query_count().await, 2);
    }

    #[tokio::test]
    async fn test_next_error_applies_once_and_is_recorded() {
        let catalog = MockExternalCatalog::new();
        catalog
            .set_next_error(ExternalCatalogError::ParseError("boom".to_string()))
            .await;

        assert!(catalog.search("heat").await.is_err());
        assert!(!catalog.search("heat").await.unwrap().is_found());
        assert_eq!(
            catalog.recorded_queries().await,
            vec![
                RecordedCatalogQuery::Search {
                    query: "heat".to_string()
                };
                2
            ]
        );
    }

    #[tokio::test]
    async fn test_unconfigured_catalog_records_nothing() {
        let catalog = MockExternalCatalog::unconfigured();

        assert!(!catalog.is_configured());
        assert!(matches!(
            catalog.lookup_by_id("tt0113277").await,
            Err(ExternalCatalogError::NotConfigured(_))
        ));
        assert_eq!(catalog.query_count().await, 0);
    }
}
