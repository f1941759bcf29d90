//! Tiered title resolution.
//!
//! Maps a noisy catalog title (and optional year) to one external record by
//! trying increasingly permissive strategies:
//!
//! 1. cache
//! 2. title lookup with the cleaned title and the year
//! 3. title lookup with the cleaned title alone
//! 4. search, fuzzy-rank the candidates, id lookup of the best one
//!
//! Whatever the outcome, it is cached, including a miss, so a query is
//! sent upstream at most once across runs.

mod scoring;
mod types;

pub use scoring::token_sort_ratio;
pub use types::{MatchTier, Resolution, ResolutionOutcome};

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{CacheEntry, CacheKey, ResolutionCache};
use crate::config::ResolverConfig;
use crate::external_catalog::{ExternalCatalog, ExternalRecord, SearchCandidate};
use crate::title::normalize_title;

/// Resolves catalog titles against an external catalog through a cache.
pub struct TieredResolver {
    catalog: Arc<dyn ExternalCatalog>,
    cache: ResolutionCache,
    config: ResolverConfig,
}

impl TieredResolver {
    pub fn new(
        catalog: Arc<dyn ExternalCatalog>,
        cache: ResolutionCache,
        config: ResolverConfig,
    ) -> Self {
        Self {
            catalog,
            cache,
            config,
        }
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn into_cache(self) -> ResolutionCache {
        self.cache
    }

    /// Resolve one query. Never fails: every failure mode ends in an empty
    /// result.
    pub async fn resolve(&mut self, raw_title: &str, year: Option<i32>) -> Resolution {
        if !self.catalog.is_configured() {
            info!("Skipping enrichment for '{}': no API key", raw_title);
            return Resolution::skipped();
        }

        let key = CacheKey::new(raw_title, year);
        if let Some(entry) = self.cache.get(&key) {
            let resolution = Resolution::cached(entry.record().cloned());
            info!("'{}' ({:?}): {}", raw_title, year, resolution.outcome);
            return resolution;
        }

        let resolution = match self.resolve_uncached(raw_title, year).await {
            Some((record, tier)) => Resolution::found(record, tier),
            None => Resolution::not_found(),
        };

        let entry = match &resolution.record {
            Some(record) => CacheEntry::Found(record.clone()),
            None => CacheEntry::Miss,
        };
        if let Err(e) = self.cache.put(key, entry) {
            warn!("Failed to persist cache entry for '{}': {}", raw_title, e);
        }

        match &resolution.record {
            Some(record) => info!(
                "'{}' ({:?}): {} as '{}'",
                raw_title,
                year,
                resolution.outcome,
                record.title.as_deref().unwrap_or_default()
            ),
            None => info!("'{}' ({:?}): {}", raw_title, year, resolution.outcome),
        }

        resolution
    }

    async fn resolve_uncached(
        &self,
        raw_title: &str,
        year: Option<i32>,
    ) -> Option<(ExternalRecord, MatchTier)> {
        let cleaned = normalize_title(raw_title);

        if !cleaned.is_empty() {
            if let Some(record) = self.lookup_title(&cleaned, year).await {
                return Some((record, MatchTier::Exact));
            }

            if cleaned != raw_title {
                if let Some(record) = self.lookup_title(&cleaned, None).await {
                    return Some((record, MatchTier::Cleaned));
                }
            }
        }

        self.fuzzy_match(raw_title, &cleaned).await
    }

    /// A title lookup, with failures and "not found" both mapped to `None`.
    async fn lookup_title(&self, title: &str, year: Option<i32>) -> Option<ExternalRecord> {
        debug!("Title lookup: '{}' ({:?})", title, year);
        match self.catalog.lookup_by_title(title, year).await {
            Ok(record) if record.is_found() => Some(record),
            Ok(record) => {
                debug!(
                    "No title match for '{}': {}",
                    title,
                    record.error.as_deref().unwrap_or("not found")
                );
                None
            }
            Err(e) => {
                warn!("Title lookup for '{}' failed: {}", title, e);
                None
            }
        }
    }

    async fn fuzzy_match(
        &self,
        raw_title: &str,
        cleaned: &str,
    ) -> Option<(ExternalRecord, MatchTier)> {
        let query = if cleaned.is_empty() { raw_title } else { cleaned };

        let results = match self.catalog.search(query).await {
            Ok(results) if results.is_found() => results,
            Ok(_) => {
                debug!("Search for '{}' returned nothing", query);
                return None;
            }
            Err(e) => {
                warn!("Search for '{}' failed: {}", query, e);
                return None;
            }
        };

        let (candidate, score) = best_candidate(cleaned, &results.candidates)?;
        if score < f64::from(self.config.fuzzy_threshold) {
            debug!(
                "Best candidate '{}' scored {:.2} (< {}), rejecting",
                candidate.title, score, self.config.fuzzy_threshold
            );
            return None;
        }

        debug!(
            "Best candidate '{}' ({}) scored {:.2}",
            candidate.title, candidate.external_id, score
        );
        let tier = MatchTier::Fuzzy {
            score: score.round() as u8,
        };
        match self.catalog.lookup_by_id(&candidate.external_id).await {
            Ok(record) if record.is_found() => Some((record, tier)),
            Ok(_) => {
                debug!("Id lookup for {} came back empty", candidate.external_id);
                None
            }
            Err(e) => {
                warn!("Id lookup for {} failed: {}", candidate.external_id, e);
                None
            }
        }
    }
}

/// The first candidate with the strictly highest score against `cleaned`.
///
/// Ties keep the earlier candidate, so the result follows the order the
/// service returned. Candidates scoring 0 are never selected.
fn best_candidate<'a>(
    cleaned: &str,
    candidates: &'a [SearchCandidate],
) -> Option<(&'a SearchCandidate, f64)> {
    let source = cleaned.to_lowercase();
    let mut best: Option<(&SearchCandidate, f64)> = None;

    for candidate in candidates {
        let score = token_sort_ratio(&source, &normalize_title(&candidate.title).to_lowercase());
        if score > best.map_or(0.0, |(_, s)| s) {
            best = Some((candidate, score));
        }
    }

    best
}
