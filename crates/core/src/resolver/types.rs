//! Resolution results.

use std::fmt;

use crate::external_catalog::ExternalRecord;

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    /// Title lookup with the cleaned title and the year.
    Exact,
    /// Title lookup with the cleaned title alone.
    Cleaned,
    /// Search followed by an id lookup of the best-scoring candidate.
    /// `score` is the similarity rounded to a whole percent, for reporting.
    Fuzzy { score: u8 },
}

/// How a query was answered. Reported for visibility only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// No API key; nothing was looked up.
    Skipped,
    /// Answered from the cache without network calls.
    Cached { found: bool },
    /// Resolved through the network.
    Found(MatchTier),
    /// Every tier came up empty; a miss was cached.
    NotFound,
}

impl fmt::Display for ResolutionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionOutcome::Skipped => write!(f, "skipped (no API key)"),
            ResolutionOutcome::Cached { found: true } => write!(f, "found (cached)"),
            ResolutionOutcome::Cached { found: false } => write!(f, "not found (cached)"),
            ResolutionOutcome::Found(MatchTier::Exact) => write!(f, "found"),
            ResolutionOutcome::Found(MatchTier::Cleaned) => write!(f, "found (cleaned title)"),
            ResolutionOutcome::Found(MatchTier::Fuzzy { score }) => {
                write!(f, "found (fuzzy match, score {})", score)
            }
            ResolutionOutcome::NotFound => write!(f, "not found"),
        }
    }
}

/// Result of resolving one `(raw title, year)` query.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The matched record; `None` for an empty result.
    pub record: Option<ExternalRecord>,
    pub outcome: ResolutionOutcome,
}

impl Resolution {
    pub fn skipped() -> Self {
        Self {
            record: None,
            outcome: ResolutionOutcome::Skipped,
        }
    }

    pub fn not_found() -> Self {
        Self {
            record: None,
            outcome: ResolutionOutcome::NotFound,
        }
    }

    pub fn found(record: ExternalRecord, tier: MatchTier) -> Self {
        Self {
            record: Some(record),
            outcome: ResolutionOutcome::Found(tier),
        }
    }

    pub fn cached(record: Option<ExternalRecord>) -> Self {
        let found = record.as_ref().is_some_and(ExternalRecord::is_found);
        Self {
            record,
            outcome: ResolutionOutcome::Cached { found },
        }
    }

    pub fn is_found(&self) -> bool {
        self.record.as_ref().is_some_and(ExternalRecord::is_found)
    }
}
