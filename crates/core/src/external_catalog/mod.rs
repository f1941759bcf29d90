//! External catalog integration.
//!
//! The resolver talks to the remote movie catalog only through the
//! [`ExternalCatalog`] trait. [`OmdbClient`] is the production
//! implementation; it adds the API key, retries transient transport
//! failures and paces requests.

mod omdb;
mod retry;
mod transport;
mod types;

pub use omdb::OmdbClient;
pub use retry::{RetryFailure, RetryPolicy, Throttle};
pub use transport::{HttpTransport, ReqwestTransport, TransportError};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with the external catalog.
///
/// A "not found" answer is not an error: it comes back as a record or
/// search page whose status flag is false.
#[derive(Debug, Error)]
pub enum ExternalCatalogError {
    /// Transport kept failing until the retry policy gave up.
    #[error("Request failed after {attempts} attempt(s): {source}")]
    TransportExhausted {
        attempts: u32,
        #[source]
        source: TransportError,
    },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl From<RetryFailure> for ExternalCatalogError {
    fn from(failure: RetryFailure) -> Self {
        ExternalCatalogError::TransportExhausted {
            attempts: failure.attempts,
            source: failure.last_error,
        }
    }
}

/// Operations the resolver needs from a movie catalog.
#[async_trait]
pub trait ExternalCatalog: Send + Sync {
    /// Whether credentials are present. An unconfigured catalog makes no
    /// network calls.
    fn is_configured(&self) -> bool;

    /// Look a movie up by exact title, optionally constrained to a year.
    async fn lookup_by_title(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<ExternalRecord, ExternalCatalogError>;

    /// Look a movie up by its catalog id.
    async fn lookup_by_id(&self, external_id: &str) -> Result<ExternalRecord, ExternalCatalogError>;

    /// Search movies by title; returns one page of candidates.
    async fn search(&self, query: &str) -> Result<SearchResults, ExternalCatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_failure_converts_to_transport_exhausted() {
        let err: ExternalCatalogError = RetryFailure {
            attempts: 2,
            last_error: TransportError::Timeout("8s".to_string()),
        }
        .into();

        assert!(matches!(
            err,
            ExternalCatalogError::TransportExhausted { attempts: 2, .. }
        ));
        assert!(err.to_string().contains("2 attempt(s)"));
    }
}
