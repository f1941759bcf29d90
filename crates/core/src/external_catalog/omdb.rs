//! OMDb (Open Movie Database) API client.
//!
//! OMDb exposes everything on one endpoint selected by query parameters:
//! `t` (+`y`) for a title lookup, `i` for an IMDb id lookup and `s` for a
//! search. Success is reported in the `Response` field of the body, not via
//! HTTP status.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use super::retry::{RetryPolicy, Throttle};
use super::transport::{HttpTransport, ReqwestTransport};
use super::types::{ExternalRecord, SearchResults};
use super::{ExternalCatalog, ExternalCatalogError};
use crate::config::OmdbConfig;

/// OMDb API client.
pub struct OmdbClient<T: HttpTransport = ReqwestTransport> {
    transport: T,
    base_url: String,
    api_key: Option<String>,
    retry: RetryPolicy,
    throttle: Throttle,
}

impl OmdbClient<ReqwestTransport> {
    /// Create a client using the reqwest transport.
    pub fn new(config: &OmdbConfig) -> Result<Self, ExternalCatalogError> {
        let transport = ReqwestTransport::new(config.timeout()).map_err(|e| {
            ExternalCatalogError::NotConfigured(format!("Failed to build HTTP client: {}", e))
        })?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: HttpTransport> OmdbClient<T> {
    /// Create a client on top of an arbitrary transport.
    pub fn with_transport(config: &OmdbConfig, transport: T) -> Self {
        let api_key = config.api_key().map(str::to_string);
        if api_key.is_none() {
            warn!("OMDb API key not set, enrichment will be skipped");
        }

        Self {
            transport,
            base_url: config.base_url.clone(),
            api_key,
            retry: config.retry_policy(),
            throttle: config.throttle(),
        }
    }

    /// Issue one logical call: retried on transient failure, always
    /// followed by the throttle pause.
    async fn call(
        &self,
        mut params: Vec<(&'static str, String)>,
    ) -> Result<Value, ExternalCatalogError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ExternalCatalogError::NotConfigured("OMDb API key is required".to_string())
        })?;

        let label = describe(&params);
        params.push(("apikey", api_key.to_string()));

        let result = self
            .retry
            .run(&label, |_| self.transport.get_json(&self.base_url, &params))
            .await;

        self.throttle.pause().await;

        Ok(result?)
    }

    async fn call_as<R: DeserializeOwned>(
        &self,
        params: Vec<(&'static str, String)>,
    ) -> Result<R, ExternalCatalogError> {
        let body = self.call(params).await?;
        serde_json::from_value(body).map_err(|e| {
            ExternalCatalogError::ParseError(format!("Unexpected OMDb payload: {}", e))
        })
    }
}

/// Human-readable summary of a request for logs; never includes the key.
fn describe(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={:?}", k, v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl<T: HttpTransport> ExternalCatalog for OmdbClient<T> {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn lookup_by_title(
        &self,
        title: &str,
        year: Option<i32>,
    ) -> Result<ExternalRecord, ExternalCatalogError> {
        debug!("OMDb title lookup: title='{}', year={:?}", title, year);

        let mut params = vec![("t", title.to_string())];
        if let Some(y) = year {
            params.push(("y", y.to_string()));
        }
        self.call_as(params).await
    }

    async fn lookup_by_id(
        &self,
        external_id: &str,
    ) -> Result<ExternalRecord, ExternalCatalogError> {
        debug!("OMDb id lookup: id={}", external_id);

        self.call_as(vec![("i", external_id.to_string())]).await
    }

    async fn search(&self, query: &str) -> Result<SearchResults, ExternalCatalogError> {
        debug!("OMDb search: query='{}'", query);

        self.call_as(vec![("s", query.to_string()), ("type", "movie".to_string())])
            .await
    }
}
