//! HTTP transport used by the OMDb client.
//!
//! The client only ever issues GET requests with query parameters and reads
//! a JSON body, so the seam is a single method. Tests substitute a scripted
//! transport to exercise retry and throttling without a network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

/// Transport-level failure of a single request.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}

impl TransportError {
    /// Whether repeating the request could succeed.
    pub fn is_transient(&self) -> bool {
        !matches!(self, TransportError::Decode(_))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout(e.to_string())
        } else if e.is_connect() {
            TransportError::Connect(e.to_string())
        } else if e.is_decode() {
            TransportError::Decode(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

/// Issues a GET request and returns the decoded JSON body.
///
/// HTTP status codes are deliberately not interpreted: the catalog reports
/// success or failure in the payload itself.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, TransportError>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        let response = self.client.get(url).query(query).send().await?;
        let body = response.json::<Value>().await?;
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_errors_are_not_transient() {
        assert!(!TransportError::Decode("eof".to_string()).is_transient());
        assert!(TransportError::Timeout("8s".to_string()).is_transient());
        assert!(TransportError::Connect("refused".to_string()).is_transient());
        assert!(TransportError::Request("reset".to_string()).is_transient());
    }

    #[test]
    fn test_reqwest_transport_builds() {
        assert!(ReqwestTransport::new(Duration::from_secs(8)).is_ok());
    }
}
