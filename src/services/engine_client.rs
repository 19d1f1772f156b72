//! Analysis engine client
//!
//! Issues the single POST per submission against the remote analysis
//! engine and triages the outcome into the transport failure taxonomy.
//! No authentication, retry, or pagination; one fire-and-forget call per
//! submission.

use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("webaudit/", env!("CARGO_PKG_VERSION"));

/// Engine call errors; all surface as transport failures at the session
#[derive(Debug, Error)]
pub enum EngineError {
    /// Connectivity failure or timeout
    #[error("Engine unreachable: {0}")]
    Network(String),

    /// Engine answered with a non-2xx status
    #[error("Engine returned HTTP {0}")]
    Status(u16),

    /// 2xx answer whose body was not JSON
    #[error("Engine response was not valid JSON: {0}")]
    InvalidBody(String),
}

/// HTTP client for the analysis engine
#[derive(Debug, Clone)]
pub struct EngineClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl EngineClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, EngineError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| EngineError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    /// Submit a URL for analysis and return the untyped payload
    ///
    /// Validation of the payload happens at the session, not here; the
    /// client only distinguishes transport outcomes.
    pub async fn analyze(&self, url: &str) -> Result<Value, EngineError> {
        tracing::debug!(url = %url, endpoint = %self.endpoint, "Submitting URL to analysis engine");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "url": url }))
            .send()
            .await
            .map_err(|e| EngineError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| EngineError::InvalidBody(e.to_string()))?;

        tracing::info!(url = %url, "Received analysis payload from engine");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = EngineClient::new("http://127.0.0.1:8000/analyze", Duration::from_secs(30));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_engine_is_network_error() {
        // Nothing listens on this port
        let client =
            EngineClient::new("http://127.0.0.1:1/analyze", Duration::from_secs(2)).unwrap();
        let result = client.analyze("https://example.com").await;
        assert!(matches!(result, Err(EngineError::Network(_))));
    }
}
