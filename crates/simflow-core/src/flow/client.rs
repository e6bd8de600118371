//! HTTP access to the SIM card flow endpoints.

use std::time::Duration;

use tracing::debug;

use super::types::ReadResponse;

/// Default host of the flow service
pub const DEFAULT_BASE_URL: &str = "https://xj.iot998.cn";
/// Endpoint that makes the service recompute usage; its response is ignored
pub const REFRESH_PATH: &str = "/app/simCard/getCardFlow";
/// Endpoint that returns the authoritative usage record
pub const READ_PATH: &str = "/app/simCard/phoneSimCard";

/// Transport-level failure talking to the flow service
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, DNS, TLS or timeout failure
    #[error("request failed: {0}")]
    Transport(String),
    /// Server answered with a non-success HTTP status
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// Body was not the expected JSON envelope
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// The two calls of the flow service, keyed by card identifier
pub trait FlowApi: Send + Sync {
    /// Ask the service to recompute usage for `card`
    fn trigger_refresh(&self, card: &str) -> Result<(), FetchError>;

    /// Read the current usage record for `card`
    fn read_card(&self, card: &str) -> Result<ReadResponse, FetchError>;
}

/// Blocking [`FlowApi`] implementation over ureq
#[derive(Clone)]
pub struct HttpFlowApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpFlowApi {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();

        Self {
            agent: config.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get(&self, path: &str, card: &str) -> Result<ureq::http::Response<ureq::Body>, FetchError> {
        let url = self.endpoint(path);
        debug!("GET {}?card={}", url, card);

        let response = self
            .agent
            .get(url.as_str())
            .query("card", card)
            .header("Content-Type", "application/json")
            .call()?;
        Ok(response)
    }
}

impl FlowApi for HttpFlowApi {
    fn trigger_refresh(&self, card: &str) -> Result<(), FetchError> {
        self.get(REFRESH_PATH, card)?;
        Ok(())
    }

    fn read_card(&self, card: &str) -> Result<ReadResponse, FetchError> {
        let mut response = self.get(READ_PATH, card)?;
        response
            .body_mut()
            .read_json::<ReadResponse>()
            .map_err(|e| FetchError::Malformed(e.to_string()))
    }
}
