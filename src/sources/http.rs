//! Shared HTTP access for the network-backed adapters

use crate::sources::error::{SourceError, SourceResult};
use serde_json::Value;
use std::time::Duration;

/// Thin wrapper over a `reqwest::Client` with a bounded per-request timeout
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    /// User agent sent with every request
    const USER_AGENT: &'static str = concat!("n1-quiz/", env!("CARGO_PKG_VERSION"));

    pub fn new(timeout: Duration) -> SourceResult<Self> {
        Self::build(timeout, true)
    }

    /// Like [`HttpFetcher::new`] but ignores `HTTP_PROXY`-style settings,
    /// for local mirrors of the word lists
    pub fn without_proxy(timeout: Duration) -> SourceResult<Self> {
        Self::build(timeout, false)
    }

    fn build(timeout: Duration, use_system_proxy: bool) -> SourceResult<Self> {
        if timeout.is_zero() {
            return Err(SourceError::Config("timeout must be positive".to_string()));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(Self::USER_AGENT);
        if !use_system_proxy {
            builder = builder.no_proxy();
        }

        let client = builder
            .build()
            .map_err(|e| SourceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// GET `url` and return the body; non-success statuses are errors
    pub async fn get_text(&self, url: &str) -> SourceResult<String> {
        Ok(self.send(url).await?.text().await?)
    }

    /// GET `url` and decode the body as JSON
    pub async fn get_json(&self, url: &str) -> SourceResult<Value> {
        Ok(self.send(url).await?.json::<Value>().await?)
    }

    async fn send(&self, url: &str) -> SourceResult<reqwest::Response> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}
