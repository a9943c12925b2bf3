//! Homework status API client

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::io::HttpClient;
use crate::BotError;

/// Source of raw homework status responses
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch statuses updated since the `from_date` unix timestamp
    async fn fetch(&self, from_date: i64) -> crate::Result<Value>;
}

/// Client for the homework status endpoint
pub struct PracticumClient {
    endpoint: String,
    authorization: String,
    http: Arc<dyn HttpClient>,
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, http: Arc<dyn HttpClient>) -> Self {
        tracing::debug!("Created PracticumClient for {}", endpoint);
        Self {
            endpoint: endpoint.to_string(),
            authorization: format!("OAuth {}", token),
            http,
        }
    }
}

#[async_trait]
impl Fetcher for PracticumClient {
    async fn fetch(&self, from_date: i64) -> crate::Result<Value> {
        let from_date = from_date.to_string();
        let response = self
            .http
            .get(
                &self.endpoint,
                &[("Authorization", self.authorization.as_str())],
                &[("from_date", from_date.as_str())],
            )
            .await
            .map_err(|e| BotError::Endpoint(format!("Request failed: {}", e)))?;

        if response.status != 200 {
            let message = format!(
                "Endpoint {} is unavailable. API response code: {}",
                self.endpoint, response.status
            );
            tracing::error!("{}", message);
            return Err(BotError::Endpoint(message));
        }

        Ok(serde_json::from_str(&response.body)?)
    }
}
