//! HTTP transport over reqwest

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::{Attributes, Transport};
use crate::error::TransportError;

/// Production transport: JSON over HTTP with reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }

    /// Use a caller-provided client (custom timeouts, proxies, headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        HttpTransport { client }
    }

    async fn expect_object(response: reqwest::Response) -> Result<Attributes, TransportError> {
        let response = Self::check_status(response).await?;
        let value: Value = response
            .json()
            .await
            .map_err(|e| TransportError::InvalidBody(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(TransportError::InvalidBody(format!(
                "expected a JSON object, got: {}",
                other
            ))),
        }
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(TransportError::Status {
            code: status.as_u16(),
            message,
        })
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn create(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError> {
        debug!(%url, "POST annotation");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Self::expect_object(response).await
    }

    async fn read(&self, url: &str) -> Result<Attributes, TransportError> {
        debug!(%url, "GET annotation");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Self::expect_object(response).await
    }

    async fn update(&self, url: &str, body: &Attributes) -> Result<Attributes, TransportError> {
        debug!(%url, "PUT annotation");
        let response = self
            .client
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Self::expect_object(response).await
    }

    async fn delete(&self, url: &str) -> Result<(), TransportError> {
        debug!(%url, "DELETE annotation");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Self::check_status(response).await?;
        Ok(())
    }
}
