use std::time::Duration;

use async_trait::async_trait;

use crate::core::MitigationStrategy;
use crate::mitigation::config::HttpMitigationConfig;
use crate::mitigation::error::MitigationError;
use crate::mitigation::parser::decode_response;
use crate::mitigation::types::{MitigationRequest, MitigationService};

/// Posts the request body as JSON to a strategy endpoint and decodes
/// whatever comes back.
pub struct HttpMitigationService {
    endpoint: String,
    timeout_ms: u64,
    client: reqwest::Client,
}

impl HttpMitigationService {
    pub fn new(config: HttpMitigationConfig) -> Result<Self, MitigationError> {
        let endpoint = config.endpoint.as_deref().unwrap_or("").trim().to_string();
        if endpoint.is_empty() {
            return Err(MitigationError::Config(
                "mitigation endpoint cannot be empty".to_string(),
            ));
        }
        if config.timeout_ms == 0 {
            return Err(MitigationError::Config(
                "mitigation timeout must be greater than 0".to_string(),
            ));
        }

        Ok(Self {
            endpoint,
            timeout_ms: config.timeout_ms,
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(config.timeout_ms))
                .build()
                .map_err(|error| MitigationError::Config(error.to_string()))?,
        })
    }

    fn map_connectivity_error(&self, error: reqwest::Error) -> MitigationError {
        if error.is_connect() {
            return MitigationError::Request(format!(
                "could not reach mitigation service at {}: {error}",
                self.endpoint
            ));
        }
        if error.is_timeout() {
            return MitigationError::Timeout(format!(
                "mitigation service timed out after {} ms",
                self.timeout_ms
            ));
        }
        MitigationError::Request(error.to_string())
    }
}

#[async_trait]
impl MitigationService for HttpMitigationService {
    fn id(&self) -> &str {
        "http"
    }

    async fn suggest(
        &self,
        request: &MitigationRequest,
    ) -> Result<Vec<MitigationStrategy>, MitigationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|error| self.map_connectivity_error(error))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|error| self.map_connectivity_error(error))?;

        tracing::debug!("mitigation service response: status={}", status);

        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(MitigationError::Auth(format!(
                "mitigation service rejected the request ({status})"
            )));
        }
        if !status.is_success() {
            return Err(MitigationError::Request(format!(
                "mitigation service returned status {}: {text}",
                status.as_u16()
            )));
        }

        // Some deployments answer with plain text rather than JSON.
        let payload = serde_json::from_str::<serde_json::Value>(&text)
            .unwrap_or(serde_json::Value::String(text));
        decode_response(&payload)
    }
}
