//! HTTP implementation of [`ChatCompletion`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{ConfigError, TransportError};
use crate::settings::Settings;

use super::request::{CompletionRequest, CompletionResponse, extract_reply};
use super::{ChatCompletion, ClientConfig, CoercionMode, Destination, LOCAL_PLACEHOLDER_KEY};

/// Authenticated client bound to one destination.
///
/// Holds no per-call state; one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    config: ClientConfig,
}

/// Build a client for a destination and coercion mode.
///
/// Performs no network call. Only the remote destination needs
/// `OPENROUTER_API_KEY`.
pub fn build_client(
    settings: &Settings,
    destination: Destination,
    mode: CoercionMode,
) -> Result<LlmClient, ConfigError> {
    let (base_url, api_key) = match destination {
        Destination::Remote => (
            settings.openrouter_url.clone(),
            settings.require_api_key()?.to_string(),
        ),
        Destination::Local => (
            settings.ollama_url.clone(),
            LOCAL_PLACEHOLDER_KEY.to_string(),
        ),
    };

    LlmClient::new(
        ClientConfig {
            destination,
            base_url,
            api_key,
            mode,
        },
        settings.request_timeout,
    )
}

impl LlmClient {
    pub fn new(config: ClientConfig, timeout: Duration) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn mode(&self) -> CoercionMode {
        self.config.mode
    }

    pub fn destination(&self) -> Destination {
        self.config.destination
    }

    /// Fetch the credential's status (usage, limits) from the aggregator.
    pub async fn key_status(&self) -> Result<Value, TransportError> {
        let url = self.config.endpoint("auth/key");
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| TransportError::from_reqwest(&url, e))?;

        read_json(resp).await
    }
}

#[async_trait]
impl ChatCompletion for LlmClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, TransportError> {
        let url = self.config.endpoint("chat/completions");
        let body = request.to_body(self.config.mode);

        debug!(
            model = %request.model,
            destination = %self.config.destination,
            mode = ?self.config.mode,
            "Sending completion request"
        );

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let err = TransportError::from_reqwest(&url, e);
                warn!("Completion request to {} failed: {}", url, err);
                err
            })?;

        let raw = read_json(resp).await?;
        let latency_ms = start.elapsed().as_millis() as u64;
        let text = extract_reply(&raw, self.config.mode)?;

        debug!(latency_ms, chars = text.len(), "Completion received");

        Ok(CompletionResponse {
            text,
            raw,
            latency_ms,
        })
    }
}

/// Check the status and decode a JSON body.
async fn read_json(resp: reqwest::Response) -> Result<Value, TransportError> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        warn!("Provider returned HTTP {}: {}", status, body);
        return Err(TransportError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let text = resp.text().await.map_err(TransportError::Request)?;
    serde_json::from_str(&text).map_err(|e| TransportError::InvalidEnvelope(e.to_string()))
}
