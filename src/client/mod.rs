//! Client factory for the remote aggregator and the local inference server.

pub mod http;
pub mod request;

use std::fmt;

use async_trait::async_trait;

use crate::error::TransportError;

pub use http::{LlmClient, build_client};
pub use request::{ChatMessage, CompletionRequest, CompletionResponse, Role, SchemaHint};

/// Credential sent to the local server, which does not authenticate.
pub const LOCAL_PLACEHOLDER_KEY: &str = "ollama";

/// Network destination for completions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Hosted aggregator (OpenRouter).
    Remote,
    /// Local inference server (Ollama's OpenAI-compatible endpoint).
    Local,
}

impl Destination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Destination::Remote => "remote",
            Destination::Local => "local",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How schema-shaped output is requested from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// `response_format` JSON schema.
    #[default]
    Json,
    /// Forced function/tool call whose arguments carry the object.
    Tool,
}

/// Endpoint, credential, and coercion mode for one destination.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub destination: Destination,
    pub base_url: String,
    pub api_key: String,
    pub mode: CoercionMode,
}

impl ClientConfig {
    /// URL for an endpoint path under the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("destination", &self.destination)
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("mode", &self.mode)
            .finish()
    }
}

/// Anything that can answer a chat completion request.
///
/// This abstraction allows mocking the provider in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, TransportError>;
}
