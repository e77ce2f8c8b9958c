//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::time::Duration;

use nerlm::{CoercionMode, Destination, LlmClient, Settings, build_client};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_API_KEY: &str = "sk-or-test";

/// Settings pointing both destinations at the mock server.
pub fn mock_settings(server: &MockServer) -> Settings {
    Settings::new(TEST_API_KEY, server.uri(), server.uri()).with_timeout(Duration::from_secs(5))
}

/// Client for the mock server.
pub fn mock_client(server: &MockServer, destination: Destination, mode: CoercionMode) -> LlmClient {
    build_client(&mock_settings(server), destination, mode).expect("Failed to build client")
}

/// OpenAI-style completion envelope with `content` as the assistant message.
pub fn completion_envelope(content: &str) -> Value {
    json!({
        "id": "gen-test-1",
        "object": "chat.completion",
        "model": "free-tier-model",
        "choices": [{
            "index": 0,
            "finish_reason": "stop",
            "message": {"role": "assistant", "content": content}
        }],
        "usage": {"prompt_tokens": 120, "completion_tokens": 40, "total_tokens": 160}
    })
}

/// Completion envelope whose reply is a tool call carrying `arguments`.
pub fn tool_call_envelope(name: &str, arguments: &str) -> Value {
    json!({
        "id": "gen-test-2",
        "choices": [{
            "index": 0,
            "finish_reason": "tool_calls",
            "message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": name, "arguments": arguments}
                }]
            }
        }]
    })
}

/// Mount a completion endpoint that always answers with `content`.
pub async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope(content)))
        .mount(server)
        .await;
}
