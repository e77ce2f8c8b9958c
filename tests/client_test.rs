//! Integration tests for the HTTP completion client against a mock server.

mod common;

use common::{TEST_API_KEY, completion_envelope, mock_client, tool_call_envelope};
use nerlm::client::{ChatMessage, CompletionRequest, LOCAL_PLACEHOLDER_KEY};
use nerlm::{ChatCompletion, CoercionMode, Destination, TransportError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn schema_request() -> CompletionRequest {
    CompletionRequest::new("free-tier-model", vec![ChatMessage::user("hi")])
        .with_seed(42)
        .with_schema("GeneralResponse", json!({"type": "object"}))
}

#[tokio::test]
async fn test_remote_request_carries_credential_and_schema() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .and(body_partial_json(json!({
            "model": "free-tier-model",
            "seed": 42,
            "temperature": 0.0,
            "response_format": {
                "type": "json_schema",
                "json_schema": {"name": "GeneralResponse", "strict": true}
            }
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_envelope(r#"{"content":"hi"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let response = client.complete(&schema_request()).await.unwrap();

    assert_eq!(response.text, r#"{"content":"hi"}"#);
    assert_eq!(response.raw["id"], "gen-test-1");
    assert_eq!(response.raw["usage"]["total_tokens"], 160);
}

#[tokio::test]
async fn test_local_destination_uses_placeholder_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", LOCAL_PLACEHOLDER_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Local, CoercionMode::Json);
    assert_eq!(client.destination(), Destination::Local);
    let response = client.complete(&schema_request()).await.unwrap();
    assert_eq!(response.text, "ok");
}

#[tokio::test]
async fn test_tool_mode_forces_function_and_reads_arguments() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "tool_choice": {"type": "function", "function": {"name": "GeneralResponse"}}
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(tool_call_envelope("GeneralResponse", r#"{"content":"from tool"}"#)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Tool);
    let response = client.complete(&schema_request()).await.unwrap();
    assert_eq!(response.text, r#"{"content":"from tool"}"#);
}

#[tokio::test]
async fn test_error_status_is_reported_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let err = client.complete(&schema_request()).await.unwrap_err();

    match err {
        TransportError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "upstream exploded");
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_non_json_envelope_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let err = client.complete(&schema_request()).await.unwrap_err();
    assert!(matches!(err, TransportError::InvalidEnvelope(_)));
}

#[tokio::test]
async fn test_envelope_without_content_is_empty_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let err = client.complete(&schema_request()).await.unwrap_err();
    assert!(matches!(err, TransportError::EmptyReply));
}

#[tokio::test]
async fn test_key_status_returns_provider_json() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/key"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"label": "sk-or-v1-abc", "usage": 0.25, "limit": null, "is_free_tier": true}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let status = client.key_status().await.unwrap();
    assert_eq!(status["data"]["is_free_tier"], true);
}
