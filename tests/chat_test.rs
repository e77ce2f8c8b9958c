//! Integration test of the memory chat loop over HTTP.

mod common;

use common::{completion_envelope, mock_client};
use nerlm::chat::{InMemoryStore, MemoryChat, NO_MEMORY};
use nerlm::client::ChatMessage;
use nerlm::{CoercionMode, Destination};
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_two_turns_accumulate_memory() {
    let server = MockServer::start().await;

    // Memory-writing calls are recognized by their system prompt.
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("current_user_info"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_envelope("- Name: Tunde\n- Lives in Ibadan")),
        )
        .with_priority(1)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({
            "model": "meta-llama/llama-3.2-3b-instruct",
            "seed": 0
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_envelope("Hello Tunde!")))
        .with_priority(2)
        .expect(2)
        .mount(&server)
        .await;

    let client = mock_client(&server, Destination::Remote, CoercionMode::Json);
    let chat = MemoryChat::new(client, InMemoryStore::new());
    assert_eq!(chat.load_memory("tunde").await, NO_MEMORY);

    let mut conversation = vec![ChatMessage::user("I'm Tunde from Ibadan")];
    let reply = chat.handle_message("tunde", &mut conversation).await.unwrap();
    assert_eq!(reply, "Hello Tunde!");
    assert_eq!(chat.load_memory("tunde").await, "- Name: Tunde\n- Lives in Ibadan");

    conversation.push(ChatMessage::user("What do you know about me?"));
    chat.handle_message("tunde", &mut conversation).await.unwrap();
    assert_eq!(conversation.len(), 4);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 4);
    let third: serde_json::Value = requests[2].body_json().unwrap();
    assert!(
        third["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("- Lives in Ibadan")
    );
}
