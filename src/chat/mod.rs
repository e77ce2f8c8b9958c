//! Memory-backed chat orchestration.
//!
//! Each incoming message is answered with the user's stored memory in the
//! system prompt, and the conversation is then folded back into that memory.

pub mod prompt;
pub mod store;

use tracing::{debug, info};

use crate::client::{ChatCompletion, ChatMessage, CompletionRequest};
use crate::error::TransportError;
use crate::models::DEFAULT_CHAT_MODEL;

pub use prompt::{build_memory_prompt, build_respond_prompt};
pub use store::{InMemoryStore, MemoryRecord, MemoryStore, Namespace};

/// Namespace prefix and record field for user memory.
pub const MEMORY_PREFIX: &str = "memory";
/// Store key for the user's memory record.
pub const MEMORY_KEY: &str = "user_memory";
/// Rendered in place of memory for users with nothing stored.
pub const NO_MEMORY: &str = "No existing memory found";

const CHAT_SEED: u64 = 0;

/// Chat orchestrator over a completion client and a memory store.
pub struct MemoryChat<C, S> {
    client: C,
    store: S,
    model: String,
}

impl<C, S> MemoryChat<C, S>
where
    C: ChatCompletion,
    S: MemoryStore,
{
    /// Orchestrator using the default chat model.
    pub fn new(client: C, store: S) -> Self {
        Self {
            client,
            store,
            model: DEFAULT_CHAT_MODEL.as_str().to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current memory text for a user, or [`NO_MEMORY`].
    pub async fn load_memory(&self, user_id: &str) -> String {
        self.store
            .get(&Namespace::new(MEMORY_PREFIX, user_id), MEMORY_KEY)
            .await
            .and_then(|record| record.get(MEMORY_PREFIX).cloned())
            .unwrap_or_else(|| NO_MEMORY.to_string())
    }

    /// Answer the conversation with memory in the system prompt.
    pub async fn respond(
        &self,
        conversation: &[ChatMessage],
        memory_text: &str,
    ) -> Result<String, TransportError> {
        self.complete_with_system(build_respond_prompt(memory_text), conversation)
            .await
    }

    /// Merge new facts from the conversation into the memory text.
    pub async fn extract_and_merge_memory(
        &self,
        conversation: &[ChatMessage],
        memory_text: &str,
    ) -> Result<String, TransportError> {
        self.complete_with_system(build_memory_prompt(memory_text), conversation)
            .await
    }

    /// Handle one incoming message.
    ///
    /// The caller pushes the user's message onto `conversation` first. The
    /// reply is appended to it before memory is updated, so the stored memory
    /// reflects both sides of the exchange.
    pub async fn handle_message(
        &self,
        user_id: &str,
        conversation: &mut Vec<ChatMessage>,
    ) -> Result<String, TransportError> {
        let memory_text = self.load_memory(user_id).await;

        let reply = self.respond(conversation, &memory_text).await?;
        conversation.push(ChatMessage::assistant(reply.clone()));

        let updated = self
            .extract_and_merge_memory(conversation, &memory_text)
            .await?;

        self.store
            .put(
                &Namespace::new(MEMORY_PREFIX, user_id),
                MEMORY_KEY,
                MemoryRecord::from([(MEMORY_PREFIX.to_string(), updated)]),
            )
            .await;
        info!(user_id, "Updated user memory");

        Ok(reply)
    }

    async fn complete_with_system(
        &self,
        system: String,
        conversation: &[ChatMessage],
    ) -> Result<String, TransportError> {
        let mut messages = Vec::with_capacity(conversation.len() + 1);
        messages.push(ChatMessage::system(system));
        messages.extend_from_slice(conversation);

        let request = CompletionRequest::new(&self.model, messages).with_seed(CHAT_SEED);
        let response = self.client.complete(&request).await?;
        debug!(latency_ms = response.latency_ms, "Chat completion received");
        Ok(response.text)
    }
}
