//! Keyed memory storage for the chat orchestration.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

/// A stored record: `{prefix: memory_text}`.
pub type MemoryRecord = HashMap<String, String>;

/// Storage namespace, `(prefix, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    pub prefix: String,
    pub user_id: String,
}

impl Namespace {
    pub fn new(prefix: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            user_id: user_id.into(),
        }
    }
}

/// Simple keyed get/put store.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    async fn get(&self, namespace: &Namespace, key: &str) -> Option<MemoryRecord>;

    /// Overwrites any existing record under the same key.
    async fn put(&self, namespace: &Namespace, key: &str, record: MemoryRecord);
}

/// Process-local store. Contents are lost on exit.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    records: RwLock<HashMap<(Namespace, String), MemoryRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get(&self, namespace: &Namespace, key: &str) -> Option<MemoryRecord> {
        self.records
            .read()
            .await
            .get(&(namespace.clone(), key.to_string()))
            .cloned()
    }

    async fn put(&self, namespace: &Namespace, key: &str, record: MemoryRecord) {
        self.records
            .write()
            .await
            .insert((namespace.clone(), key.to_string()), record);
    }
}
