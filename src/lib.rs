//! nerlm - Schema-validated structured responses from OpenAI-compatible LLM endpoints.
//!
//! # Overview
//!
//! nerlm sends an instruction plus a target schema to a hosted aggregator
//! (OpenRouter) or a local inference server (Ollama), cleans the model's
//! reply, and validates it into a typed value. Every call ends in either a
//! fully validated object or an error, never a partial value. On top of that
//! sit a fixed-delay retry policy, a named-entity extraction schema for
//! transaction narrations, and a small memory-backed chat loop.

pub mod chat;
pub mod client;
pub mod error;
pub mod models;
pub mod retry;
pub mod schema;
pub mod settings;
pub mod structured;

// Re-export commonly used types
pub use client::{ChatCompletion, CoercionMode, Destination, LlmClient, build_client};
pub use error::{
    ConfigError, ExtractError, FailureKind, RetryError, TransportError, ValidationError,
};
pub use models::ModelId;
pub use retry::RetryPolicy;
pub use schema::{Entity, EntityExtractionResult, EntityLabel, GeneralResponse, StructuredOutput};
pub use settings::Settings;
pub use structured::{StructuredOutcome, extract_with_retry, get_structured_response};
