//! Single-call structured extraction: request, clean, parse, validate.

use serde_json::Value;
use tracing::{debug, warn};

use crate::client::{ChatCompletion, ChatMessage, CompletionRequest};
use crate::error::ExtractError;
use crate::retry::RetryPolicy;
use crate::schema::StructuredOutput;

use super::clean::clean_response;
use super::outcome::{Structured, StructuredOutcome};
use super::prompt::build_system_prompt;

/// Sampling temperature for extraction calls.
pub const TEMPERATURE: f32 = 0.0;
/// Fixed seed so repeated calls against an unchanged model are reproducible.
pub const SEED: u64 = 42;

/// Build the completion request for schema `T`.
pub fn build_request<T: StructuredOutput>(model: &str, instruction: &str) -> CompletionRequest {
    let schema = T::schema_description();
    let system = build_system_prompt(&schema);

    CompletionRequest::new(
        model,
        vec![ChatMessage::system(system), ChatMessage::user(instruction)],
    )
    .with_temperature(TEMPERATURE)
    .with_seed(SEED)
    .with_schema(T::schema_title(), schema)
}

/// Clean a raw reply, parse it as JSON, and validate it against `T`.
///
/// There is no lenient fallback: text that is not JSON after cleaning fails.
pub fn parse_reply<T: StructuredOutput>(raw_text: &str) -> Result<T, ExtractError> {
    let cleaned = clean_response(raw_text);

    let value: Value = serde_json::from_str(&cleaned).map_err(|e| ExtractError::Parse {
        message: e.to_string(),
        cleaned: cleaned.chars().take(500).collect(),
    })?;

    serde_json::from_value(value).map_err(|e| ExtractError::Validation {
        message: e.to_string(),
    })
}

/// Issue exactly one completion and return the validated object.
pub async fn extract<T, C>(
    client: &C,
    model: &str,
    instruction: &str,
) -> Result<Structured<T>, ExtractError>
where
    T: StructuredOutput,
    C: ChatCompletion + ?Sized,
{
    let request = build_request::<T>(model, instruction);
    let response = client.complete(&request).await?;

    debug!(
        model,
        latency_ms = response.latency_ms,
        "Validating reply against {}",
        T::schema_title()
    );

    let value = parse_reply::<T>(&response.text).inspect_err(|e| {
        warn!("Structured reply from {} rejected ({}): {}", model, e.kind(), e);
    })?;

    Ok(Structured {
        value,
        raw_response: response.raw,
    })
}

/// One structured call with every failure folded into the outcome.
///
/// Never returns an error: transport, parse, and validation failures all
/// become [`StructuredOutcome::Failure`].
pub async fn get_structured_response<T, C>(
    client: &C,
    model: &str,
    instruction: &str,
) -> StructuredOutcome<T>
where
    T: StructuredOutput,
    C: ChatCompletion + ?Sized,
{
    extract::<T, C>(client, model, instruction).await.into()
}

/// Retry [`extract`] under `policy`, folding the terminal failure into the outcome.
///
/// Every failure kind is retried.
pub async fn extract_with_retry<T, C>(
    client: &C,
    model: &str,
    instruction: &str,
    policy: &RetryPolicy,
) -> StructuredOutcome<T>
where
    T: StructuredOutput,
    C: ChatCompletion + ?Sized,
{
    policy
        .run(|| extract::<T, C>(client, model, instruction))
        .await
        .into()
}
