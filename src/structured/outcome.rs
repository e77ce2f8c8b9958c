//! Return contract of the structured response engine.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ExtractError, FailureKind, RetryError};

/// A validated object and the provider envelope it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Structured<T> {
    pub value: T,
    pub raw_response: Value,
}

/// Metadata attached to a failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    pub kind: FailureKind,
    /// Always `None`: no partial provider response is handed back on failure.
    pub raw_response: Option<Value>,
}

/// Either a fully validated object or an error. Never partially valid.
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredOutcome<T> {
    Success { value: T, raw_response: Value },
    Failure { error: String, context: ErrorContext },
}

impl<T> StructuredOutcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, StructuredOutcome::Success { .. })
    }

    /// Drop the raw response and convert to a `Result`.
    pub fn into_result(self) -> Result<T, String> {
        match self {
            StructuredOutcome::Success { value, .. } => Ok(value),
            StructuredOutcome::Failure { error, .. } => Err(error),
        }
    }

    /// The outbound failure pair: `{status, error}` and `{status, raw_response}`.
    pub fn failure_payloads(&self) -> Option<(Value, Value)> {
        match self {
            StructuredOutcome::Success { .. } => None,
            StructuredOutcome::Failure { error, context } => Some((
                json!({"status": "error", "error": error}),
                json!({"status": "error", "raw_response": context.raw_response}),
            )),
        }
    }

    pub(crate) fn failed(kind: FailureKind, error: String) -> Self {
        StructuredOutcome::Failure {
            error,
            context: ErrorContext {
                kind,
                raw_response: None,
            },
        }
    }
}

impl<T> From<Result<Structured<T>, ExtractError>> for StructuredOutcome<T> {
    fn from(result: Result<Structured<T>, ExtractError>) -> Self {
        match result {
            Ok(Structured {
                value,
                raw_response,
            }) => StructuredOutcome::Success {
                value,
                raw_response,
            },
            Err(e) => StructuredOutcome::failed(e.kind(), e.to_string()),
        }
    }
}

impl<T> From<Result<Structured<T>, RetryError<ExtractError>>> for StructuredOutcome<T> {
    fn from(result: Result<Structured<T>, RetryError<ExtractError>>) -> Self {
        match result {
            Ok(structured) => Ok::<_, ExtractError>(structured).into(),
            Err(e) => StructuredOutcome::failed(e.last_error.kind(), e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransportError;

    #[test]
    fn test_success_conversion() {
        let outcome: StructuredOutcome<u32> = Ok::<_, ExtractError>(Structured {
            value: 7,
            raw_response: json!({"id": "gen-1"}),
        })
        .into();
        assert!(outcome.is_success());
        assert!(outcome.failure_payloads().is_none());
        assert_eq!(outcome.into_result(), Ok(7));
    }

    #[test]
    fn test_failure_payloads_shape() {
        let outcome: StructuredOutcome<u32> =
            Err::<Structured<u32>, _>(ExtractError::Transport(TransportError::EmptyReply)).into();
        let (error, info) = outcome.failure_payloads().unwrap();
        assert_eq!(error["status"], "error");
        assert!(!error["error"].as_str().unwrap().is_empty());
        assert_eq!(info, json!({"status": "error", "raw_response": null}));

        match outcome {
            StructuredOutcome::Failure { context, .. } => {
                assert_eq!(context.kind, FailureKind::Transport)
            }
            StructuredOutcome::Success { .. } => panic!("expected failure"),
        }
    }
}
