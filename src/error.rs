//! Error types for nerlm modules using thiserror.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// Errors from loading settings or building clients.
///
/// These are startup errors: they are surfaced immediately and never retried.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Required setting {0} is not set. Add it to the environment or to .env")]
    MissingVariable(&'static str),

    #[error("Failed to read .env file: {0}")]
    DotEnv(#[source] dotenvy::Error),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from schema validation of a single record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Entity text must be 2-50 characters after trimming, got {length}: '{text}'")]
    TextLength { text: String, length: usize },

    #[error("Score must be within [0.0, 1.0] after rounding, got {0}")]
    ScoreOutOfRange(f64),

    #[error("Score must be a finite number")]
    ScoreNotFinite,

    #[error("Unknown entity label '{0}'")]
    UnknownLabel(String),
}

/// Errors from talking to a completion endpoint.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Completion request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("Could not connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Completion request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response was not valid JSON: {0}")]
    InvalidEnvelope(String),

    #[error("Provider response contained no reply content")]
    EmptyReply,
}

impl TransportError {
    /// Classify a reqwest error against the URL it was sent to.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err)
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                source: err,
            }
        } else {
            TransportError::Request(err)
        }
    }
}

/// Which stage of a structured call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureKind {
    Transport,
    Parse,
    Validation,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Parse => "parse",
            FailureKind::Validation => "validation",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from a single structured extraction call.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Model reply is not valid JSON: {message}. Cleaned reply: {cleaned}")]
    Parse { message: String, cleaned: String },

    #[error("Model reply does not match the response schema: {message}")]
    Validation { message: String },
}

impl ExtractError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ExtractError::Transport(_) => FailureKind::Transport,
            ExtractError::Parse { .. } => FailureKind::Parse,
            ExtractError::Validation { .. } => FailureKind::Validation,
        }
    }
}

/// Terminal failure of a retried operation.
#[derive(Error, Debug)]
#[error("Gave up after {attempts} attempt(s) in {elapsed:?}: {last_error}")]
pub struct RetryError<E: std::error::Error + 'static> {
    pub attempts: u32,
    pub elapsed: Duration,
    #[source]
    pub last_error: E,
}

impl<E: std::error::Error + 'static> RetryError<E> {
    /// Unwrap the last error observed before giving up.
    pub fn into_last_error(self) -> E {
        self.last_error
    }
}
