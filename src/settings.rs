//! Credentials and endpoint settings.
//!
//! Settings are read once at startup from the process environment, with an
//! optional `.env` file in the working directory as a fallback source.
//! Variables already present in the environment take precedence over the
//! file. The `.env` file is read without exporting its values, so loading
//! settings never mutates process state.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::ConfigError;

pub const OPENROUTER_API_KEY_VAR: &str = "OPENROUTER_API_KEY";
pub const OPENROUTER_URL_VAR: &str = "OPENROUTER_URL";
pub const OLLAMA_URL_VAR: &str = "OLLAMA_URL";

/// Environment variable to override the default request timeout.
pub const TIMEOUT_ENV_VAR: &str = "NERLM_REQUEST_TIMEOUT";

pub const DEFAULT_OPENROUTER_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434/v1";

/// Default per-request timeout (2 minutes).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Resolved settings for both destinations.
///
/// The remote credential is optional here; building a remote client without
/// it fails with [`ConfigError::MissingVariable`].
#[derive(Clone)]
pub struct Settings {
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub ollama_url: String,
    pub request_timeout: Duration,
}

impl Settings {
    /// Build settings explicitly, without reading the environment.
    pub fn new(
        openrouter_api_key: impl Into<String>,
        openrouter_url: impl Into<String>,
        ollama_url: impl Into<String>,
    ) -> Self {
        Self {
            openrouter_api_key: Some(openrouter_api_key.into()),
            openrouter_url: openrouter_url.into(),
            ollama_url: ollama_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Settings for the local destination only, with no remote credential.
    pub fn local_only(ollama_url: impl Into<String>) -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_url: DEFAULT_OPENROUTER_URL.to_string(),
            ollama_url: ollama_url.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// The remote credential, or the error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.openrouter_api_key
            .as_deref()
            .ok_or(ConfigError::MissingVariable(OPENROUTER_API_KEY_VAR))
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Load settings from the environment and `.env`.
    ///
    /// A missing `.env` file is fine; a malformed one is an error. A missing
    /// or empty `OPENROUTER_API_KEY` is recorded as `None`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let file_vars = read_dotenv()?;
        Self::from_lookup(|name| {
            env::var(name)
                .ok()
                .or_else(|| file_vars.get(name).cloned())
        })
    }

    /// Load settings through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let openrouter_api_key = non_empty(OPENROUTER_API_KEY_VAR);
        let openrouter_url = non_empty(OPENROUTER_URL_VAR)
            .unwrap_or_else(|| DEFAULT_OPENROUTER_URL.to_string());
        let ollama_url =
            non_empty(OLLAMA_URL_VAR).unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            openrouter_api_key,
            openrouter_url,
            ollama_url,
            request_timeout: parse_timeout(lookup(TIMEOUT_ENV_VAR)),
        })
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "<redacted>"),
            )
            .field("openrouter_url", &self.openrouter_url)
            .field("ollama_url", &self.ollama_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Read `.env` from the working directory into a map without exporting it.
fn read_dotenv() -> Result<HashMap<String, String>, ConfigError> {
    let iter = match dotenvy::dotenv_iter() {
        Ok(iter) => iter,
        Err(e) if e.not_found() => {
            debug!("No .env file found, using process environment only");
            return Ok(HashMap::new());
        }
        Err(e) => return Err(ConfigError::DotEnv(e)),
    };

    iter.map(|item| item.map_err(ConfigError::DotEnv)).collect()
}

/// Parse the timeout override.
///
/// Logs a warning if the value is set but is not a positive whole number of
/// seconds.
fn parse_timeout(value: Option<String>) -> Duration {
    match value {
        Some(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
