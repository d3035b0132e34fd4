//! Configuration module for loading environment variables and settings.
//!
//! The configuration is read once at startup and then injected into the
//! server, so nothing downstream reads the process environment.

use crate::error::ConfigError;
use std::time::Duration;

/// Environment variable holding the Together AI bearer token.
pub const API_KEY_VAR: &str = "TOGETHER_AI_API_KEY";

/// Environment variable overriding the image generation endpoint.
pub const API_URL_VAR: &str = "TOGETHER_AI_API_URL";

/// Environment variable overriding the fallback model.
pub const DEFAULT_MODEL_VAR: &str = "IMAGE_GEN_DEFAULT_MODEL";

/// Environment variable overriding the per-request timeout, in seconds.
pub const TIMEOUT_VAR: &str = "IMAGE_GEN_TIMEOUT_SECS";

/// Together AI image generation endpoint.
pub const DEFAULT_API_URL: &str = "https://api.together.xyz/v1/images/generations";

/// Model used when the caller's model is reported as unavailable.
pub const DEFAULT_MODEL: &str = "black-forest-labs/FLUX.1-schnell";

/// Per-request timeout applied to each upstream call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Application configuration loaded from environment variables.
#[derive(Clone)]
pub struct Config {
    /// Bearer token sent to the upstream API. May be empty; the API then
    /// rejects the call and the rejection is reported like any other.
    pub api_key: String,
    /// Image generation endpoint
    pub api_url: String,
    /// Fallback model for model-unavailable rejections
    pub default_model: String,
    /// Timeout for each upstream call
    pub timeout: Duration,
}

impl Config {
    /// Create a configuration with the given token and default settings.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_url: DEFAULT_API_URL.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a numeric variable does not
    /// parse or the default model is blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR).unwrap_or_default();

        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let default_model = match lookup(DEFAULT_MODEL_VAR) {
            Some(model) if model.trim().is_empty() => {
                return Err(ConfigError::invalid_value(
                    DEFAULT_MODEL_VAR,
                    "default model cannot be blank",
                ));
            }
            Some(model) => model,
            None => DEFAULT_MODEL.to_string(),
        };

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(0) => {
                    return Err(ConfigError::invalid_value(TIMEOUT_VAR, "timeout must be positive"));
                }
                Ok(secs) => Duration::from_secs(secs),
                Err(e) => return Err(ConfigError::invalid_value(TIMEOUT_VAR, e.to_string())),
            },
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        Ok(Self {
            api_key,
            api_url,
            default_model,
            timeout,
        })
    }

    /// Point the configuration at a different endpoint.
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Replace the fallback model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether a bearer token was supplied.
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "<unset>" })
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .finish()
    }
}
