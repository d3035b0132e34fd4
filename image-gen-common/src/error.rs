//! Error types for the image-gen server.
//!
//! Every variant of [`Error`] renders, through `Display`, the exact text the
//! `generate_image` tool hands back to the caller. The handler never lets one
//! of these escape as a protocol fault; it turns them into text results.
//!
//! # Error Categories
//!
//! - `Error::MissingArguments` / `Error::MissingParameter` / `Error::InvalidParameters`:
//!   caller input problems detected before any network call
//! - `Error::Api`: the upstream API rejected the request on the first attempt
//! - `Error::Http`: a non-200 reply with no `error` entry
//! - `Error::Fallback`: the retry with the default model failed as well
//! - `Error::Parse`: a successful reply without a usable image
//! - `Error::Transport`: timeouts, refused connections and other transport faults
//! - `ConfigError`: invalid configuration values at startup

use thiserror::Error;

/// Placeholder used when a failed fallback reply carries no `error` entry.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Unified error type for a single tool invocation.
#[derive(Debug, Error)]
pub enum Error {
    /// The tool was invoked without any arguments object.
    #[error("Missing arguments for the request")]
    MissingArguments,

    /// A required parameter is absent or blank.
    #[error("Missing {0} parameter")]
    MissingParameter(&'static str),

    /// The arguments object could not be read (wrong types, negative sizes).
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// The upstream API returned an `error` entry that is not a
    /// model-unavailable rejection.
    #[error("Together API error: {0}")]
    Api(String),

    /// The upstream API returned a non-200 status without an `error` entry.
    #[error("HTTP error {0}")]
    Http(u16),

    /// The fallback call with the default model failed.
    #[error("Fallback API error: {message} (HTTP {status_code})")]
    Fallback {
        /// HTTP status code of the fallback reply
        status_code: u16,
        /// Rendered `error` entry, or [`UNKNOWN_ERROR`]
        message: String,
    },

    /// The reply was accepted but holds no usable image.
    #[error("Failed to parse API response: {0}")]
    Parse(String),

    /// The HTTP exchange itself failed.
    #[error(transparent)]
    Transport(#[from] TransportFault),
}

impl Error {
    /// Create a new invalid parameters error.
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Error::InvalidParameters(message.into())
    }

    /// Create a new upstream API error from the rendered `error` entry.
    pub fn api(payload: impl Into<String>) -> Self {
        Error::Api(payload.into())
    }

    /// Create a new fallback error.
    ///
    /// # Example
    ///
    /// ```
    /// use image_gen_common::error::Error;
    ///
    /// let err = Error::fallback(503, None);
    /// assert_eq!(err.to_string(), "Fallback API error: Unknown error (HTTP 503)");
    /// ```
    pub fn fallback(status_code: u16, payload: Option<String>) -> Self {
        Error::Fallback {
            status_code,
            message: payload.unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        }
    }

    /// Create a new response parse error.
    pub fn parse(details: impl Into<String>) -> Self {
        Error::Parse(details.into())
    }

    /// Whether this error was raised before any network call was made.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::MissingArguments | Error::MissingParameter(_) | Error::InvalidParameters(_)
        )
    }
}

/// Transport-level faults, categorised from `reqwest` errors.
#[derive(Debug, Error)]
pub enum TransportFault {
    /// The request or the response body exceeded the configured timeout.
    #[error("Request timed out. API may be experiencing delays.")]
    Timeout,

    /// No connection could be established.
    #[error("Failed to connect to API. Please check your internet connection. ({0})")]
    Connect(String),

    /// The server replied with something that is not valid HTTP, or the
    /// body stream broke off.
    #[error("Malformed response from API: {0}")]
    Malformed(String),

    /// Any other transport failure.
    #[error("Unexpected error occurred: {0}")]
    Other(String),
}

impl TransportFault {
    /// Short category name, used as a structured log field.
    pub fn category(&self) -> &'static str {
        match self {
            TransportFault::Timeout => "timeout",
            TransportFault::Connect(_) => "connect",
            TransportFault::Malformed(_) => "malformed",
            TransportFault::Other(_) => "other",
        }
    }
}

impl From<reqwest::Error> for TransportFault {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportFault::Timeout
        } else if err.is_connect() {
            TransportFault::Connect(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportFault::Malformed(err.to_string())
        } else {
            TransportFault::Other(err.to_string())
        }
    }
}

/// Configuration errors.
///
/// These errors occur when loading or validating configuration from
/// environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl ConfigError {
    /// Create a new invalid value error.
    pub fn invalid_value(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue(name.into(), reason.into())
    }
}

/// Result type alias using the unified Error type.
pub type Result<T> = std::result::Result<T, Error>;
