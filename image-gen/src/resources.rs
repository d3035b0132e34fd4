//! MCP Resources for the image-gen server.
//!
//! - `image://models` - known Together AI image models
//! - `image://config` - the endpoint and defaults the tool sends requests with

use crate::handler::{IMAGE_MIME_TYPE, RESPONSE_FORMAT};
use image_gen_common::config::Config;
use image_gen_common::models::IMAGE_MODELS;
use serde::Serialize;

/// URI of the models resource.
pub const MODELS_URI: &str = "image://models";

/// URI of the configuration resource.
pub const CONFIG_URI: &str = "image://config";

/// Information about a known image model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: &'static str,
    /// Human-readable name
    pub display_name: &'static str,
    /// Default number of inference steps
    pub default_steps: u8,
    /// Whether this is the fallback model
    pub is_default: bool,
}

/// Configuration as exposed to clients. The token is never included.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigInfo {
    /// Image generation endpoint
    pub endpoint: String,
    /// Model used when the requested one is unavailable
    pub default_model: String,
    /// Per-call timeout in seconds
    pub timeout_secs: u64,
    /// Response format requested from the API
    pub response_format: &'static str,
    /// MIME type declared for returned images
    pub mime_type: &'static str,
    /// Whether a token is configured
    pub api_key_configured: bool,
}

/// List the known image models, marking the configured default.
pub fn list_models(config: &Config) -> Vec<ModelInfo> {
    IMAGE_MODELS
        .iter()
        .map(|m| ModelInfo {
            id: m.id,
            display_name: m.display_name,
            default_steps: m.default_steps,
            is_default: m.id == config.default_model,
        })
        .collect()
}

/// Describe the configuration.
pub fn config_info(config: &Config) -> ConfigInfo {
    ConfigInfo {
        endpoint: config.api_url.clone(),
        default_model: config.default_model.clone(),
        timeout_secs: config.timeout.as_secs(),
        response_format: RESPONSE_FORMAT,
        mime_type: IMAGE_MIME_TYPE,
        api_key_configured: config.has_api_key(),
    }
}

/// Get models resource as JSON string.
pub fn models_resource_json(config: &Config) -> String {
    serde_json::to_string_pretty(&list_models(config)).unwrap_or_else(|_| "[]".to_string())
}

/// Get config resource as JSON string.
pub fn config_resource_json(config: &Config) -> String {
    serde_json::to_string_pretty(&config_info(config)).unwrap_or_else(|_| "{}".to_string())
}
