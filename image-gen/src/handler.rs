//! Image generation handler for the image-gen MCP server.
//!
//! This module turns `generate_image` tool arguments into a Together AI
//! request, drives the upstream call, and resolves every outcome to exactly
//! one [`ToolResult`]. When the caller's model is rejected as unavailable the
//! request is retried once with the configured default model.

use image_gen_common::config::Config;
use image_gen_common::error::{Error, TransportFault};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// MIME type declared for every returned image.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Response format requested from the API: inline base64 instead of a URL.
pub const RESPONSE_FORMAT: &str = "b64_json";

/// Error code the API uses for an unavailable model.
pub const MODEL_NOT_AVAILABLE_CODE: &str = "model_not_available";

/// A validated image generation request.
///
/// `prompt` and `model` are non-blank. `width` and `height` are any JSON
/// numbers and are forwarded unchanged; the API decides which sizes it
/// accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Text prompt describing the image.
    pub prompt: String,
    /// Model identifier sent to the API.
    pub model: String,
    /// Optional image width in pixels.
    pub width: Option<Number>,
    /// Optional image height in pixels.
    pub height: Option<Number>,
}

/// Tool arguments as received; every field may be absent.
#[derive(Debug, Default, Deserialize)]
struct RawArguments {
    prompt: Option<String>,
    model: Option<String>,
    width: Option<Number>,
    height: Option<Number>,
}

impl GenerationRequest {
    /// Create a request without explicit dimensions.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            width: None,
            height: None,
        }
    }

    /// Set the requested dimensions.
    pub fn with_size(mut self, width: Option<Number>, height: Option<Number>) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Read and validate the raw tool arguments.
    ///
    /// # Errors
    /// - `Error::MissingArguments` when no arguments, or an empty object,
    ///   were sent
    /// - `Error::InvalidParameters` when a field has the wrong type
    /// - `Error::MissingParameter` when prompt or model is absent or blank
    pub fn from_arguments(arguments: Option<Map<String, Value>>) -> Result<Self, Error> {
        let arguments = arguments
            .filter(|map| !map.is_empty())
            .ok_or(Error::MissingArguments)?;
        let raw: RawArguments = serde_json::from_value(Value::Object(arguments))
            .map_err(|e| Error::invalid_parameters(e.to_string()))?;

        let request = Self {
            prompt: raw.prompt.unwrap_or_default(),
            model: raw.model.unwrap_or_default(),
            width: raw.width,
            height: raw.height,
        };
        request.validate()?;
        Ok(request)
    }

    /// Check that prompt and model are present.
    pub fn validate(&self) -> Result<(), Error> {
        if self.prompt.trim().is_empty() {
            return Err(Error::MissingParameter("prompt"));
        }
        if self.model.trim().is_empty() {
            return Err(Error::MissingParameter("model"));
        }
        Ok(())
    }

    /// The same request aimed at a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Build the JSON body for the images endpoint.
    pub fn to_payload(&self) -> TogetherRequest<'_> {
        TogetherRequest {
            model: &self.model,
            prompt: &self.prompt,
            response_format: RESPONSE_FORMAT,
            width: self.width.as_ref(),
            height: self.height.as_ref(),
        }
    }
}

/// Which attempt a reply belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// First call, with the caller's model.
    Initial,
    /// The single retry, with the default model.
    Fallback,
}

/// Classification of one upstream reply.
#[derive(Debug)]
pub enum Outcome {
    /// Status 200 without an `error` entry; carries the decoded body.
    Success(Map<String, Value>),
    /// The caller's model was rejected as unavailable. Only produced in
    /// [`Phase::Initial`].
    ModelUnavailable,
    /// Terminal failure.
    Failed(Error),
}

/// Status and decoded body of one upstream reply.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    /// HTTP status code.
    pub status: u16,
    /// Decoded JSON object; empty when the body was not a JSON object.
    pub body: Map<String, Value>,
}

impl UpstreamReply {
    /// Decode a raw reply. Anything that is not a JSON object decodes to an
    /// empty map.
    pub fn decode(status: u16, bytes: &[u8]) -> Self {
        let body = match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => Map::new(),
        };
        Self { status, body }
    }

    /// Classify this reply for the given phase.
    pub fn classify(self, phase: Phase) -> Outcome {
        let Self { status, mut body } = self;
        let error = body.remove("error").filter(|v| !v.is_null());

        match (phase, error) {
            (_, None) if status == 200 => Outcome::Success(body),
            (Phase::Initial, None) => Outcome::Failed(Error::Http(status)),
            (Phase::Initial, Some(error)) if is_model_unavailable(&error) => {
                Outcome::ModelUnavailable
            }
            (Phase::Initial, Some(error)) => Outcome::Failed(Error::api(render_error(&error))),
            (Phase::Fallback, error) => {
                Outcome::Failed(Error::fallback(status, error.as_ref().map(render_error)))
            }
        }
    }
}

/// Whether an `error` entry reports the requested model as unavailable.
///
/// Matches when the message mentions both "model" and "not available", or
/// the code is `model_not_available`; both checks ignore case. A bare string
/// is treated as the message.
pub fn is_model_unavailable(error: &Value) -> bool {
    let (message, code) = match error {
        Value::Object(map) => (
            map.get("message").and_then(Value::as_str),
            map.get("code").and_then(Value::as_str),
        ),
        Value::String(message) => (Some(message.as_str()), None),
        _ => (None, None),
    };

    let message_matches = message.is_some_and(|m| {
        let m = m.to_lowercase();
        m.contains("model") && m.contains("not available")
    });
    let code_matches = code.is_some_and(|c| c.eq_ignore_ascii_case(MODEL_NOT_AVAILABLE_CODE));

    message_matches || code_matches
}

/// Render an `error` entry for a caller-facing message. Strings are used
/// as-is, anything else as compact JSON.
pub fn render_error(error: &Value) -> String {
    match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Pull the first image out of a successful reply body.
pub fn extract_image(body: Map<String, Value>) -> Result<GeneratedImage, Error> {
    let response: TogetherResponse =
        serde_json::from_value(Value::Object(body)).map_err(|e| Error::parse(e.to_string()))?;

    let first = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| Error::parse("no images returned (data is empty)"))?;

    let data = first
        .b64_json
        .ok_or_else(|| Error::parse("data[0] has no b64_json field"))?;

    Ok(GeneratedImage {
        data,
        mime_type: IMAGE_MIME_TYPE.to_string(),
    })
}

/// Image generation handler.
///
/// Holds only the shared configuration. Each call builds its own HTTP
/// client, which is dropped when the call returns.
#[derive(Debug, Clone)]
pub struct ImageGenHandler {
    config: Arc<Config>,
}

impl ImageGenHandler {
    /// Create a new handler with the given configuration.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Configuration this handler sends requests with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run one `generate_image` invocation from raw tool arguments.
    ///
    /// Never fails: input errors, upstream rejections and transport faults
    /// all come back as [`ToolResult::Text`].
    pub async fn run(&self, arguments: Option<Map<String, Value>>) -> ToolResult {
        let result = match GenerationRequest::from_arguments(arguments) {
            Ok(request) => self.generate_image(request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(image) => ToolResult::Image(image),
            Err(e) => {
                if !e.is_input_error() {
                    warn!(error = %e, "Image generation failed");
                }
                ToolResult::Text(e.to_string())
            }
        }
    }

    /// Generate an image, retrying once with the default model if the
    /// requested one is unavailable.
    ///
    /// # Errors
    /// Returns the error describing why no image could be produced.
    #[instrument(
        level = "info",
        name = "generate_image",
        skip(self, request),
        fields(model = %request.model)
    )]
    pub async fn generate_image(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedImage, Error> {
        let http = reqwest::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(TransportFault::from)?;

        let mut request = request;
        let mut phase = Phase::Initial;

        loop {
            request.validate()?;
            let reply = self.send(&http, &request).await?;
            info!(status = reply.status, phase = ?phase, "Received reply from Together API");

            match reply.classify(phase) {
                Outcome::Success(body) => {
                    let image = extract_image(body)?;
                    info!(model = %request.model, bytes = image.data.len(), "Image generated");
                    return Ok(image);
                }
                Outcome::Failed(e) => return Err(e),
                Outcome::ModelUnavailable => {
                    warn!(
                        requested = %request.model,
                        fallback = %self.config.default_model,
                        "Model not available, retrying with default model"
                    );
                    request = request.with_model(self.config.default_model.clone());
                    phase = Phase::Fallback;
                }
            }
        }
    }

    /// Send one request and decode the reply.
    async fn send(
        &self,
        http: &reqwest::Client,
        request: &GenerationRequest,
    ) -> Result<UpstreamReply, Error> {
        let payload = request.to_payload();
        debug!(endpoint = %self.config.api_url, payload = ?payload, "Calling Together API");

        let response = http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(log_fault)?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(log_fault)?;

        Ok(UpstreamReply::decode(status, &bytes))
    }
}

fn log_fault(err: reqwest::Error) -> TransportFault {
    let fault = TransportFault::from(err);
    debug!(category = fault.category(), error = %fault, "Transport fault");
    fault
}

// =============================================================================
// API Request/Response Types
// =============================================================================

/// Together AI image generation request body.
#[derive(Debug, Serialize)]
pub struct TogetherRequest<'a> {
    /// Model identifier
    pub model: &'a str,
    /// Text prompt
    pub prompt: &'a str,
    /// Always [`RESPONSE_FORMAT`]
    pub response_format: &'static str,
    /// Image width; omitted to use the API default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<&'a Number>,
    /// Image height; omitted to use the API default
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<&'a Number>,
}

/// Successful Together AI response.
#[derive(Debug, Deserialize)]
pub struct TogetherResponse {
    /// Generated images
    pub data: Vec<TogetherImage>,
}

/// One generated image.
#[derive(Debug, Deserialize)]
pub struct TogetherImage {
    /// Base64-encoded image data
    #[serde(default)]
    pub b64_json: Option<String>,
}

// =============================================================================
// Result Types
// =============================================================================

/// Generated image data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    /// Base64-encoded image data
    pub data: String,
    /// MIME type of the image
    pub mime_type: String,
}

/// The single result of a tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolResult {
    /// The generated image.
    Image(GeneratedImage),
    /// Why no image was produced.
    Text(String),
}

impl ToolResult {
    /// Whether this result reports a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Text(_))
    }
}
