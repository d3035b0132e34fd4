//! MCP Server implementation for the image-gen server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - Resources for known models and the active configuration

use crate::handler::{ImageGenHandler, ToolResult};
use crate::resources::{self, CONFIG_URI, MODELS_URI};
use image_gen_common::config::Config;
use rmcp::{
    model::{
        CallToolResult, Content, Implementation, ListResourcesResult, ListToolsResult,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info};

/// Name of the single tool this server exposes.
pub const GENERATE_IMAGE_TOOL: &str = "generate_image";

/// Name reported in the server info.
pub const SERVER_NAME: &str = "image-gen";

/// MCP Server for image generation.
#[derive(Debug, Clone)]
pub struct ImageGenServer {
    /// Handler for generate_image invocations
    handler: Arc<ImageGenHandler>,
    /// Server configuration
    config: Arc<Config>,
}

/// Advertised parameters of `generate_image`.
///
/// Only used to generate the input schema. Invocations are parsed leniently
/// so that missing fields produce a text result instead of a protocol error.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct GenerateImageToolParams {
    /// Text prompt describing the image to generate
    pub prompt: String,
    /// Model to use for generation (e.g. black-forest-labs/FLUX.1-schnell)
    pub model: String,
    /// Optional image width in pixels, forwarded to the API as given
    #[serde(default)]
    pub width: Option<serde_json::Number>,
    /// Optional image height in pixels, forwarded to the API as given
    #[serde(default)]
    pub height: Option<serde_json::Number>,
}

impl ImageGenServer {
    /// Create a new ImageGenServer with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);
        Self {
            handler: Arc::new(ImageGenHandler::new(Arc::clone(&config))),
            config,
        }
    }

    /// The tools this server exposes.
    pub fn tools() -> Vec<Tool> {
        let schema = schemars::schema_for!(GenerateImageToolParams);
        let input_schema = match serde_json::to_value(&schema) {
            Ok(serde_json::Value::Object(map)) => Arc::new(map),
            _ => Arc::new(serde_json::Map::new()),
        };

        vec![Tool {
            name: Cow::Borrowed(GENERATE_IMAGE_TOOL),
            description: Some(Cow::Borrowed(
                "Generate an image from a text prompt using the Together AI images API. \
                 Returns the first image as base64-encoded data. If the requested model \
                 is not available, the default model is tried once instead.",
            )),
            input_schema,
            annotations: None,
            icons: None,
            meta: None,
            output_schema: None,
            title: None,
        }]
    }

    /// Run `generate_image` with raw arguments.
    pub async fn generate_image(
        &self,
        arguments: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> CallToolResult {
        info!("Generating image");
        self.handler.run(arguments).await.into()
    }
}

impl From<ToolResult> for CallToolResult {
    fn from(result: ToolResult) -> Self {
        match result {
            ToolResult::Image(image) => {
                CallToolResult::success(vec![Content::image(image.data, image.mime_type)])
            }
            ToolResult::Text(text) => CallToolResult::error(vec![Content::text(text)]),
        }
    }
}

impl ServerHandler for ImageGenServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server backed by the Together AI images API. \
                 Use generate_image with a prompt and a model name to create an image. \
                 Read image://models for known model names."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            server_info: Implementation {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            match params.name.as_ref() {
                GENERATE_IMAGE_TOOL => Ok(self.generate_image(params.arguments).await),
                _ => Err(McpError::invalid_params(format!("Unknown tool: {}", params.name), None)),
            }
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            let models_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: MODELS_URI.to_string(),
                    name: "Known Image Models".to_string(),
                    title: None,
                    description: Some(
                        "Together AI image models and the fallback default".to_string(),
                    ),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            let config_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: CONFIG_URI.to_string(),
                    name: "Server Configuration".to_string(),
                    title: None,
                    description: Some(
                        "Endpoint, default model and timeout used for requests".to_string(),
                    ),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            Ok(ListResourcesResult {
                resources: vec![models_resource, config_resource],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = read_resource_json(&self.config, uri).ok_or_else(|| {
                McpError::resource_not_found(format!("Unknown resource: {}", uri), None)
            })?;

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}

/// JSON body of a resource, or `None` for an unknown URI.
pub fn read_resource_json(config: &Config, uri: &str) -> Option<String> {
    match uri {
        MODELS_URI => Some(resources::models_resource_json(config)),
        CONFIG_URI => Some(resources::config_resource_json(config)),
        _ => None,
    }
}
