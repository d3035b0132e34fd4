//! image-gen MCP server library
//!
//! Exposes a single `generate_image` tool backed by the Together AI images
//! API, with one retry on the default model when the requested model is
//! unavailable.

pub mod handler;
pub mod resources;
pub mod server;


pub use handler::{GeneratedImage, GenerationRequest, ImageGenHandler, ToolResult};
pub use server::{GENERATE_IMAGE_TOOL, GenerateImageToolParams, ImageGenServer};
