//! image-gen MCP server
//!
//! MCP server for text-to-image generation using the Together AI images API.

use anyhow::Result;
use clap::Parser;
use image_gen::ImageGenServer;
use image_gen_common::config::API_KEY_VAR;
use image_gen_common::{Config, McpServerBuilder, TransportArgs};

/// Command-line arguments for the image-gen server.
#[derive(Parser, Debug)]
#[command(name = "image-gen")]
#[command(about = "MCP server for image generation using the Together AI images API")]
struct Args {
    /// Transport configuration
    #[command(flatten)]
    transport: TransportArgs,
}

#[tokio::main]
async fn main() -> Result<()> {
    image_gen_common::tracing::init_tracing();

    tracing::info!("image-gen server starting...");

    let args = Args::parse();

    let config = Config::from_env()?;
    if !config.has_api_key() {
        tracing::warn!("{} is not set; requests will be rejected by the API", API_KEY_VAR);
    }
    tracing::info!(
        endpoint = %config.api_url,
        default_model = %config.default_model,
        timeout_secs = config.timeout.as_secs(),
        "Configuration loaded"
    );

    let server = ImageGenServer::new(config);

    let transport = args.transport.into_transport();
    tracing::info!(transport = %transport, "Starting MCP server");

    McpServerBuilder::new(server)
        .with_transport(transport)
        .run()
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
