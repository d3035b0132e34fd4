//! MCP server runner.
//!
//! Serves an `rmcp` handler over the selected [`Transport`] until the client
//! disconnects, a shutdown signal arrives, or the shutdown channel fires.
//!
//! # Example
//!
//! ```ignore
//! use image_gen_common::server::McpServerBuilder;
//! use image_gen_common::transport::Transport;
//!
//! McpServerBuilder::new(handler)
//!     .with_transport(Transport::Stdio)
//!     .run()
//!     .await?;
//! ```

use crate::transport::Transport;
use rmcp::{ServerHandler, ServiceExt};
use std::future::Future;
use thiserror::Error;
use tokio::sync::oneshot;

/// Path the streamable HTTP service is mounted under.
pub const MCP_HTTP_PATH: &str = "/mcp";

/// Errors that can occur when running an MCP server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind to the specified port
    #[error("Failed to bind to port {port}: {message}")]
    BindFailed { port: u16, message: String },

    /// Transport error during communication
    #[error("Transport error: {0}")]
    Transport(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring and running an MCP server.
pub struct McpServerBuilder<H> {
    handler: H,
    transport: Transport,
    shutdown_rx: Option<oneshot::Receiver<()>>,
}

impl<H> McpServerBuilder<H>
where
    H: ServerHandler + Clone + Send + Sync + 'static,
{
    /// Create a new server builder with the given handler.
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            transport: Transport::default(),
            shutdown_rx: None,
        }
    }

    /// Set the transport mode for the server.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set a shutdown signal receiver for graceful shutdown.
    ///
    /// The server stops when a message is sent or the sender is dropped.
    /// Without one, the server stops on SIGINT/SIGTERM.
    pub fn with_shutdown(mut self, shutdown_rx: oneshot::Receiver<()>) -> Self {
        self.shutdown_rx = Some(shutdown_rx);
        self
    }

    /// Run the MCP server with the configured transport.
    pub async fn run(self) -> Result<(), ServerError> {
        tracing::info!(transport = %self.transport, "Starting MCP server");

        let shutdown = shutdown_future(self.shutdown_rx);
        match self.transport {
            Transport::Stdio => run_stdio(self.handler, shutdown).await,
            Transport::Http { port } => run_http(self.handler, port, shutdown).await,
        }
    }
}

async fn run_stdio<H>(
    handler: H,
    shutdown: impl Future<Output = ()>,
) -> Result<(), ServerError>
where
    H: ServerHandler + Clone + Send + Sync + 'static,
{
    let service = handler
        .serve(rmcp::transport::io::stdio())
        .await
        .map_err(|e| ServerError::Transport(e.to_string()))?;

    tokio::select! {
        result = service.waiting() => {
            result.map_err(|e| ServerError::Transport(e.to_string()))?;
            tracing::info!("Client disconnected");
        }
        _ = shutdown => {
            tracing::info!("Received shutdown signal, stopping server");
        }
    }
    Ok(())
}

async fn run_http<H>(
    handler: H,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ServerError>
where
    H: ServerHandler + Clone + Send + Sync + 'static,
{
    use rmcp::transport::streamable_http_server::{
        StreamableHttpService, session::local::LocalSessionManager,
    };

    let service = StreamableHttpService::new(
        move || Ok(handler.clone()),
        LocalSessionManager::default().into(),
        Default::default(),
    );

    let router = axum::Router::new().nest_service(MCP_HTTP_PATH, service);

    let tcp_listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| ServerError::BindFailed {
            port,
            message: e.to_string(),
        })?;

    tracing::info!(port, path = MCP_HTTP_PATH, "HTTP server listening");

    axum::serve(tcp_listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Resolve when the shutdown channel fires, or on an OS signal when no
/// channel was given.
async fn shutdown_future(shutdown_rx: Option<oneshot::Receiver<()>>) {
    match shutdown_rx {
        Some(rx) => {
            let _ = rx.await;
        }
        None => {
            if let Err(e) = wait_for_shutdown_signal().await {
                tracing::warn!(error = %e, "Could not install signal handlers");
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C elsewhere).
async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => tracing::info!("Received SIGTERM"),
            _ = sigint.recv() => tracing::info!("Received SIGINT"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        tracing::info!("Received Ctrl+C");
    }

    Ok(())
}

/// Create a channel for triggering shutdown programmatically.
///
/// Pass the receiver to [`McpServerBuilder::with_shutdown`].
pub fn shutdown_channel() -> (oneshot::Sender<()>, oneshot::Receiver<()>) {
    oneshot::channel()
}
