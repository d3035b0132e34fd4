//! Tracing initialization for the image-gen server.
//!
//! Logs always go to stderr: in stdio mode stdout carries the MCP protocol
//! stream and must not receive anything else.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Controls the log level and filtering. Examples:
//!   - `RUST_LOG=debug` - Enable debug logging for all modules
//!   - `RUST_LOG=image_gen=debug` - Enable debug for the server crate
//!   - `RUST_LOG=warn,image_gen_common=debug` - Warn by default, debug for common

use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    prelude::*,
};

fn subscriber(default_level: &str) -> impl ::tracing::Subscriber + Send + Sync + 'static {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry().with(env_filter).with(fmt_layer)
}

/// Initialize the tracing subscriber, defaulting to `info` when `RUST_LOG`
/// is not set.
///
/// # Panics
///
/// Panics if a global subscriber has already been installed.
///
/// # Example
///
/// ```no_run
/// use image_gen_common::tracing::init_tracing;
///
/// init_tracing();
/// tracing::info!("Server starting");
/// ```
pub fn init_tracing() {
    subscriber("info").init();
}

/// Try to initialize tracing, returning an error if already initialized.
///
/// Unlike `init_tracing()`, this does not panic when a subscriber is
/// already set, which makes it safe to call from tests.
pub fn try_init_tracing() -> Result<(), ()> {
    subscriber("info").try_init().map_err(|_| ())
}
