//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server and staff page on its own.
//!
//! ## Intended use
//! This binary is useful for development and debugging of the REST layer. It serves exactly
//! what the workspace's main `crms-run` binary serves, with logging filtered to this crate.

use anyhow::Context;
use api_rest::AppState;
use crms_core::constants::{DEFAULT_REST_ADDR, ENV_REST_ADDR};
use crms_core::core_config_from_lookup;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the CRMS REST API server
///
/// # Environment Variables
/// - `CRMS_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `GROQ_API_KEY`: API key for the hosted model (required)
/// - `CRMS_LLM_*`, `CRMS_MAX_UPLOAD_BYTES`: see `crms_core::config`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(ENV_REST_ADDR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    tracing::info!("-- Starting CRMS REST API on {}", addr);

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())
        .context("invalid configuration")?;
    let state = AppState::from_config(cfg).context("failed to build model client")?;

    api_rest::serve(&addr, state).await
}
