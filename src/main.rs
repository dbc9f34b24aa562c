use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use crms_core::constants::{DEFAULT_REST_ADDR, ENV_REST_ADDR};
use crms_core::core_config_from_lookup;

/// Main entry point for the CRMS application
///
/// Serves the staff page, the JSON API and Swagger UI on one address
/// (default `0.0.0.0:3000`, configurable via `CRMS_REST_ADDR`).
///
/// Configuration is read once here, from the environment and an optional `.env` file,
/// and handed to the services; nothing reads the environment after startup.
///
/// # Environment Variables
/// - `CRMS_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `GROQ_API_KEY`: API key for the hosted model (required)
/// - `CRMS_LLM_BASE_URL`, `CRMS_LLM_MODEL`, `CRMS_LLM_TEMPERATURE`, `CRMS_LLM_MAX_TOKENS`,
///   `CRMS_LLM_TIMEOUT_SECS`, `CRMS_LLM_MAX_RETRIES`: model settings
/// - `CRMS_MAX_UPLOAD_BYTES`: largest accepted PDF upload (default: 20 MiB)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("crms=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var(ENV_REST_ADDR).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = core_config_from_lookup(|name| std::env::var(name).ok())
        .context("invalid configuration")?;

    tracing::info!(
        model = cfg.llm().model.as_str(),
        max_upload_bytes = cfg.max_upload_bytes(),
        "++ Starting CRMS on {}",
        rest_addr
    );

    let state = AppState::from_config(cfg).context("failed to build model client")?;

    api_rest::serve(&rest_addr, state).await
}
