//! # API REST
//!
//! REST API implementation for CRMS.
//!
//! Handles:
//! - HTTP endpoints with axum, including the multipart patient upload
//! - The single-page staff UI served at `/`
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON serialization, CORS, status codes)
//!
//! Uses `api-shared` for wire types and `crms-core` for every operation.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;
mod page;

pub use error::ApiError;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, put},
    Router,
};
use crms_core::{CoreConfig, PatientService};
use crms_llm::{LlmResult, OpenAiCompatibleClient};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Room for multipart boundaries and the text fields around the uploaded PDF.
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Application state for the REST API server
///
/// Contains shared state that needs to be accessible to all request handlers,
/// including the PatientService instance that owns the session.
#[derive(Clone)]
pub struct AppState {
    pub service: PatientService,
}

impl AppState {
    /// Builds the state around a hosted model client configured from `cfg`.
    ///
    /// # Errors
    /// Returns an `LlmError` if the HTTP client cannot be built from the model settings.
    pub fn from_config(cfg: CoreConfig) -> LlmResult<Self> {
        let model = OpenAiCompatibleClient::new(cfg.llm().clone())?;
        tracing::info!(model = cfg.llm().model.as_str(), "configured chat model");
        Ok(Self {
            service: PatientService::new(Arc::new(cfg), Arc::new(model)),
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_patients,
        handlers::create_patient,
        handlers::get_patient,
        handlers::update_prescription,
        handlers::chat_history,
        handlers::ask,
        handlers::clear_chat,
    ),
    components(schemas(
        api_shared::HealthRes,
        api_shared::PatientSummaryRes,
        api_shared::PatientRes,
        api_shared::ListPatientsRes,
        api_shared::CreatePatientRes,
        api_shared::UpdatePrescriptionReq,
        api_shared::UpdatePrescriptionRes,
        api_shared::ChatReq,
        api_shared::ChatEntryRes,
        api_shared::ChatRes,
        api_shared::ChatHistoryRes,
        api_shared::ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the full application router: the page, the JSON API and Swagger UI.
pub fn router(state: AppState) -> Router {
    let body_limit = state
        .service
        .config()
        .max_upload_bytes()
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);

    Router::new()
        .route("/", get(page::index))
        .route("/health", get(handlers::health))
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route("/patients/:id", get(handlers::get_patient))
        .route(
            "/patients/:id/prescription",
            put(handlers::update_prescription),
        )
        .route(
            "/chat",
            get(handlers::chat_history)
                .post(handlers::ask)
                .delete(handlers::clear_chat),
        )
        .merge(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Binds `addr` and serves the application until the process is stopped.
///
/// # Errors
/// Returns an error if the address cannot be bound or the server fails while running.
pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("-- Serving CRMS on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
