//! HTTP surface: an axum router over the summarizer pipeline.

mod error;
mod handlers;
mod models;
mod upload;

pub use error::ApiError;
pub use models::{ExtractResponse, IndexResponse};

use crate::agent::{AgentError, Provider};
use crate::config::Config;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared, read-only state handed to every handler
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub provider: Provider,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AgentError> {
        let provider = Provider::from_config(&config)?;
        Ok(Self { config, provider })
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.server.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/extract", post(handlers::extract))
        .route("/summarize", post(handlers::summarize))
        .route("/summarize/upload", post(handlers::summarize_upload))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Bind the configured address and serve until the process is stopped
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let bind = state.config.server.bind.clone();
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
