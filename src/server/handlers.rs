use super::models::{ExtractResponse, IndexResponse};
use super::upload::parse_multipart;
use super::{ApiError, AppState};
use crate::extract;
use crate::pipeline::{self, SummaryRequest};
use crate::prompt::truncate_chars;
use crate::summary::SummaryResult;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde_json::{json, Value};
use std::sync::Arc;

pub async fn index(State(state): State<Arc<AppState>>) -> Json<IndexResponse> {
    let mode = if state.provider.is_dry_run() {
        "dry-run"
    } else {
        "live"
    };
    Json(IndexResponse {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        mode: mode.to_string(),
    })
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn extract(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, ApiError> {
    let form = parse_multipart(multipart).await?;
    let filename = form.file.filename;
    let extracted = extract::extract_blocking(form.file.data, filename.clone()).await?;

    let preview = truncate_chars(&extracted.text, state.config.server.preview_chars);
    Ok(Json(ExtractResponse {
        filename,
        chars: extracted.char_count,
        text: preview.to_string(),
    }))
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    body: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResult>, ApiError> {
    let Json(request) = body?;
    let result =
        pipeline::summarize(&state.provider, &request, &state.config.agent.model).await?;
    Ok(Json(result))
}

pub async fn summarize_upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<SummaryResult>, ApiError> {
    let form = parse_multipart(multipart).await?;
    let result = pipeline::summarize_document(
        &state.provider,
        form.file.data,
        form.file.filename,
        form.request,
        &state.config.agent.model,
    )
    .await?;
    Ok(Json(result))
}
