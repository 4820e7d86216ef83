//! GET /health: checks that the pipeline builds and probes the model endpoints.

use std::sync::Arc;

use ai_llm_service::HealthStatus;
use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::warn;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub message: String,
    pub backend: &'static str,
    pub model_version: String,
    pub models: Vec<HealthStatus>,
}

/// 200 whenever the pipeline builds; unreachable models only degrade `message`.
pub async fn health(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let (backend, model_version) = {
        let pipeline = state.pipeline.get().await?;
        (pipeline.store().backend_name(), pipeline.model_version().to_string())
    };

    let models = match &state.models {
        Some(svc) => svc.health_all().await,
        None => Vec::new(),
    };

    let degraded: Vec<&str> = models
        .iter()
        .filter(|m| !m.ok)
        .map(|m| m.role.as_str())
        .collect();
    let message = if degraded.is_empty() {
        "QA pipeline is ready".to_string()
    } else {
        warn!(?degraded, "health: model probes failed");
        format!("QA pipeline is ready; degraded models: {}", degraded.join(", "))
    };

    Ok(ApiResponse::success(HealthResponse {
        message,
        backend,
        model_version,
        models,
    })
    .into_response_with_status(StatusCode::OK))
}
