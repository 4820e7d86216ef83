//! POST /delete_faqs: clears the collection and its persisted storage.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use serde::Serialize;
use tracing::info;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct DeleteFaqsResponse {
    pub message: String,
}

pub async fn delete_faqs(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    state.pipeline.reset().await?;
    info!("delete_faqs: collection cleared");

    Ok(ApiResponse::success(DeleteFaqsResponse {
        message: "All FAQs deleted".into(),
    })
    .into_response_with_status(StatusCode::OK))
}
