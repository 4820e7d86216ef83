//! GET /list_faqs: enumerates stored FAQs up to the configured cap.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Response};
use faq_store::FaqRecord;
use serde::Serialize;
use tracing::debug;

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::AppResult,
};

#[derive(Debug, Serialize)]
pub struct ListFaqsResponse {
    pub faqs: Vec<FaqRecord>,
    pub count: usize,
}

pub async fn list_faqs(State(state): State<Arc<AppState>>) -> AppResult<Response> {
    let pipeline = state.pipeline.get().await?;
    let faqs = pipeline.list().await?;
    debug!(count = faqs.len(), "list_faqs");

    let count = faqs.len();
    Ok(ApiResponse::success(ListFaqsResponse { faqs, count })
        .into_response_with_status(StatusCode::OK))
}
