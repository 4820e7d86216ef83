//! POST /ask_question: answers a question with retrieved FAQs as context.

use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::{debug, error};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::{
        ask::ask_request::{AskRequest, AskResponse},
        request_id,
    },
};

/// Handler: POST /ask_question
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5002/ask_question \
///   -H 'content-type: application/json' \
///   -d '{"question":"How do I reset my password?","top_k":3}'
/// ```
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let request_id = request_id(&headers);

    let question = body
        .question
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("question"))?;

    debug!(%request_id, top_k = ?body.top_k, "ask_question: start");

    let pipeline = state.pipeline.get().await?;
    match pipeline.answer(&question, body.top_k).await {
        Ok(res) => {
            debug!(%request_id, hits = res.top_faqs.len(), "ask_question: success");
            Ok(ApiResponse::success(AskResponse::from(res)).into_response_with_status(StatusCode::OK))
        }
        Err(err) => {
            error!(%request_id, error = %err, "ask_question: failed");
            Err(err.into())
        }
    }
}
