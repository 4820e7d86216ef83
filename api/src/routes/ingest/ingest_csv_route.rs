//! POST /ingest_csv: loads a FAQ CSV into the vector store.

use std::{path::Path, sync::Arc};

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use faq_store::FaqStoreError;
use tracing::{error, info};

use crate::{
    core::{app_state::AppState, http::response_envelope::ApiResponse},
    error_handler::{AppError, AppResult},
    routes::{
        ingest::ingest_csv_request::{IngestCsvRequest, IngestCsvResponse},
        request_id,
    },
};

/// Handler: POST /ingest_csv
///
/// # Example
/// ```bash
/// curl -X POST http://127.0.0.1:5002/ingest_csv \
///   -H 'content-type: application/json' \
///   -d '{"file_path":"data/faq.csv","dedup_mode":"incremental"}'
/// ```
pub async fn ingest_csv(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<IngestCsvRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(body) = payload?;
    let request_id = request_id(&headers);

    let file_path = body
        .file_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::missing_field("file_path"))?;
    if !Path::new(&file_path).is_file() {
        return Err(FaqStoreError::FileNotFound(file_path.into()).into());
    }
    let mode = body.dedup_mode.unwrap_or_default();

    info!(%request_id, %file_path, ?mode, "ingest_csv: start");

    match state.pipeline.ingest_file(&file_path, mode).await {
        Ok(report) => {
            info!(%request_id, written = report.written, "ingest_csv: success");
            Ok(ApiResponse::success(IngestCsvResponse::from(report))
                .into_response_with_status(StatusCode::OK))
        }
        Err(err) => {
            error!(%request_id, error = %err, "ingest_csv: failed");
            Err(err.into())
        }
    }
}
