//! HTTP boundary of the FAQ service.
//!
//! Routes:
//! - `POST /ingest_csv`: ingest a CSV by server-side path
//! - `POST /ask_question`: retrieval-augmented answer
//! - `GET  /list_faqs`: enumerate stored FAQs
//! - `POST /delete_faqs`: reset the collection
//! - `GET  /health`: pipeline + model probes
//!
//! Every response is a tagged envelope (`status: success | error`); failures never
//! escape as panics or bare strings.

pub mod core;
pub mod error_handler;
pub mod middleware_layer;
mod routes;

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{info, warn};

use crate::{
    core::app_state::AppState,
    error_handler::AppError,
    middleware_layer::json_extractor::json_error_mapper,
    routes::{
        ask::ask_question_route::ask_question,
        faqs::{delete_faqs_route::delete_faqs, list_faqs_route::list_faqs},
        health::health_route::health,
        ingest::ingest_csv_route::ingest_csv,
    },
};

/// Builds the application router; used by [`start`] and by tests.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/ingest_csv", post(ingest_csv))
        .route("/ask_question", post(ask_question))
        .route("/list_faqs", get(list_faqs))
        .route("/delete_faqs", post(delete_faqs))
        .route("/health", get(health))
        .layer(middleware::from_fn(json_error_mapper))
        .with_state(state)
}

/// Serves on `addr` until Ctrl+C.
///
/// # Errors
/// [`AppError::Bind`] when the address cannot be bound, [`AppError::Server`] on I/O failure.
pub async fn start(state: Arc<AppState>, addr: &str) -> Result<(), AppError> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "FAQ API listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("FAQ API stopped");
    Ok(())
}

/// Resolves when Ctrl+C is pressed.
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
