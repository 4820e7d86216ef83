use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use faq_qa::QaError;
use faq_store::{ErrorKind, FaqStoreError};
use thiserror::Error;

use crate::core::http::response_envelope::{ApiErrorDetail, ApiResponse};

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("{message}")]
    BadRequest {
        message: String,
        path: Option<&'static str>,
    },

    // --- Pipeline ---
    #[error(transparent)]
    Qa(#[from] QaError),

    #[error(transparent)]
    Store(#[from] FaqStoreError),
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            message: message.into(),
            path: None,
        }
    }

    /// Missing or empty request field.
    pub fn missing_field(field: &'static str) -> Self {
        AppError::BadRequest {
            message: format!("Please provide '{field}' in JSON"),
            path: Some(field),
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            AppError::BadRequest { .. } => ErrorKind::Input,
            AppError::Qa(e) => e.kind(),
            AppError::Store(e) => e.kind(),
            AppError::Bind(_) | AppError::Server(_) => ErrorKind::Processing,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Input => StatusCode::BAD_REQUEST,
            ErrorKind::Processing => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest { .. } => "BAD_REQUEST",
            AppError::Qa(_) | AppError::Store(_) => match self.kind() {
                ErrorKind::Input => "INPUT_ERROR",
                ErrorKind::Processing => "PROCESSING_ERROR",
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let details = match &self {
            AppError::BadRequest {
                path: Some(path), ..
            } => vec![ApiErrorDetail {
                path: Some((*path).to_string()),
                hint: None,
            }],
            _ => Vec::new(),
        };
        ApiResponse::<()>::error(self.error_code(), self.to_string(), details)
            .into_response_with_status(status)
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::bad_request(err.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn maps_kinds_to_status() {
        let e: AppError = FaqStoreError::FileNotFound(PathBuf::from("x.csv")).into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.error_code(), "INPUT_ERROR");

        let e: AppError = QaError::Build("boom".into()).into();
        assert_eq!(e.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.error_code(), "PROCESSING_ERROR");

        let e = AppError::missing_field("question");
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(e.to_string(), "Please provide 'question' in JSON");
    }
}
