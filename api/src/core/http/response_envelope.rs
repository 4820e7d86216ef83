use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Universal response envelope: `{"status": "success", ...data}` or
/// `{"status": "error", "error": "...", "code": "..."}`.
#[derive(Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub status: ApiStatus,

    /// Success payload, flattened next to `status`.
    #[serde(flatten)]
    pub data: Option<T>,

    /// Human-friendly error message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Stable, machine-readable error code (e.g. "INPUT_ERROR").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,

    /// Optional fine-grained error details (per-field, hints, etc.).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

#[derive(Serialize)]
pub struct ApiErrorDetail {
    /// Field path like `file_path` or `top_k`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Optional hint to help the client fix the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    /// Build a success envelope.
    pub fn success(data: T) -> Self {
        Self {
            status: ApiStatus::Success,
            data: Some(data),
            error: None,
            code: None,
            details: Vec::new(),
        }
    }

    /// Build an error envelope.
    pub fn error(
        code: &'static str,
        message: impl Into<String>,
        details: Vec<ApiErrorDetail>,
    ) -> Self {
        Self {
            status: ApiStatus::Error,
            data: None,
            error: Some(message.into()),
            code: Some(code),
            details,
        }
    }

    /// Convert to axum Response.
    pub fn into_response_with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Rows {
        rows: usize,
    }

    #[test]
    fn success_is_flat() {
        let v = serde_json::to_value(ApiResponse::success(Rows { rows: 2 })).unwrap();
        assert_eq!(v, json!({ "status": "success", "rows": 2 }));
    }

    #[test]
    fn error_has_message_and_code() {
        let v = serde_json::to_value(ApiResponse::<()>::error("INPUT_ERROR", "bad", vec![]))
            .unwrap();
        assert_eq!(
            v,
            json!({ "status": "error", "error": "bad", "code": "INPUT_ERROR" })
        );
    }
}
