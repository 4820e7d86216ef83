//! Unified error types for the crate.

use std::path::PathBuf;

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// Which side of the service boundary an error belongs to.
///
/// `Input` errors are the caller's fault (bad path, bad CSV, bad arguments) and map to 4xx;
/// `Processing` errors come from embedding, storage or generation and map to 5xx.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Processing,
}

/// Top-level error for faq-store operations.
#[derive(Debug, Error)]
pub enum FaqStoreError {
    /// The ingestion source does not exist.
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Header row lacks a required column.
    #[error("CSV is missing required column(s): {}", .missing.join(", "))]
    Schema { missing: Vec<&'static str> },

    /// Ragged rows, bad quoting, invalid UTF-8.
    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Caller passed something unusable (e.g. an empty query).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt line in the local collection file.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Mismatch in vector dimensionality.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding provider failure.
    #[error("embedding failed: {0}")]
    Embedding(#[from] AiLlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}

impl FaqStoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileNotFound(_) | Self::Schema { .. } | Self::Csv(_) | Self::InvalidInput(_) => {
                ErrorKind::Input
            }
            _ => ErrorKind::Processing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_input_and_processing() {
        let schema = FaqStoreError::Schema {
            missing: vec!["Question", "Answer"],
        };
        assert_eq!(schema.kind(), ErrorKind::Input);
        assert_eq!(
            schema.to_string(),
            "CSV is missing required column(s): Question, Answer"
        );
        assert_eq!(
            FaqStoreError::Qdrant("down".into()).kind(),
            ErrorKind::Processing
        );
        assert_eq!(
            FaqStoreError::VectorSizeMismatch { got: 3, want: 4 }.kind(),
            ErrorKind::Processing
        );
    }
}
