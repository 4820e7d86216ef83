//! Typed error for the faq-qa crate.

use ai_llm_service::AiLlmError;
use faq_store::{ErrorKind, FaqStoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QaError {
    /// Errors from the underlying faq-store crate.
    #[error("store error: {0}")]
    Store(#[from] FaqStoreError),

    /// Generative model failure.
    #[error("generation failed: {0}")]
    Generation(#[from] AiLlmError),

    #[error("question must not be empty")]
    EmptyQuestion,

    #[error("top_k must be >= 1")]
    InvalidTopK,

    /// The pipeline could not be assembled.
    #[error("pipeline unavailable: {0}")]
    Build(String),
}

impl QaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(e) => e.kind(),
            Self::EmptyQuestion | Self::InvalidTopK => ErrorKind::Input,
            Self::Generation(_) | Self::Build(_) => ErrorKind::Processing,
        }
    }
}
