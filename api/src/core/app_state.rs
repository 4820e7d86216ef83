use std::sync::Arc;

use ai_llm_service::LlmServiceProfiles;
use faq_qa::PipelineHandle;

/// Shared state for all HTTP handlers.
pub struct AppState {
    /// Lazily built FAQ pipeline; reset through `/delete_faqs`.
    pub pipeline: Arc<PipelineHandle>,
    /// Model services probed by `/health`; `None` when running without remote models.
    pub models: Option<Arc<LlmServiceProfiles>>,
}

impl AppState {
    pub fn new(pipeline: Arc<PipelineHandle>, models: Option<Arc<LlmServiceProfiles>>) -> Self {
        Self { pipeline, models }
    }
}
