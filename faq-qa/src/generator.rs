//! Generative model capability.

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::error::QaError;

/// Turns a rendered prompt into answer text.
pub trait AnswerGenerator: Send + Sync {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>>;

    /// Reported to clients as `model_version`.
    fn model_version(&self) -> &str;
}

/// Generation profile of `ai-llm-service`; output length is bounded by its `max_tokens`.
#[derive(Clone)]
pub struct LlmGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

impl AnswerGenerator for LlmGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
        Box::pin(async move { Ok(self.svc.generate(prompt).await?) })
    }

    fn model_version(&self) -> &str {
        self.svc.generation_model()
    }
}
