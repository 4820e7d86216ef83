//! Embedding provider backed by the `embedding` profile of [`LlmServiceProfiles`].

use std::{future::Future, pin::Pin, sync::Arc};

use ai_llm_service::LlmServiceProfiles;

use crate::{EmbeddingsProvider, FaqStoreError};

/// Delegates to `ai-llm-service`; optionally enforces the vector size.
#[derive(Clone)]
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
    dim: Option<usize>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>, dim: Option<usize>) -> Self {
        Self { svc, dim }
    }
}

impl EmbeddingsProvider for LlmEmbedder {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, FaqStoreError>> + Send + 'a>> {
        Box::pin(async move {
            let v = self.svc.embed(text).await?;

            if let Some(want) = self.dim {
                if v.len() != want {
                    return Err(FaqStoreError::VectorSizeMismatch { got: v.len(), want });
                }
            }
            Ok(v)
        })
    }
}
