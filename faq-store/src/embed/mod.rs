use std::{future::Future, pin::Pin};

use crate::errors::FaqStoreError;

/// Provider interface for embedding generation.
///
/// Async because real providers (Ollama, OpenAI) perform HTTP requests.
/// Implement it to plug in another backend.
pub trait EmbeddingsProvider: Send + Sync {
    fn embed<'a>(
        &'a self,
        text: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, FaqStoreError>> + Send + 'a>>;
}

pub mod hash_embedder;
pub mod llm_embedder;
