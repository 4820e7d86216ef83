//! Shared model service with two profiles: `generation` and `embedding`.
//!
//! - Construct once, wrap in `Arc`, pass clones to dependents.
//! - HTTP clients are built in [`LlmServiceProfiles::new`], so a bad config fails there
//!   and not on the first request.
//! - The embedding profile is optional: deployments that embed locally only configure
//!   generation, and [`LlmServiceProfiles::embed`] then reports `MissingProfile`.
//!
//! # Example
//! ```no_run
//! use std::sync::Arc;
//! use ai_llm_service::{LlmServiceProfiles, config::default_config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let generation = default_config::config_generation()?;
//! let embedding = default_config::config_embedding(generation.provider)?;
//! let svc = Arc::new(LlmServiceProfiles::new(generation, Some(embedding), Some(10))?);
//!
//! let answer = svc.generate("Say hello").await?;
//! let vector = svc.embed("hello").await?;
//! println!("{answer} / dim={}", vector.len());
//! # Ok(()) }
//! ```

use tracing::debug;

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::AiLlmError,
    health_service::{HealthService, HealthStatus},
    services::{ollama_service::OllamaService, open_ai_service::OpenAiService},
};

/// Provider-dispatched client for one profile.
#[derive(Debug)]
enum ModelClient {
    Ollama(OllamaService),
    OpenAI(OpenAiService),
}

impl ModelClient {
    fn new(cfg: &LlmModelConfig) -> Result<Self, AiLlmError> {
        Ok(match cfg.provider {
            LlmProvider::Ollama => Self::Ollama(OllamaService::new(cfg.clone())?),
            LlmProvider::OpenAI => Self::OpenAI(OpenAiService::new(cfg.clone())?),
        })
    }

    async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        match self {
            Self::Ollama(c) => c.generate(prompt).await,
            Self::OpenAI(c) => c.generate(prompt).await,
        }
    }

    async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match self {
            Self::Ollama(c) => c.embeddings(input).await,
            Self::OpenAI(c) => c.embeddings(input).await,
        }
    }
}

/// Generation + embedding profiles behind one handle.
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    embedding: Option<LlmModelConfig>,

    generation_client: ModelClient,
    embedding_client: Option<ModelClient>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Builds clients for both profiles.
    ///
    /// # Errors
    /// Provider/endpoint validation errors or HTTP client build failures.
    pub fn new(
        generation: LlmModelConfig,
        embedding: Option<LlmModelConfig>,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, AiLlmError> {
        let generation_client = ModelClient::new(&generation)?;
        let embedding_client = embedding.as_ref().map(ModelClient::new).transpose()?;

        debug!(
            generation = %generation.model,
            embedding = embedding.as_ref().map(|c| c.model.as_str()).unwrap_or("none"),
            "LlmServiceProfiles initialized"
        );

        Ok(Self {
            generation,
            embedding,
            generation_client,
            embedding_client,
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Generates text with the generation profile.
    pub async fn generate(&self, prompt: &str) -> Result<String, AiLlmError> {
        self.generation_client.generate(prompt).await
    }

    /// Embeds text with the embedding profile.
    ///
    /// # Errors
    /// [`AiLlmError::MissingProfile`] when no embedding profile was configured.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, AiLlmError> {
        match &self.embedding_client {
            Some(c) => c.embed(input).await,
            None => Err(AiLlmError::MissingProfile("embedding")),
        }
    }

    /// Model identifier of the generation profile.
    pub fn generation_model(&self) -> &str {
        &self.generation.model
    }

    /// Returns `(generation, embedding)` configs.
    pub fn profiles(&self) -> (&LlmModelConfig, Option<&LlmModelConfig>) {
        (&self.generation, self.embedding.as_ref())
    }

    /// Probes every configured profile; identical configs are probed once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut out = vec![self.health.check("generation", &self.generation).await];
        if let Some(emb) = &self.embedding {
            if emb.base_url() != self.generation.base_url() || emb.model != self.generation.model {
                out.push(self.health.check("embedding", emb).await);
            }
        }
        out
    }
}
