//! Health probes for model backends (Ollama, OpenAI).
//!
//! - Ollama: `GET {endpoint}/api/tags`, best-effort check that the model is pulled
//! - OpenAI: `GET {endpoint}/v1/models` with Bearer auth, best-effort model check
//!
//! [`HealthService::check`] never fails; errors become `ok = false` in the returned
//! [`HealthStatus`], which is what the service's `/health` route reports.

use std::time::{Duration, Instant};

use reqwest::header;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{AiLlmError, HealthError, HttpError, make_snippet};

/// A serializable health snapshot for one model role.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Role the model serves (`generation`, `embedding`).
    pub role: String,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    fn new(role: &str, cfg: &LlmModelConfig, ok: bool, latency_ms: u128, message: String) -> Self {
        Self {
            role: role.to_string(),
            provider: cfg.provider.to_string(),
            endpoint: cfg.base_url().to_string(),
            model: cfg.model.clone(),
            ok,
            latency_ms,
            message,
        }
    }
}

/// Health checker that reuses a single HTTP client with a short timeout.
pub struct HealthService {
    client: reqwest::Client,
}

impl HealthService {
    /// Creates the checker; probes time out after `timeout_secs` (default 10).
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, AiLlmError> {
        let timeout = Duration::from_secs(timeout_secs.unwrap_or(10));
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        debug!(timeout_secs = timeout.as_secs(), "HealthService initialized");
        Ok(Self { client })
    }

    /// Probes the backend serving `cfg`. Never returns an error.
    pub async fn check(&self, role: &str, cfg: &LlmModelConfig) -> HealthStatus {
        if !cfg.has_http_endpoint() {
            warn!(role, endpoint = %cfg.endpoint, "invalid endpoint (empty or missing http/https)");
            return HealthStatus::new(
                role,
                cfg,
                false,
                0,
                "endpoint is empty or missing http/https".into(),
            );
        }

        let start = Instant::now();
        let result = match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(cfg).await,
            LlmProvider::OpenAI => self.probe_openai(cfg).await,
        };
        let latency = start.elapsed().as_millis();

        match result {
            Ok((ok, message)) => {
                info!(role, model = %cfg.model, ok, latency_ms = latency, "health probe completed");
                HealthStatus::new(role, cfg, ok, latency, message)
            }
            Err(err) => {
                warn!(role, model = %cfg.model, error = %err, latency_ms = latency, "health probe failed");
                HealthStatus::new(role, cfg, false, latency, err.to_string())
            }
        }
    }

    async fn probe_ollama(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/api/tags", cfg.base_url());
        debug!("GET {url}");
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp, url).await?;

        #[derive(Deserialize)]
        struct Tag {
            name: String,
        }
        #[derive(Deserialize)]
        struct Tags {
            models: Option<Vec<Tag>>,
        }

        let tags: Tags = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(e.to_string()))?;

        // Ollama reports pulled models with an explicit tag (`all-minilm:latest`).
        let wanted = &cfg.model;
        let found = tags.models.unwrap_or_default().iter().any(|m| {
            m.name == *wanted || m.name.strip_suffix(":latest") == Some(wanted.as_str())
        });

        Ok(if found {
            (true, "Ollama is healthy; model is available".into())
        } else {
            (false, "Ollama is up, but model not found in /api/tags".into())
        })
    }

    async fn probe_openai(&self, cfg: &LlmModelConfig) -> Result<(bool, String), AiLlmError> {
        let url = format!("{}/v1/models", cfg.base_url());
        let api_key = cfg
            .api_key
            .as_deref()
            .ok_or_else(|| HealthError::Decode("missing OpenAI API key".into()))?;

        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
            .send()
            .await?;
        let resp = ensure_success(resp, url).await?;

        #[derive(Deserialize)]
        struct ModelItem {
            id: String,
        }
        #[derive(Deserialize)]
        struct Models {
            data: Vec<ModelItem>,
        }

        let models: Models = resp
            .json()
            .await
            .map_err(|e| HealthError::Decode(e.to_string()))?;

        Ok(if models.data.iter().any(|m| m.id == cfg.model) {
            (true, "OpenAI is healthy; model is available".into())
        } else {
            (false, "OpenAI is up, but model not found in /v1/models".into())
        })
    }
}

async fn ensure_success(resp: reqwest::Response, url: String) -> Result<reqwest::Response, AiLlmError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status();
    let snippet = make_snippet(&resp.text().await.unwrap_or_default());
    Err(HealthError::HttpStatus(HttpError { status, url, snippet }).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_endpoint_is_reported_not_raised() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "all-minilm".into(),
            endpoint: "not-a-url".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        let status = svc.check("embedding", &cfg).await;
        assert!(!status.ok);
        assert_eq!(status.role, "embedding");
        assert_eq!(status.provider, "ollama");
        assert_eq!(status.latency_ms, 0);
    }
}
