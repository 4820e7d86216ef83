//! Model configs loaded from environment variables.
//!
//! Two roles are resolved here:
//!
//! - **generation** → [`config_generation`], the model that writes `model_answer`
//! - **embedding**  → [`config_embedding`], the model that vectorizes FAQ text and queries
//!
//! Every function has a `*_from` twin that takes a lookup closure instead of reading the
//! process environment; the binary uses the env variants, tests use the closures.
//!
//! # Environment variables
//!
//! Common:
//! - `LLM_KIND`         = generation provider (`ollama` | `openai`), default `ollama`
//! - `LLM_MODEL`        = generation model, default `llama3.2` / `gpt-4o-mini`
//! - `LLM_MAX_TOKENS`   = max generated tokens (u32), default `256`
//! - `LLM_TIMEOUT_SECS` = optional HTTP timeout (u64) for both roles
//! - `EMBEDDING_MODEL`  = embedding model, default `all-minilm` / `text-embedding-3-small`
//!
//! Ollama:
//! - `OLLAMA_URL` or `OLLAMA_PORT`, default `http://localhost:11434`
//!
//! OpenAI:
//! - `OPENAI_URL` (default `https://api.openai.com`), `OPENAI_API_KEY` (required)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{AiLlmError, ConfigError, validate_http_endpoint},
};

/// Maximum generation length used when `LLM_MAX_TOKENS` is unset.
pub const DEFAULT_MAX_TOKENS: u32 = 256;

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";

/// Generation config from the process environment.
pub fn config_generation() -> Result<LlmModelConfig, AiLlmError> {
    config_generation_from(&process_env)
}

/// Embedding config for `provider` from the process environment.
pub fn config_embedding(provider: LlmProvider) -> Result<LlmModelConfig, AiLlmError> {
    config_embedding_from(provider, &process_env)
}

/// Generation config from an arbitrary lookup.
///
/// # Defaults
/// - `temperature = Some(0.2)`
/// - `max_tokens = Some(256)`
pub fn config_generation_from(
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match non_empty(lookup, "LLM_KIND") {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::Ollama,
    };
    let model = non_empty(lookup, "LLM_MODEL").unwrap_or_else(|| {
        match provider {
            LlmProvider::Ollama => "llama3.2",
            LlmProvider::OpenAI => "gpt-4o-mini",
        }
        .to_string()
    });
    let max_tokens = parse_u32(lookup, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS);

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_for(provider, lookup)?,
        api_key: api_key_for(provider, lookup)?,
        max_tokens: Some(max_tokens),
        temperature: Some(0.2),
        top_p: None,
        timeout_secs: parse_u64(lookup, "LLM_TIMEOUT_SECS")?,
    })
}

/// Embedding config for `provider` from an arbitrary lookup.
///
/// # Defaults
/// - `temperature = Some(0.0)` (deterministic)
/// - `max_tokens = None`
pub fn config_embedding_from(
    provider: LlmProvider,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<LlmModelConfig, AiLlmError> {
    let model = non_empty(lookup, "EMBEDDING_MODEL").unwrap_or_else(|| {
        match provider {
            LlmProvider::Ollama => "all-minilm",
            LlmProvider::OpenAI => "text-embedding-3-small",
        }
        .to_string()
    });

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint: endpoint_for(provider, lookup)?,
        api_key: api_key_for(provider, lookup)?,
        max_tokens: None,
        temperature: Some(0.0),
        top_p: None,
        timeout_secs: parse_u64(lookup, "LLM_TIMEOUT_SECS")?,
    })
}

/// Resolves the provider endpoint.
///
/// Ollama precedence: `OLLAMA_URL`, then `OLLAMA_PORT` → `http://localhost:{port}`,
/// then the default local endpoint.
fn endpoint_for(
    provider: LlmProvider,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<String, AiLlmError> {
    match provider {
        LlmProvider::Ollama => {
            if let Some(url) = non_empty(lookup, "OLLAMA_URL") {
                validate_http_endpoint("OLLAMA_URL", &url)?;
                return Ok(url);
            }
            if let Some(port) = non_empty(lookup, "OLLAMA_PORT") {
                port.trim()
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidNumber {
                        var: "OLLAMA_PORT",
                        reason: "expected u16 (1..=65535)",
                    })?;
                return Ok(format!("http://localhost:{}", port.trim()));
            }
            Ok(DEFAULT_OLLAMA_URL.to_string())
        }
        LlmProvider::OpenAI => {
            let url = non_empty(lookup, "OPENAI_URL").unwrap_or_else(|| DEFAULT_OPENAI_URL.into());
            validate_http_endpoint("OPENAI_URL", &url)?;
            Ok(url)
        }
    }
}

fn api_key_for(
    provider: LlmProvider,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> Result<Option<String>, AiLlmError> {
    match provider {
        LlmProvider::Ollama => Ok(None),
        LlmProvider::OpenAI => non_empty(lookup, "OPENAI_API_KEY")
            .map(Some)
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY").into()),
    }
}

fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(lookup: &dyn Fn(&str) -> Option<String>, name: &str) -> Option<String> {
    lookup(name).filter(|v| !v.trim().is_empty())
}

fn parse_u32(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u32>, AiLlmError> {
    non_empty(lookup, name)
        .map(|v| {
            v.trim().parse::<u32>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u32",
                })
            })
        })
        .transpose()
}

fn parse_u64(
    lookup: &dyn Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, AiLlmError> {
    non_empty(lookup, name)
        .map(|v| {
            v.trim().parse::<u64>().map_err(|_| {
                AiLlmError::from(ConfigError::InvalidNumber {
                    var: name,
                    reason: "expected u64",
                })
            })
        })
        .transpose()
}
