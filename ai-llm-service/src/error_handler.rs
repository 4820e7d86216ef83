//! Unified error handling for `ai-llm-service`.
//!
//! One top-level error type, [`AiLlmError`], wraps the domain enums
//! ([`ConfigError`], [`ProviderError`], [`HealthError`]).
//!
//! All messages carry the `[AI LLM Service]` prefix so they are easy to attribute in logs
//! and in error messages surfaced to HTTP clients.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/// Unified result alias for the entire crate.
pub type Result<T> = std::result::Result<T, AiLlmError>;

/// Top-level error for the `ai-llm-service` crate.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum AiLlmError {
    /// Configuration/validation errors (startup).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A provider answered, but not with something usable.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Health-probe failures.
    #[error(transparent)]
    Health(#[from] HealthError),

    /// Underlying HTTP transport error (connect, timeout, TLS, body read).
    #[error("[AI LLM Service] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    /// The requested role has no configured profile (e.g. embedding served elsewhere).
    #[error("[AI LLM Service] no {0} profile configured")]
    MissingProfile(&'static str),
}

/// Errors that realistically happen while loading configuration.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is missing or empty.
    #[error("[AI LLM Service] missing required environment variable: {0}")]
    MissingVar(&'static str),

    /// A number failed to parse (ports, limits, timeouts).
    #[error("[AI LLM Service] invalid number in {var}: {reason}")]
    InvalidNumber {
        var: &'static str,
        reason: &'static str,
    },

    /// Unsupported provider in `LLM_KIND` / `EMBEDDING_KIND`.
    #[error("[AI LLM Service] unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Value had the wrong format (e.g. URL without scheme).
    #[error("[AI LLM Service] invalid format in {var}: {reason}")]
    InvalidFormat {
        var: &'static str,
        reason: &'static str,
    },
}

/// Snapshot of a non-successful HTTP exchange.
#[derive(Debug)]
pub struct HttpError {
    pub status: StatusCode,
    pub url: String,
    /// First characters of the response body.
    pub snippet: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {} from {}: {}", self.status, self.url, self.snippet)
    }
}

/// What went wrong while talking to a provider.
#[derive(Debug)]
pub enum ProviderErrorKind {
    /// Config was built for another provider.
    InvalidProvider,
    /// Endpoint is empty or lacks an http/https scheme.
    InvalidEndpoint(String),
    /// OpenAI requires a key.
    MissingApiKey,
    /// Non-2xx answer.
    HttpStatus(HttpError),
    /// Body could not be decoded into the expected shape.
    Decode(String),
    /// Chat completion returned no usable choice.
    EmptyChoices,
}

/// Provider-scoped error.
#[derive(Debug, Error)]
#[error("[AI LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidProvider => f.write_str("config is for a different provider"),
            Self::InvalidEndpoint(e) => write!(f, "invalid endpoint `{e}`"),
            Self::MissingApiKey => f.write_str("missing API key"),
            Self::HttpStatus(h) => write!(f, "{h}"),
            Self::Decode(m) => write!(f, "failed to decode response: {m}"),
            Self::EmptyChoices => f.write_str("response contained no choices"),
        }
    }
}

/// Error enum for provider health checks.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("[AI LLM Service] health probe: {0}")]
    HttpStatus(HttpError),

    #[error("[AI LLM Service] health probe decode error: {0}")]
    Decode(String),
}

/// Trims a response body to a short single-line snippet for errors and logs.
pub fn make_snippet(body: &str) -> String {
    body.chars()
        .take(240)
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Validates that an endpoint starts with `http://` or `https://`.
pub fn validate_http_endpoint(var: &'static str, value: &str) -> Result<()> {
    let v = value.trim();
    if v.starts_with("http://") || v.starts_with("https://") {
        Ok(())
    } else {
        Err(ConfigError::InvalidFormat {
            var,
            reason: "must start with http:// or https://",
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_single_line_and_bounded() {
        let body = format!("line one\nline two\r\n{}", "x".repeat(500));
        let s = make_snippet(&body);
        assert!(!s.contains('\n'));
        assert!(s.chars().count() <= 240);
        assert!(s.starts_with("line one line two"));
    }

    #[test]
    fn endpoint_validation() {
        assert!(validate_http_endpoint("OLLAMA_URL", "http://localhost:11434").is_ok());
        assert!(validate_http_endpoint("OLLAMA_URL", " https://x ").is_ok());
        let err = validate_http_endpoint("OLLAMA_URL", "localhost:11434").unwrap_err();
        assert!(err.to_string().contains("OLLAMA_URL"));
    }

    #[test]
    fn provider_error_mentions_provider() {
        let err = ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey);
        let msg = err.to_string();
        assert!(msg.contains("openai"));
        assert!(msg.contains("missing API key"));
    }
}
