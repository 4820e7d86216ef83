use crate::config::llm_provider::LlmProvider;

/// Configuration for one model role (generation or embedding).
///
/// # Fields
///
/// - `provider`: HTTP backend serving the model.
/// - `model`: model identifier (e.g. `"llama3.2"`, `"all-minilm"`). For the generation
///   role this string is reported to clients as `model_version`.
/// - `endpoint`: base URL of the provider (without the API path).
/// - `api_key`: bearer token for providers that need one (OpenAI).
/// - `max_tokens`: maximum generated tokens; `None` lets the provider decide.
/// - `temperature` / `top_p`: sampling knobs forwarded as-is.
/// - `timeout_secs`: HTTP timeout; `None` means the call waits indefinitely.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::Ollama,
///     model: "llama3.2".to_string(),
///     endpoint: "http://localhost:11434".to_string(),
///     api_key: None,
///     max_tokens: Some(256),
///     temperature: Some(0.2),
///     top_p: None,
///     timeout_secs: None,
/// };
/// assert_eq!(cfg.max_tokens, Some(256));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

impl LlmModelConfig {
    /// Endpoint with surrounding whitespace and trailing slashes removed.
    pub fn base_url(&self) -> &str {
        self.endpoint.trim().trim_end_matches('/')
    }

    /// `true` when the endpoint starts with an HTTP scheme.
    pub fn has_http_endpoint(&self) -> bool {
        let e = self.endpoint.trim();
        e.starts_with("http://") || e.starts_with("https://")
    }
}
