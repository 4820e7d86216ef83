//! Model capabilities for the FAQ service.
//!
//! Two roles are served by this crate:
//!
//! - **generation** → the Generative Model that turns a rendered prompt into an answer
//! - **embedding**  → the Embedding Provider that turns text into a fixed-length vector
//!
//! Both roles are backed by plain HTTP providers (Ollama, OpenAI), configured from
//! environment variables via [`config::default_config`], and shared through
//! [`service_profiles::LlmServiceProfiles`].

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, ConfigError};
pub use health_service::{HealthService, HealthStatus};
pub use service_profiles::LlmServiceProfiles;
