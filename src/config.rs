//! Process configuration, read once at startup.
//!
//! Model settings come from `ai_llm_service::config::default_config`; store, answering
//! and bind-address knobs are read here. Invalid numbers fail startup.

use std::path::PathBuf;

use ai_llm_service::{
    LlmModelConfig, LlmProvider,
    config::default_config::{config_embedding_from, config_generation_from},
};
use anyhow::{Context, Result, bail};
use faq_qa::{DEFAULT_LIST_LIMIT, DEFAULT_TOP_K, QaConfig};
use faq_store::{BackendKind, StoreConfig};

const DEFAULT_STORE_DIR: &str = "./chroma_store";
const DEFAULT_COLLECTION: &str = "faqs";
const DEFAULT_QDRANT_URL: &str = "http://127.0.0.1:6334";
const DEFAULT_API_ADDRESS: &str = "0.0.0.0:5002";
const DEFAULT_EMBED_CONCURRENCY: usize = 4;
const DEFAULT_HASH_DIM: usize = 384;

/// Where embeddings come from.
#[derive(Clone, Debug)]
pub enum EmbeddingSource {
    /// HTTP embedding model served through `ai-llm-service`.
    Llm(LlmModelConfig),
    /// Offline hashing embedder with the given dimension.
    Hash(usize),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api_address: String,
    pub store: StoreConfig,
    pub qa: QaConfig,
    pub generation: LlmModelConfig,
    pub embedding: EmbeddingSource,
    pub health_timeout_secs: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|name: &str| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let backend = match get("VECTOR_BACKEND") {
            Some(v) => v.parse::<BackendKind>()?,
            None => BackendKind::Local,
        };
        let embedding_dim = parse_usize(&get, "EMBEDDING_DIM")?;

        let store = StoreConfig {
            backend,
            store_dir: PathBuf::from(
                get("CHROMA_DB_DIR")
                    .or_else(|| get("FAQ_STORE_DIR"))
                    .unwrap_or_else(|| DEFAULT_STORE_DIR.into()),
            ),
            collection: get("FAQ_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            qdrant_url: get("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.into()),
            qdrant_api_key: get("QDRANT_API_KEY"),
            embedding_dim,
            embed_concurrency: parse_usize(&get, "EMBED_CONCURRENCY")?
                .unwrap_or(DEFAULT_EMBED_CONCURRENCY),
        };
        store.validate()?;

        let qa = QaConfig {
            default_top_k: parse_usize(&get, "RAG_TOP_K")?.unwrap_or(DEFAULT_TOP_K),
            list_limit: parse_usize(&get, "FAQ_LIST_LIMIT")?.unwrap_or(DEFAULT_LIST_LIMIT),
        };
        qa.validate()?;

        let generation = config_generation_from(lookup).context("generation model config")?;

        let embedding_kind = get("EMBEDDING_KIND").unwrap_or_else(|| generation.provider.to_string());
        let embedding = if embedding_kind.trim().eq_ignore_ascii_case("hash") {
            let dim = embedding_dim.unwrap_or(DEFAULT_HASH_DIM);
            if dim < 8 {
                bail!("EMBEDDING_DIM must be >= 8 for the hash embedder, got {dim}");
            }
            EmbeddingSource::Hash(dim)
        } else {
            let provider = embedding_kind
                .parse::<LlmProvider>()
                .context("EMBEDDING_KIND")?;
            EmbeddingSource::Llm(config_embedding_from(provider, lookup).context("embedding model config")?)
        };

        Ok(Self {
            api_address: get("API_ADDRESS").unwrap_or_else(|| DEFAULT_API_ADDRESS.into()),
            store,
            qa,
            health_timeout_secs: generation.timeout_secs,
            generation,
            embedding,
        })
    }
}

fn parse_usize(get: &dyn Fn(&str) -> Option<String>, name: &str) -> Result<Option<usize>> {
    get(name)
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .with_context(|| format!("{name} must be a non-negative integer, got {v:?}"))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(&move |k: &str| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.api_address, "0.0.0.0:5002");
        assert_eq!(cfg.store.backend, BackendKind::Local);
        assert_eq!(cfg.store.store_dir, PathBuf::from("./chroma_store"));
        assert_eq!(cfg.store.collection, "faqs");
        assert_eq!(cfg.qa.default_top_k, 3);
        assert_eq!(cfg.qa.list_limit, 10_000);
        assert!(matches!(cfg.embedding, EmbeddingSource::Llm(ref c) if c.provider == LlmProvider::Ollama));
    }

    #[test]
    fn store_dir_prefers_chroma_db_dir() {
        let cfg = config(&[("CHROMA_DB_DIR", "/data/faq_db")]).unwrap();
        assert_eq!(cfg.store.store_dir, PathBuf::from("/data/faq_db"));

        let cfg = config(&[("FAQ_STORE_DIR", "/data/alias")]).unwrap();
        assert_eq!(cfg.store.store_dir, PathBuf::from("/data/alias"));

        let cfg = config(&[("CHROMA_DB_DIR", "/data/primary"), ("FAQ_STORE_DIR", "/data/alias")]).unwrap();
        assert_eq!(cfg.store.store_dir, PathBuf::from("/data/primary"));
    }

    #[test]
    fn hash_embedder_uses_embedding_dim() {
        let cfg = config(&[("EMBEDDING_KIND", "hash"), ("EMBEDDING_DIM", "64")]).unwrap();
        assert!(matches!(cfg.embedding, EmbeddingSource::Hash(64)));
        assert_eq!(cfg.store.embedding_dim, Some(64));

        assert!(config(&[("EMBEDDING_KIND", "hash"), ("EMBEDDING_DIM", "4")]).is_err());
    }

    #[test]
    fn invalid_numbers_are_errors() {
        let err = config(&[("RAG_TOP_K", "three")]).unwrap_err();
        assert!(err.to_string().contains("RAG_TOP_K"));
        assert!(config(&[("RAG_TOP_K", "0")]).is_err());
        assert!(config(&[("EMBED_CONCURRENCY", "-1")]).is_err());
    }

    #[test]
    fn unknown_backend_or_provider_is_rejected() {
        assert!(config(&[("VECTOR_BACKEND", "chroma")]).is_err());
        assert!(config(&[("EMBEDDING_KIND", "bert")]).is_err());
    }

    #[test]
    fn qdrant_backend_reads_url() {
        let cfg = config(&[("VECTOR_BACKEND", "qdrant"), ("QDRANT_URL", "http://q:6334")]).unwrap();
        assert_eq!(cfg.store.backend, BackendKind::Qdrant);
        assert_eq!(cfg.store.qdrant_url, "http://q:6334");
    }
}
