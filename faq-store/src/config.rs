//! Store configuration.

use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::FaqStoreError;

/// Which vector store backs the collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// JSONL file under `store_dir`, searched in memory.
    #[default]
    Local,
    /// Remote Qdrant collection.
    Qdrant,
}

impl FromStr for BackendKind {
    type Err = FaqStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(FaqStoreError::Config(format!(
                "unsupported vector backend: {other} (expected local|qdrant)"
            ))),
        }
    }
}

/// Configuration for ingestion and retrieval.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub backend: BackendKind,
    /// Persisted-storage directory of the local backend; removed entirely on reset.
    pub store_dir: PathBuf,
    /// Target collection name.
    pub collection: String,
    /// Qdrant gRPC endpoint, e.g. `http://127.0.0.1:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// When set, every embedding must have exactly this length.
    pub embedding_dim: Option<usize>,
    /// Maximum number of concurrent embedding calls during ingestion.
    pub embed_concurrency: usize,
}

impl StoreConfig {
    /// Local backend under `store_dir` with defaults for everything else.
    pub fn local(store_dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            backend: BackendKind::Local,
            store_dir: store_dir.into(),
            collection: collection.into(),
            qdrant_url: "http://127.0.0.1:6334".into(),
            qdrant_api_key: None,
            embedding_dim: None,
            embed_concurrency: 4,
        }
    }

    pub fn validate(&self) -> Result<(), FaqStoreError> {
        if self.collection.trim().is_empty() {
            return Err(FaqStoreError::Config("collection is empty".into()));
        }
        if self
            .collection
            .chars()
            .any(|c| c == '/' || c == '\\' || c == '.')
        {
            return Err(FaqStoreError::Config(format!(
                "collection name must not contain path characters: {}",
                self.collection
            )));
        }
        if self.embed_concurrency == 0 {
            return Err(FaqStoreError::Config("embed_concurrency must be > 0".into()));
        }
        if self.embedding_dim == Some(0) {
            return Err(FaqStoreError::Config("embedding_dim must be > 0".into()));
        }
        match self.backend {
            BackendKind::Local if self.store_dir.as_os_str().is_empty() => {
                Err(FaqStoreError::Config("store_dir is empty".into()))
            }
            BackendKind::Qdrant if self.qdrant_url.trim().is_empty() => {
                Err(FaqStoreError::Config("qdrant_url is empty".into()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_kind() {
        assert_eq!("LOCAL".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!(" qdrant ".parse::<BackendKind>().unwrap(), BackendKind::Qdrant);
        assert!("chroma".parse::<BackendKind>().is_err());
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(StoreConfig::local("./store", "faqs").validate().is_ok());
        assert!(StoreConfig::local("./store", " ").validate().is_err());
        assert!(StoreConfig::local("./store", "../x").validate().is_err());

        let mut cfg = StoreConfig::local("./store", "faqs");
        cfg.embed_concurrency = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = StoreConfig::local("./store", "faqs");
        cfg.backend = BackendKind::Qdrant;
        cfg.qdrant_url = String::new();
        assert!(cfg.validate().is_err());
    }
}
