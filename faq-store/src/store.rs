//! Vector store dispatch over the configured backend.

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    config::{BackendKind, StoreConfig},
    errors::FaqStoreError,
    local_store::{LocalStore, remove_store_dir},
    qdrant_facade::QdrantFacade,
    record::{EmbeddedFaq, FaqHit, FaqRecord},
};

/// Persists (vector, text, metadata) triples of one collection.
pub enum VectorStore {
    Local(RwLock<LocalStore>),
    Qdrant(QdrantFacade),
}

impl VectorStore {
    /// Opens the backend selected by `cfg.backend`.
    pub fn open(cfg: &StoreConfig) -> Result<Self, FaqStoreError> {
        cfg.validate()?;
        let store = match cfg.backend {
            BackendKind::Local => Self::Local(RwLock::new(LocalStore::open(
                &cfg.store_dir,
                &cfg.collection,
            )?)),
            BackendKind::Qdrant => Self::Qdrant(QdrantFacade::new(cfg)?),
        };
        info!(backend = store.backend_name(), collection = %cfg.collection, "vector store opened");
        Ok(store)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Qdrant(_) => "qdrant",
        }
    }

    pub async fn add(&self, items: &[EmbeddedFaq]) -> Result<usize, FaqStoreError> {
        match self {
            Self::Local(s) => s.write().await.add(items),
            Self::Qdrant(q) => q.add(items).await,
        }
    }

    /// Up to `k` nearest records, nearest first.
    pub async fn search(&self, vector: Vec<f32>, k: usize) -> Result<Vec<FaqHit>, FaqStoreError> {
        match self {
            Self::Local(s) => s.read().await.search(&vector, k),
            Self::Qdrant(q) => q.search(vector, k).await,
        }
    }

    pub async fn find_by_question_key(&self, key: &str) -> Result<Option<FaqRecord>, FaqStoreError> {
        match self {
            Self::Local(s) => Ok(s.read().await.find_by_question_key(key)),
            Self::Qdrant(q) => q.find_by_question_key(key).await,
        }
    }

    pub async fn list(&self, limit: usize) -> Result<Vec<FaqRecord>, FaqStoreError> {
        match self {
            Self::Local(s) => Ok(s.read().await.list(limit)),
            Self::Qdrant(q) => q.list(limit).await,
        }
    }

    pub async fn count(&self) -> Result<usize, FaqStoreError> {
        match self {
            Self::Local(s) => Ok(s.read().await.count()),
            Self::Qdrant(q) => q.count().await,
        }
    }

    pub async fn reset(&self) -> Result<(), FaqStoreError> {
        match self {
            Self::Local(s) => s.write().await.reset(),
            Self::Qdrant(q) => q.reset().await,
        }
    }
}

/// Resets persisted state without loading it first.
///
/// For the local backend this only removes the store directory, so a corrupt
/// collection file can still be cleared.
pub async fn reset_storage(cfg: &StoreConfig) -> Result<(), FaqStoreError> {
    match cfg.backend {
        BackendKind::Local => {
            debug!(dir = %cfg.store_dir.display(), "resetting local store without opening it");
            remove_store_dir(&cfg.store_dir)
        }
        BackendKind::Qdrant => QdrantFacade::new(cfg)?.reset().await,
    }
}
