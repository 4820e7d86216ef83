//! FAQ storage facade: CSV ingestion and vector retrieval.
//!
//! This crate provides:
//! - CSV reading and validation (`Question` / `Answer` columns)
//! - exact and incremental deduplication
//! - the [`EmbeddingsProvider`] capability and two implementations
//! - a [`VectorStore`] over a local directory or a Qdrant collection
//!
//! Application code normally talks to [`FaqStore`] only.

mod config;
mod csv_reader;
mod dedup;
mod embed;
mod embed_pool;
mod errors;
mod ingest;
mod local_store;
mod qdrant_facade;
mod record;
mod store;

use std::{path::Path, sync::Arc};

pub use config::{BackendKind, StoreConfig};
pub use csv_reader::{CsvBatch, parse_faq_csv, read_faq_csv};
pub use embed::{EmbeddingsProvider, hash_embedder::HashEmbedder, llm_embedder::LlmEmbedder};
pub use errors::{ErrorKind, FaqStoreError};
pub use record::{DedupMode, EmbeddedFaq, FaqHit, FaqRecord, IngestReport, question_key};
pub use store::{VectorStore, reset_storage};

use tracing::{debug, trace};

/// High-level facade that wires configuration, embeddings and the vector store.
pub struct FaqStore {
    cfg: StoreConfig,
    store: VectorStore,
    provider: Arc<dyn EmbeddingsProvider>,
}

impl FaqStore {
    /// Opens the configured backend.
    ///
    /// # Errors
    /// Invalid configuration, an unreadable local collection, or a Qdrant client failure.
    pub fn open(cfg: StoreConfig, provider: Arc<dyn EmbeddingsProvider>) -> Result<Self, FaqStoreError> {
        trace!(collection = %cfg.collection, "FaqStore::open");
        let store = VectorStore::open(&cfg)?;
        Ok(Self {
            cfg,
            store,
            provider,
        })
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Ingests a FAQ CSV file.
    ///
    /// # Errors
    /// Input errors (missing file, schema, malformed CSV) before any write;
    /// embedding or storage failures otherwise.
    pub async fn ingest_file(
        &self,
        path: impl AsRef<Path>,
        mode: DedupMode,
    ) -> Result<IngestReport, FaqStoreError> {
        ingest::ingest_file(&self.cfg, &self.store, self.provider.as_ref(), path, mode).await
    }

    /// Ingests rows that were already parsed.
    pub async fn ingest_batch(&self, batch: CsvBatch, mode: DedupMode) -> Result<IngestReport, FaqStoreError> {
        ingest::ingest_batch(&self.cfg, &self.store, self.provider.as_ref(), batch, mode).await
    }

    /// Embeds `text` and returns up to `top_k` nearest records.
    pub async fn search_text(&self, text: &str, top_k: usize) -> Result<Vec<FaqHit>, FaqStoreError> {
        debug!(top_k, query_len = text.len(), "FaqStore::search_text");
        if top_k == 0 {
            return Ok(Vec::new());
        }
        let vector = self.provider.embed(text).await?;
        if let Some(want) = self.cfg.embedding_dim {
            if vector.len() != want {
                return Err(FaqStoreError::VectorSizeMismatch {
                    got: vector.len(),
                    want,
                });
            }
        }
        self.store.search(vector, top_k).await
    }

    /// Stored records, at most `limit`.
    pub async fn list(&self, limit: usize) -> Result<Vec<FaqRecord>, FaqStoreError> {
        self.store.list(limit).await
    }

    pub async fn count(&self) -> Result<usize, FaqStoreError> {
        self.store.count().await
    }

    /// Deletes every record and the persisted storage. Idempotent.
    pub async fn reset(&self) -> Result<(), FaqStoreError> {
        self.store.reset().await
    }
}
