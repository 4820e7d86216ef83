//! Lazily built, resettable pipeline shared by every request.
//!
//! - [`PipelineHandle::get`] builds on first use and hands out a read guard.
//! - [`PipelineHandle::ingest_file`] serializes writers and holds the read guard meanwhile.
//! - [`PipelineHandle::reset`] takes the write guard, so it waits for in-flight requests
//!   and no request sees a half-reset store. The cached pipeline is dropped either way.

use std::{path::Path, sync::Arc};

use faq_store::{DedupMode, EmbeddingsProvider, FaqStore, IngestReport, StoreConfig, reset_storage};
use tokio::sync::{Mutex, RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::{cfg::QaConfig, error::QaError, generator::AnswerGenerator, pipeline::FaqPipeline};

/// Everything needed to (re)build a [`FaqPipeline`].
#[derive(Clone)]
pub struct PipelineBuilder {
    pub store: StoreConfig,
    pub qa: QaConfig,
    pub embedder: Arc<dyn EmbeddingsProvider>,
    pub generator: Arc<dyn AnswerGenerator>,
}

impl PipelineBuilder {
    pub fn new(
        store: StoreConfig,
        qa: QaConfig,
        embedder: Arc<dyn EmbeddingsProvider>,
        generator: Arc<dyn AnswerGenerator>,
    ) -> Self {
        Self {
            store,
            qa,
            embedder,
            generator,
        }
    }

    /// Opens the store and wires the capabilities.
    pub fn build(&self) -> Result<FaqPipeline, QaError> {
        self.qa.validate()?;
        let store = FaqStore::open(self.store.clone(), self.embedder.clone())?;
        info!(
            backend = store.backend_name(),
            collection = %self.store.collection,
            model = self.generator.model_version(),
            "FAQ pipeline built"
        );
        Ok(FaqPipeline::new(store, self.generator.clone(), self.qa.clone()))
    }
}

pub struct PipelineHandle {
    builder: PipelineBuilder,
    slot: RwLock<Option<FaqPipeline>>,
    writer: Mutex<()>,
}

impl PipelineHandle {
    pub fn new(builder: PipelineBuilder) -> Self {
        Self {
            builder,
            slot: RwLock::new(None),
            writer: Mutex::new(()),
        }
    }

    /// Read access to the pipeline, building it first if needed.
    ///
    /// Hold the guard for the whole operation; [`reset`](Self::reset) waits for it.
    pub async fn get(&self) -> Result<RwLockReadGuard<'_, FaqPipeline>, QaError> {
        let guard = self.slot.read().await;
        if let Ok(p) = RwLockReadGuard::try_map(guard, Option::as_ref) {
            return Ok(p);
        }

        let mut w = self.slot.write().await;
        if w.is_none() {
            debug!("pipeline not cached; building");
            *w = Some(self.builder.build()?);
        }
        RwLockReadGuard::try_map(w.downgrade(), Option::as_ref)
            .map_err(|_| QaError::Build("pipeline vanished while downgrading".into()))
    }

    pub async fn is_built(&self) -> bool {
        self.slot.read().await.is_some()
    }

    /// Ingests one file; concurrent ingestions run one after another.
    pub async fn ingest_file(&self, path: impl AsRef<Path>, mode: DedupMode) -> Result<IngestReport, QaError> {
        let _writer = self.writer.lock().await;
        let pipeline = self.get().await?;
        pipeline.ingest_file(path, mode).await
    }

    /// Deletes every record and the persisted storage, then drops the cached pipeline.
    ///
    /// A missing collection or directory is success. Other deletion failures are
    /// returned after logging; the cache is invalidated regardless.
    pub async fn reset(&self) -> Result<(), QaError> {
        let mut slot = self.slot.write().await;

        let res = match slot.as_ref() {
            Some(p) => p.store().reset().await,
            None => reset_storage(&self.builder.store).await,
        };
        *slot = None;

        match res {
            Ok(()) => {
                info!(collection = %self.builder.store.collection, "collection reset");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "collection reset failed; cached pipeline dropped");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{EchoGenerator, store_config};
    use faq_store::HashEmbedder;

    fn handle(root: &Path) -> PipelineHandle {
        PipelineHandle::new(PipelineBuilder::new(
            store_config(root),
            QaConfig::default(),
            Arc::new(HashEmbedder::new(64)),
            Arc::new(EchoGenerator::default()),
        ))
    }

    fn write_csv(root: &Path, body: &str) -> std::path::PathBuf {
        let p = root.join("faq.csv");
        std::fs::write(&p, body).unwrap();
        p
    }

    #[tokio::test]
    async fn builds_lazily_once() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handle(tmp.path());
        assert!(!h.is_built().await);
        {
            let p = h.get().await.unwrap();
            assert_eq!(p.count().await.unwrap(), 0);
        }
        assert!(h.is_built().await);
    }

    #[tokio::test]
    async fn reset_then_list_is_empty_and_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handle(tmp.path());
        let csv = write_csv(tmp.path(), "Question,Answer\nWhat is X?,X is Y.\n");
        h.ingest_file(&csv, DedupMode::Batch).await.unwrap();
        assert_eq!(h.get().await.unwrap().list().await.unwrap().len(), 1);

        h.reset().await.unwrap();
        assert!(!h.is_built().await);
        assert!(!tmp.path().join("chroma_store").exists());
        assert!(h.get().await.unwrap().list().await.unwrap().is_empty());

        h.reset().await.unwrap();
        h.reset().await.unwrap();
    }

    #[tokio::test]
    async fn reset_without_built_pipeline_clears_disk() {
        let tmp = tempfile::tempdir().unwrap();
        let csv = write_csv(tmp.path(), "Question,Answer\nq,a\n");
        handle(tmp.path()).ingest_file(&csv, DedupMode::Batch).await.unwrap();

        let fresh = handle(tmp.path());
        fresh.reset().await.unwrap();
        assert_eq!(fresh.get().await.unwrap().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_ingests_are_serialized() {
        let tmp = tempfile::tempdir().unwrap();
        let h = Arc::new(handle(tmp.path()));
        let a = write_csv(tmp.path(), "Question,Answer\nWhat is X?,X is Y.\n");

        let (r1, r2) = tokio::join!(
            h.ingest_file(&a, DedupMode::Incremental),
            h.ingest_file(&a, DedupMode::Incremental)
        );
        let written = r1.unwrap().written + r2.unwrap().written;
        assert_eq!(written, 1);
        assert_eq!(h.get().await.unwrap().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn invalid_qa_config_fails_build() {
        let tmp = tempfile::tempdir().unwrap();
        let mut builder = handle(tmp.path()).builder.clone();
        builder.qa.default_top_k = 0;
        let h = PipelineHandle::new(builder);
        assert!(h.get().await.is_err());
        assert!(!h.is_built().await);
    }

    #[tokio::test]
    async fn failed_reset_still_drops_cached_pipeline() {
        let tmp = tempfile::tempdir().unwrap();
        let h = handle(tmp.path());
        h.get().await.unwrap();
        assert!(h.is_built().await);

        // a regular file where the store directory should be cannot be removed as a dir
        std::fs::write(tmp.path().join("chroma_store"), b"not a directory").unwrap();

        let err = h.reset().await.unwrap_err();
        assert_eq!(err.kind(), faq_store::ErrorKind::Processing);
        assert!(!h.is_built().await);
    }
}
