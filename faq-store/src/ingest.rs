//! Ingestion pipeline: read CSV → validate → dedup → embed → single write.
//!
//! Nothing reaches the store until the whole file is parsed and every accepted row
//! is embedded, so schema, CSV and embedding failures leave the collection unchanged.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    config::StoreConfig,
    csv_reader::{CsvBatch, read_faq_csv},
    dedup::{QuestionKeys, dedup_exact},
    embed::EmbeddingsProvider,
    embed_pool::embed_all,
    errors::FaqStoreError,
    record::{DedupMode, FaqRecord, IngestReport},
    store::VectorStore,
};

/// Ingests a FAQ CSV from disk.
pub async fn ingest_file(
    cfg: &StoreConfig,
    store: &VectorStore,
    provider: &dyn EmbeddingsProvider,
    path: impl AsRef<Path>,
    mode: DedupMode,
) -> Result<IngestReport, FaqStoreError> {
    info!(path = %path.as_ref().display(), ?mode, "ingesting FAQ CSV");
    let batch = read_faq_csv(path)?;
    ingest_batch(cfg, store, provider, batch, mode).await
}

/// Ingests an already parsed batch.
pub async fn ingest_batch(
    cfg: &StoreConfig,
    store: &VectorStore,
    provider: &dyn EmbeddingsProvider,
    batch: CsvBatch,
    mode: DedupMode,
) -> Result<IngestReport, FaqStoreError> {
    let mut report = IngestReport {
        rows_read: batch.rows_read,
        skipped_empty: batch.skipped_empty,
        ..Default::default()
    };

    let (records, dropped) = dedup_exact(batch.records);
    report.skipped_duplicates = dropped;

    let records = match mode {
        DedupMode::Batch => records,
        DedupMode::Incremental => {
            let (kept, known) = skip_known_questions(store, records).await?;
            report.skipped_duplicates += known;
            kept
        }
    };

    if records.is_empty() {
        info!(?report, "nothing to write");
        return Ok(report);
    }

    let embedded = embed_all(records, provider, cfg.embedding_dim, cfg.embed_concurrency).await?;
    report.written = store.add(&embedded).await?;

    info!(
        rows_read = report.rows_read,
        written = report.written,
        skipped_duplicates = report.skipped_duplicates,
        skipped_empty = report.skipped_empty,
        "ingestion finished"
    );
    Ok(report)
}

/// Drops records whose normalized question is already stored or already accepted
/// earlier in this batch.
async fn skip_known_questions(
    store: &VectorStore,
    records: Vec<FaqRecord>,
) -> Result<(Vec<FaqRecord>, usize), FaqStoreError> {
    let mut keys = QuestionKeys::default();
    let mut kept = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for r in records {
        let key = r.question_key();
        if !keys.insert(key.clone()) {
            skipped += 1;
            continue;
        }
        if let Some(existing) = store.find_by_question_key(&key).await? {
            debug!(question = %r.question, existing_id = %existing.id, "question already stored");
            skipped += 1;
            continue;
        }
        kept.push(r);
    }
    Ok((kept, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csv_reader::parse_faq_csv;
    use crate::embed::hash_embedder::HashEmbedder;
    use std::future::Future;
    use std::pin::Pin;

    struct FailingEmbedder;

    impl EmbeddingsProvider for FailingEmbedder {
        fn embed<'a>(
            &'a self,
            _text: &'a str,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<f32>, FaqStoreError>> + Send + 'a>> {
            Box::pin(async { Err(FaqStoreError::Config("embedding backend down".into())) })
        }
    }

    fn setup() -> (tempfile::TempDir, StoreConfig, VectorStore) {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = StoreConfig::local(tmp.path().join("store"), "faqs");
        let store = VectorStore::open(&cfg).unwrap();
        (tmp, cfg, store)
    }

    #[tokio::test]
    async fn batch_mode_dedups_exact_pairs() {
        let (_tmp, cfg, store) = setup();
        let batch = parse_faq_csv(b"Question,Answer\nWhat is X?,X is Y.\nWhat is X?,X is Y.\n").unwrap();
        let report = ingest_batch(&cfg, &store, &HashEmbedder::new(32), batch, DedupMode::Batch)
            .await
            .unwrap();

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.written, 1);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn incremental_skips_stored_questions() {
        let (_tmp, cfg, store) = setup();
        let emb = HashEmbedder::new(32);
        let first = parse_faq_csv(b"Question,Answer\nWhat is X?,X is Y.\n").unwrap();
        ingest_batch(&cfg, &store, &emb, first, DedupMode::Incremental).await.unwrap();

        let again = parse_faq_csv(
            b"Question,Answer\n  what is x?  ,Another answer.\nWhat is Z?,Z.\nWHAT IS Z?,Z again.\n",
        )
        .unwrap();
        let report = ingest_batch(&cfg, &store, &emb, again, DedupMode::Incremental)
            .await
            .unwrap();

        assert_eq!(report.written, 1);
        assert_eq!(report.skipped_duplicates, 2);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn same_pair_twice_incremental_stores_one() {
        let (_tmp, cfg, store) = setup();
        let emb = HashEmbedder::new(32);
        for _ in 0..2 {
            let b = parse_faq_csv(b"Question,Answer\nWhat is X?,X is Y.\n").unwrap();
            ingest_batch(&cfg, &store, &emb, b, DedupMode::Incremental).await.unwrap();
        }
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn embedding_failure_writes_nothing() {
        let (_tmp, cfg, store) = setup();
        let batch = parse_faq_csv(b"Question,Answer\na,b\nc,d\n").unwrap();
        let err = ingest_batch(&cfg, &store, &FailingEmbedder, batch, DedupMode::Batch)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Processing);
        assert_eq!(store.count().await.unwrap(), 0);
        assert!(!cfg.store_dir.exists());
    }

    #[tokio::test]
    async fn schema_error_leaves_collection_unchanged() {
        let (tmp, cfg, store) = setup();
        let emb = HashEmbedder::new(32);
        let ok = parse_faq_csv(b"Question,Answer\na,b\n").unwrap();
        ingest_batch(&cfg, &store, &emb, ok, DedupMode::Batch).await.unwrap();

        let bad = tmp.path().join("bad.csv");
        std::fs::write(&bad, "Question,Reply\nq,r\n").unwrap();
        let err = ingest_file(&cfg, &store, &emb, &bad, DedupMode::Batch)
            .await
            .unwrap_err();
        assert!(matches!(err, FaqStoreError::Schema { .. }));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn empty_rows_only_writes_nothing() {
        let (_tmp, cfg, store) = setup();
        let batch = parse_faq_csv(b"Question,Answer\n,\n").unwrap();
        let report = ingest_batch(&cfg, &store, &HashEmbedder::new(8), batch, DedupMode::Batch)
            .await
            .unwrap();
        assert_eq!(report.skipped_empty, 1);
        assert_eq!(report.written, 0);
    }
}
