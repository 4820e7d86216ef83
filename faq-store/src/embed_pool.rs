//! Embedding executor with bounded concurrency and dimension checks.

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::{
    embed::EmbeddingsProvider,
    errors::FaqStoreError,
    record::{EmbeddedFaq, FaqRecord},
};

/// Embeds every record's text, at most `concurrency` calls in flight.
///
/// Output order matches input order. The first failure aborts the whole batch.
///
/// # Errors
/// Provider errors, or [`FaqStoreError::VectorSizeMismatch`] when `expected_dim` is set
/// and a vector has another length, or when vectors in the batch disagree in length.
pub async fn embed_all(
    records: Vec<FaqRecord>,
    provider: &dyn EmbeddingsProvider,
    expected_dim: Option<usize>,
    concurrency: usize,
) -> Result<Vec<EmbeddedFaq>, FaqStoreError> {
    debug!(total = records.len(), concurrency, "embedding records");

    let out: Vec<EmbeddedFaq> = stream::iter(records)
        .map(|record| async move {
            let text = record.embed_text();
            let embedding = provider.embed(&text).await?;
            Ok::<_, FaqStoreError>(EmbeddedFaq {
                record,
                text,
                embedding,
            })
        })
        .buffered(concurrency.max(1))
        .try_collect()
        .await?;

    let want = expected_dim.or_else(|| out.first().map(|e| e.embedding.len()));
    if let Some(want) = want {
        if let Some(bad) = out.iter().find(|e| e.embedding.len() != want) {
            return Err(FaqStoreError::VectorSizeMismatch {
                got: bad.embedding.len(),
                want,
            });
        }
    }

    debug!(total = out.len(), "embeddings filled");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::hash_embedder::HashEmbedder;

    #[tokio::test]
    async fn keeps_input_order() {
        let records = vec![
            FaqRecord::new("first", "one"),
            FaqRecord::new("second", "two"),
            FaqRecord::new("third", "three"),
        ];
        let out = embed_all(records, &HashEmbedder::new(16), Some(16), 2)
            .await
            .unwrap();
        let questions: Vec<_> = out.iter().map(|e| e.record.question.as_str()).collect();
        assert_eq!(questions, ["first", "second", "third"]);
        assert_eq!(out[0].text, "first one");
    }

    #[tokio::test]
    async fn enforces_expected_dim() {
        let err = embed_all(vec![FaqRecord::new("q", "a")], &HashEmbedder::new(16), Some(32), 1)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            FaqStoreError::VectorSizeMismatch { got: 16, want: 32 }
        ));
    }
}
