//! Retrieval-augmented answering over one [`FaqStore`].

use std::{path::Path, sync::Arc};

use chrono::{SecondsFormat, Utc};
use faq_store::{DedupMode, FaqRecord, FaqStore, IngestReport};
use tracing::{debug, info, instrument};

use crate::{
    api_types::{AnswerMetadata, AnswerResult},
    cfg::QaConfig,
    error::QaError,
    generator::AnswerGenerator,
    prompt::{format_context, render_prompt},
};

pub struct FaqPipeline {
    store: FaqStore,
    generator: Arc<dyn AnswerGenerator>,
    cfg: QaConfig,
}

impl FaqPipeline {
    pub fn new(store: FaqStore, generator: Arc<dyn AnswerGenerator>, cfg: QaConfig) -> Self {
        Self {
            store,
            generator,
            cfg,
        }
    }

    pub fn store(&self) -> &FaqStore {
        &self.store
    }

    pub fn model_version(&self) -> &str {
        self.generator.model_version()
    }

    /// Retrieves up to `top_k` FAQs and asks the model with them as context.
    ///
    /// An empty collection still reaches the model, with an empty context.
    /// Any failure aborts the request; there are no retries.
    ///
    /// # Errors
    /// `EmptyQuestion` / `InvalidTopK` for bad input; store or generation errors otherwise.
    #[instrument(skip_all, fields(top_k = tracing::field::Empty))]
    pub async fn answer(&self, question: &str, top_k: Option<usize>) -> Result<AnswerResult, QaError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(QaError::EmptyQuestion);
        }
        let top_k = top_k.unwrap_or(self.cfg.default_top_k);
        if top_k == 0 {
            return Err(QaError::InvalidTopK);
        }
        tracing::Span::current().record("top_k", top_k);

        let top_faqs = self.store.search_text(question, top_k).await?;
        debug!(retrieved = top_faqs.len(), "context retrieved");

        let prompt = render_prompt(&format_context(&top_faqs), question);
        let model_answer = self.generator.generate(&prompt).await?;

        info!(
            retrieved = top_faqs.len(),
            answer_len = model_answer.len(),
            "question answered"
        );
        Ok(AnswerResult {
            top_faqs,
            model_answer,
            metadata: AnswerMetadata {
                model_version: self.generator.model_version().to_string(),
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            },
        })
    }

    pub async fn ingest_file(&self, path: impl AsRef<Path>, mode: DedupMode) -> Result<IngestReport, QaError> {
        Ok(self.store.ingest_file(path, mode).await?)
    }

    /// Every stored record up to the configured cap.
    pub async fn list(&self) -> Result<Vec<FaqRecord>, QaError> {
        Ok(self.store.list(self.cfg.list_limit).await?)
    }

    pub async fn count(&self) -> Result<usize, QaError> {
        Ok(self.store.count().await?)
    }
}
