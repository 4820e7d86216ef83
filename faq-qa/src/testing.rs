//! In-test fakes for the generative model.

use std::path::Path;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::{future::Future, pin::Pin};

use ai_llm_service::AiLlmError;
use faq_store::{FaqStore, HashEmbedder, StoreConfig};

use crate::{error::QaError, generator::AnswerGenerator};

/// Answers with a fixed sentence and remembers the last prompt.
#[derive(Default)]
pub struct EchoGenerator {
    calls: AtomicUsize,
    last: Mutex<String>,
}

impl EchoGenerator {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> String {
        self.last.lock().unwrap().clone()
    }
}

impl AnswerGenerator for EchoGenerator {
    fn generate<'a>(
        &'a self,
        prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = prompt.to_string();
            Ok("Here is the answer.".to_string())
        })
    }

    fn model_version(&self) -> &str {
        "echo-1"
    }
}

pub struct FailingGenerator;

impl AnswerGenerator for FailingGenerator {
    fn generate<'a>(
        &'a self,
        _prompt: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<String, QaError>> + Send + 'a>> {
        Box::pin(async { Err(AiLlmError::MissingProfile("generation").into()) })
    }

    fn model_version(&self) -> &str {
        "broken"
    }
}

pub fn store_config(root: &Path) -> StoreConfig {
    StoreConfig::local(root.join("chroma_store"), "faqs")
}

pub fn local_store(root: &Path) -> FaqStore {
    FaqStore::open(store_config(root), Arc::new(HashEmbedder::new(64))).unwrap()
}
