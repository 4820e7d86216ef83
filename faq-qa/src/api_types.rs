//! Result types handed to the HTTP layer and the console.

use faq_store::FaqHit;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct AnswerMetadata {
    pub model_version: String,
    /// RFC3339 UTC.
    pub timestamp: String,
}

/// Retrieved FAQs (nearest first) plus the model's answer.
#[derive(Clone, Debug, Serialize)]
pub struct AnswerResult {
    pub top_faqs: Vec<FaqHit>,
    pub model_answer: String,
    pub metadata: AnswerMetadata,
}
