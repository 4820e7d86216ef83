use faq_qa::AnswerResult;
use faq_store::FaqHit;
use serde::{Deserialize, Serialize};

/// Request payload for /ask_question.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Natural language question.
    #[serde(default)]
    pub question: Option<String>,
    /// Number of FAQs to retrieve; server default when omitted.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// Response payload for /ask_question.
#[derive(Debug, Serialize)]
pub struct AskResponse {
    /// Retrieved FAQs, nearest first.
    pub top_faqs: Vec<FaqHit>,
    pub model_answer: String,
    pub model_version: String,
    pub query_timestamp: String,
}

impl From<AnswerResult> for AskResponse {
    fn from(r: AnswerResult) -> Self {
        Self {
            top_faqs: r.top_faqs,
            model_answer: r.model_answer,
            model_version: r.metadata.model_version,
            query_timestamp: r.metadata.timestamp,
        }
    }
}
