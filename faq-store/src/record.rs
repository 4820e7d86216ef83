//! Core data models used by the library.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use services::uuid::faq_id;

use crate::errors::FaqStoreError;

/// A stored question/answer pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqRecord {
    pub id: String,
    pub question: String,
    pub answer: String,
}

impl FaqRecord {
    /// Builds a record with its deterministic id.
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        let question = question.into();
        let answer = answer.into();
        Self {
            id: faq_id(&question, &answer),
            question,
            answer,
        }
    }

    /// Normalized question used by incremental dedup.
    pub fn question_key(&self) -> String {
        question_key(&self.question)
    }

    /// Text that gets embedded: question and answer joined by one space.
    pub fn embed_text(&self) -> String {
        format!("{} {}", self.question, self.answer)
    }
}

/// A record together with its vector, ready to be written.
#[derive(Clone, Debug)]
pub struct EmbeddedFaq {
    pub record: FaqRecord,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// A retrieval hit, nearest first.
#[derive(Clone, Debug, Serialize)]
pub struct FaqHit {
    #[serde(flatten)]
    pub record: FaqRecord,
    pub score: f32,
}

/// How ingestion treats rows that may already be stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupMode {
    /// Exact (question, answer) dedup inside the incoming file only.
    #[default]
    Batch,
    /// Batch dedup plus skipping questions that are already stored.
    Incremental,
}

impl FromStr for DedupMode {
    type Err = FaqStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "batch" => Ok(Self::Batch),
            "incremental" => Ok(Self::Incremental),
            other => Err(FaqStoreError::InvalidInput(format!(
                "unknown dedup mode: {other} (expected batch|incremental)"
            ))),
        }
    }
}

/// Outcome of one ingestion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Data rows in the file (header excluded).
    pub rows_read: usize,
    /// Records handed to the store.
    pub written: usize,
    pub skipped_duplicates: usize,
    /// Rows with an empty question or answer.
    pub skipped_empty: usize,
}

/// Case-folded, whitespace-trimmed question.
pub fn question_key(question: &str) -> String {
    question.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_key_folds_case_and_trims() {
        assert_eq!(question_key("  What IS X?\t"), "what is x?");
        assert_eq!(
            FaqRecord::new(" What is X?", "a").question_key(),
            question_key("what is x?")
        );
    }

    #[test]
    fn embed_text_joins_with_space() {
        let r = FaqRecord::new("What is X?", "X is Y.");
        assert_eq!(r.embed_text(), "What is X? X is Y.");
    }

    #[test]
    fn dedup_mode_parses_and_deserializes() {
        assert_eq!("Incremental".parse::<DedupMode>().unwrap(), DedupMode::Incremental);
        assert!("fuzzy".parse::<DedupMode>().is_err());
        let m: DedupMode = serde_json::from_str("\"batch\"").unwrap();
        assert_eq!(m, DedupMode::Batch);
    }

    #[test]
    fn hit_serializes_flat() {
        let hit = FaqHit {
            record: FaqRecord::new("q", "a"),
            score: 0.5,
        };
        let v = serde_json::to_value(&hit).unwrap();
        assert_eq!(v["question"], "q");
        assert_eq!(v["answer"], "a");
        assert_eq!(v["score"], 0.5);
        assert!(v["id"].is_string());
    }
}
