//! Deduplication helpers for ingestion batches.

use std::collections::HashSet;

use crate::record::FaqRecord;

/// Drops repeated (question, answer) pairs; the first occurrence wins and order is kept.
///
/// Returns the kept records and how many were dropped.
pub fn dedup_exact(records: Vec<FaqRecord>) -> (Vec<FaqRecord>, usize) {
    let before = records.len();
    let mut seen: HashSet<(String, String)> = HashSet::with_capacity(before);
    let kept: Vec<FaqRecord> = records
        .into_iter()
        .filter(|r| seen.insert((r.question.clone(), r.answer.clone())))
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Tracks normalized question keys already accepted within one batch.
#[derive(Debug, Default)]
pub struct QuestionKeys {
    seen: HashSet<String>,
}

impl QuestionKeys {
    /// `true` when `key` was not seen before (and records it).
    pub fn insert(&mut self, key: String) -> bool {
        self.seen.insert(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_wins() {
        let (kept, dropped) = dedup_exact(vec![
            FaqRecord::new("What is X?", "X is Y."),
            FaqRecord::new("What is Z?", "Z."),
            FaqRecord::new("What is X?", "X is Y."),
        ]);
        assert_eq!(dropped, 1);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].question, "What is X?");
        assert_eq!(kept[1].question, "What is Z?");
    }

    #[test]
    fn same_question_different_answer_is_kept() {
        let (kept, dropped) = dedup_exact(vec![
            FaqRecord::new("What is X?", "X is Y."),
            FaqRecord::new("What is X?", "X is Z."),
        ]);
        assert_eq!(dropped, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn question_keys_track_first_insert() {
        let mut keys = QuestionKeys::default();
        assert!(keys.insert("what is x?".into()));
        assert!(!keys.insert("what is x?".into()));
    }
}
