//! FAQ CSV reader.
//!
//! The header row must carry `Question` and `Answer` (exact names); other columns are
//! ignored. The whole file is parsed before anything is returned, so a schema or
//! format error never leaves a half-ingested collection behind.

use std::path::Path;

use tracing::{debug, warn};

use crate::{errors::FaqStoreError, record::FaqRecord};

pub const QUESTION_COLUMN: &str = "Question";
pub const ANSWER_COLUMN: &str = "Answer";

/// Rows accepted from one CSV file, in file order.
#[derive(Debug, Default)]
pub struct CsvBatch {
    pub records: Vec<FaqRecord>,
    /// Data rows in the file.
    pub rows_read: usize,
    /// Rows dropped because the question or the answer was empty.
    pub skipped_empty: usize,
}

/// Reads and validates a FAQ CSV from disk.
///
/// # Errors
/// - [`FaqStoreError::FileNotFound`] if `path` does not exist
/// - [`FaqStoreError::Schema`] if a required column is missing
/// - [`FaqStoreError::Csv`] on malformed content
pub fn read_faq_csv(path: impl AsRef<Path>) -> Result<CsvBatch, FaqStoreError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(FaqStoreError::FileNotFound(path.to_path_buf()));
    }
    debug!(path = %path.display(), "reading FAQ CSV");

    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    parse(reader)
}

/// Same as [`read_faq_csv`] over in-memory bytes.
pub fn parse_faq_csv(data: &[u8]) -> Result<CsvBatch, FaqStoreError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    parse(reader)
}

fn parse<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<CsvBatch, FaqStoreError> {
    let headers = reader.headers()?.clone();
    let q_idx = headers.iter().position(|h| h == QUESTION_COLUMN);
    let a_idx = headers.iter().position(|h| h == ANSWER_COLUMN);

    let (q_idx, a_idx) = match (q_idx, a_idx) {
        (Some(q), Some(a)) => (q, a),
        (q, a) => {
            let mut missing = Vec::new();
            if q.is_none() {
                missing.push(QUESTION_COLUMN);
            }
            if a.is_none() {
                missing.push(ANSWER_COLUMN);
            }
            return Err(FaqStoreError::Schema { missing });
        }
    };

    let mut batch = CsvBatch::default();
    for row in reader.records() {
        let row = row?;
        batch.rows_read += 1;

        let question = row.get(q_idx).unwrap_or_default();
        let answer = row.get(a_idx).unwrap_or_default();
        if question.is_empty() || answer.is_empty() {
            batch.skipped_empty += 1;
            continue;
        }
        batch.records.push(FaqRecord::new(question, answer));
    }

    if batch.skipped_empty > 0 {
        warn!(
            skipped_empty = batch.skipped_empty,
            "rows with an empty question or answer were skipped"
        );
    }
    debug!(rows_read = batch.rows_read, accepted = batch.records.len(), "CSV parsed");
    Ok(batch)
}
