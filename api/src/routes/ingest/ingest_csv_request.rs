use faq_store::{DedupMode, IngestReport};
use serde::{Deserialize, Serialize};

/// Request payload for /ingest_csv.
#[derive(Debug, Deserialize)]
pub struct IngestCsvRequest {
    /// Path of the CSV on the server's filesystem.
    #[serde(default)]
    pub file_path: Option<String>,
    /// `batch` (default) or `incremental`.
    #[serde(default)]
    pub dedup_mode: Option<DedupMode>,
}

/// Response payload for /ingest_csv.
#[derive(Debug, Serialize)]
pub struct IngestCsvResponse {
    /// Rows written to the store.
    pub rows: usize,
    pub rows_read: usize,
    pub skipped_duplicates: usize,
    pub skipped_empty: usize,
}

impl From<IngestReport> for IngestCsvResponse {
    fn from(r: IngestReport) -> Self {
        Self {
            rows: r.written,
            rows_read: r.rows_read,
            skipped_duplicates: r.skipped_duplicates,
            skipped_empty: r.skipped_empty,
        }
    }
}
