//! Directory-persisted collection: `<store_dir>/<collection>.jsonl`.
//!
//! One JSON line per stored record. The file is loaded fully at open, appended on each
//! write and removed together with its directory on reset. Search is exact cosine
//! similarity over every record; equal scores keep insertion order.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, BufWriter, ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    errors::FaqStoreError,
    record::{EmbeddedFaq, FaqHit, FaqRecord, question_key},
};

/// On-disk line format.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredLine {
    id: String,
    question: String,
    answer: String,
    text: String,
    embedding: Vec<f32>,
}

impl From<&EmbeddedFaq> for StoredLine {
    fn from(e: &EmbeddedFaq) -> Self {
        Self {
            id: e.record.id.clone(),
            question: e.record.question.clone(),
            answer: e.record.answer.clone(),
            text: e.text.clone(),
            embedding: e.embedding.clone(),
        }
    }
}

impl StoredLine {
    fn record(&self) -> FaqRecord {
        FaqRecord {
            id: self.id.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

/// In-memory view of the collection file.
#[derive(Debug)]
pub struct LocalStore {
    dir: PathBuf,
    file: PathBuf,
    lines: Vec<StoredLine>,
    by_id: HashMap<String, usize>,
    /// question_key -> index of the first record with that key
    by_question: HashMap<String, usize>,
}

impl LocalStore {
    /// Opens (or lazily creates on first write) the collection under `dir`.
    ///
    /// # Errors
    /// I/O failures other than "not found", or a corrupt line.
    pub fn open(dir: impl Into<PathBuf>, collection: &str) -> Result<Self, FaqStoreError> {
        let dir = dir.into();
        let file = dir.join(format!("{collection}.jsonl"));
        let mut store = Self {
            dir,
            file,
            lines: Vec::new(),
            by_id: HashMap::new(),
            by_question: HashMap::new(),
        };

        match std::fs::File::open(&store.file) {
            Ok(f) => {
                for (n, line) in BufReader::new(f).lines().enumerate() {
                    let line = line?;
                    if line.trim().is_empty() {
                        continue;
                    }
                    let parsed: StoredLine = serde_json::from_str(&line).map_err(|e| {
                        warn!(line = n + 1, file = %store.file.display(), error = %e, "corrupt collection line");
                        e
                    })?;
                    store.insert(parsed);
                }
                info!(file = %store.file.display(), records = store.lines.len(), "local collection loaded");
            }
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                debug!(file = %store.file.display(), "local collection not found; starts empty");
            }
            Err(e) => return Err(e.into()),
        }

        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.file
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    /// Vector length of the collection, fixed by its first record.
    pub fn dim(&self) -> Option<usize> {
        self.lines.first().map(|l| l.embedding.len())
    }

    /// Appends records to the file and the in-memory index.
    ///
    /// Validates all dimensions first; on mismatch nothing is written.
    pub fn add(&mut self, items: &[EmbeddedFaq]) -> Result<usize, FaqStoreError> {
        if items.is_empty() {
            return Ok(0);
        }
        if let Some(want) = self.dim().or_else(|| items.first().map(|e| e.embedding.len())) {
            if let Some(bad) = items.iter().find(|e| e.embedding.len() != want) {
                return Err(FaqStoreError::VectorSizeMismatch {
                    got: bad.embedding.len(),
                    want,
                });
            }
        }

        std::fs::create_dir_all(&self.dir)?;
        let f = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file)?;
        let mut w = BufWriter::new(f);
        let lines: Vec<StoredLine> = items.iter().map(StoredLine::from).collect();
        for line in &lines {
            serde_json::to_writer(&mut w, line)?;
            w.write_all(b"\n")?;
        }
        w.flush()?;

        for line in lines {
            self.insert(line);
        }
        debug!(written = items.len(), total = self.lines.len(), "local collection appended");
        Ok(items.len())
    }

    /// Top-`k` records by cosine similarity, nearest first.
    ///
    /// A query whose length differs from the stored vectors is rejected.
    pub fn search(&self, vector: &[f32], k: usize) -> Result<Vec<FaqHit>, FaqStoreError> {
        if let Some(want) = self.dim() {
            if vector.len() != want {
                return Err(FaqStoreError::VectorSizeMismatch {
                    got: vector.len(),
                    want,
                });
            }
        }
        let mut scored: Vec<(usize, f32)> = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, l)| (i, cosine(vector, &l.embedding)))
            .collect();
        // stable sort: equal scores stay in insertion order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(scored
            .into_iter()
            .take(k)
            .map(|(i, score)| FaqHit {
                record: self.lines[i].record(),
                score,
            })
            .collect())
    }

    pub fn find_by_question_key(&self, key: &str) -> Option<FaqRecord> {
        self.by_question.get(key).map(|&i| self.lines[i].record())
    }

    /// Records in insertion order, at most `limit`.
    pub fn list(&self, limit: usize) -> Vec<FaqRecord> {
        self.lines.iter().take(limit).map(StoredLine::record).collect()
    }

    /// Clears memory and removes the whole store directory. A missing directory is fine.
    pub fn reset(&mut self) -> Result<(), FaqStoreError> {
        self.lines.clear();
        self.by_id.clear();
        self.by_question.clear();
        remove_store_dir(&self.dir)
    }

    fn insert(&mut self, line: StoredLine) {
        if let Some(&i) = self.by_id.get(&line.id) {
            self.lines[i] = line;
            return;
        }
        let i = self.lines.len();
        self.by_id.insert(line.id.clone(), i);
        self.by_question
            .entry(question_key(&line.question))
            .or_insert(i);
        self.lines.push(line);
    }
}

/// Removes `dir` recursively; `NotFound` counts as success.
pub fn remove_store_dir(dir: &Path) -> Result<(), FaqStoreError> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            info!(dir = %dir.display(), "store directory removed");
            Ok(())
        }
        Err(e) if e.kind() == IoErrorKind::NotFound => {
            debug!(dir = %dir.display(), "store directory already absent");
            Ok(())
        }
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "failed to remove store directory");
            Err(e.into())
        }
    }
}

/// Cosine similarity; `0.0` when either vector is all zeros or lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}
