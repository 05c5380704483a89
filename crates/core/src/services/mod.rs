//! Orchestration services tying scoring, recommendation, alerting and
//! persistence together.
//!
//! Snapshots are JSON-lines files: one serde-encoded record per line, so a
//! partial write is detectable by line number.

mod recommendation;
mod scoring;

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use recommendation::{RecommendationOutput, RecommendationService};
pub use scoring::ScoringService;

use crate::errors::PipelineError;

pub(crate) fn save_jsonl<T: Serialize>(path: &Path, records: &[T]) -> Result<(), PipelineError> {
    let wrap = |source| PipelineError::SnapshotWrite { path: path.to_owned(), source };
    let file = File::create(path).map_err(wrap)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        let line = serde_json::to_string(record).map_err(|source| {
            PipelineError::SnapshotWrite { path: path.to_owned(), source: source.into() }
        })?;
        writer.write_all(line.as_bytes()).map_err(wrap)?;
        writer.write_all(b"\n").map_err(wrap)?;
    }
    writer.flush().map_err(wrap)?;
    Ok(())
}

pub(crate) fn load_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PipelineError> {
    let wrap = |source| PipelineError::SnapshotRead { path: path.to_owned(), source };
    let file = File::open(path).map_err(wrap)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(wrap)?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|source| {
            PipelineError::SnapshotDecode { path: path.to_owned(), line: index + 1, source }
        })?;
        records.push(record);
    }
    Ok(records)
}
