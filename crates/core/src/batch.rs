//! Chunked, resumable batch execution.
//!
//! The processor walks a client-keyed population in fixed-size slices and
//! hands each slice to a caller-supplied worker. A failed slice aborts the
//! run; the keys finished so far stay recorded so the next run can resume
//! past them.

use std::collections::HashSet;

use tracing::{info, warn};

use crate::config::BatchConfig;
use crate::errors::PipelineError;
use crate::scoring::ScoredClient;

/// Rows the processor can track by client.
pub trait ClientKeyed {
    fn client_key(&self) -> &str;
}

impl ClientKeyed for ScoredClient {
    fn client_key(&self) -> &str {
        self.client_ref.as_str()
    }
}

impl<T: ClientKeyed> ClientKeyed for &T {
    fn client_key(&self) -> &str {
        (*self).client_key()
    }
}

#[derive(Debug)]
pub struct BatchProcessor {
    batch_size: usize,
    processed: HashSet<String>,
    resume_mode: bool,
    batch_counter: usize,
}

impl BatchProcessor {
    pub fn new(config: &BatchConfig) -> Self {
        Self {
            batch_size: config.batch_size.max(1),
            processed: HashSet::new(),
            resume_mode: false,
            batch_counter: 0,
        }
    }

    /// Keys completed by prior runs. Only meaningful between a failed run
    /// and the resuming one.
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }

    /// Batches completed so far, cumulative across a failed run and its
    /// resumes. Cleared with the rest of the resume state.
    pub fn batch_counter(&self) -> usize {
        self.batch_counter
    }

    pub fn resume_mode(&self) -> bool {
        self.resume_mode
    }

    /// Toggle resume mode explicitly. A run with resume mode off starts
    /// from an empty processed set; with it on, previously completed
    /// clients are skipped.
    pub fn set_resume_mode(&mut self, enabled: bool) {
        self.resume_mode = enabled;
    }

    /// Drop all resume state.
    pub fn reset(&mut self) {
        self.processed.clear();
        self.resume_mode = false;
        self.batch_counter = 0;
    }

    /// Rows of `population` not yet covered by the processed set.
    pub fn remaining<'a, Row: ClientKeyed>(&self, population: &'a [Row]) -> Vec<&'a Row> {
        population
            .iter()
            .filter(|row| !self.processed.contains(row.client_key()))
            .collect()
    }

    /// Run `worker` over the population in `batch_size` slices.
    ///
    /// In resume mode rows already in the processed set are skipped; a
    /// fresh run starts from an empty set. Worker output is concatenated in
    /// population order. On worker failure the run aborts with the failing
    /// batch index and the cumulative processed count; the processed set is
    /// kept and the next run resumes automatically.
    pub fn run<Row, Out, F>(
        &mut self,
        population: &[Row],
        mut worker: F,
    ) -> Result<Vec<Out>, PipelineError>
    where
        Row: ClientKeyed,
        F: FnMut(&[&Row]) -> Result<Vec<Out>, PipelineError>,
    {
        if !self.resume_mode {
            self.processed.clear();
            self.batch_counter = 0;
        }
        let pending = self.remaining(population);
        let skipped = population.len() - pending.len();
        if skipped > 0 {
            info!(
                event_name = "batch.resume",
                skipped,
                pending = pending.len(),
                "resuming past previously processed clients"
            );
        }

        let mut results = Vec::with_capacity(pending.len());
        for (batch_index, chunk) in pending.chunks(self.batch_size).enumerate() {
            match worker(chunk) {
                Ok(mut outputs) => {
                    results.append(&mut outputs);
                    for row in chunk {
                        self.processed.insert(row.client_key().to_owned());
                    }
                    self.batch_counter += 1;
                    info!(
                        event_name = "batch.completed",
                        batch = batch_index,
                        batch_len = chunk.len(),
                        total_batches = self.batch_counter,
                        total_processed = self.processed.len(),
                        "batch complete"
                    );
                }
                Err(source) => {
                    warn!(
                        event_name = "batch.failed",
                        batch = batch_index,
                        total_processed = self.processed.len(),
                        "batch failed, run aborted"
                    );
                    self.resume_mode = true;
                    return Err(PipelineError::Batch {
                        batch: batch_index,
                        processed: self.processed.len(),
                        source: Box::new(source),
                    });
                }
            }
        }

        // A completed run must not poison the next one.
        self.reset();
        Ok(results)
    }
}
