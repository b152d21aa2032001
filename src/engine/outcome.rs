//! Per-file outcomes and the final run report.

use std::path::PathBuf;

use super::error::EngineError;

/// Reason recorded for files skipped because of cancellation.
pub const ABORTED: &str = "Aborted";

/// The terminal state of one input file. Every input produces exactly one.
#[derive(Debug)]
pub enum Outcome {
    Successful {
        path: PathBuf,
        output_path: PathBuf,
    },
    Failed {
        path: PathBuf,
        error: EngineError,
    },
    Skipped {
        path: PathBuf,
        reason: String,
    },
}

/// A successfully translated file.
#[derive(Debug)]
pub struct TranslatedFile {
    pub path: PathBuf,
    pub output_path: PathBuf,
}

/// A file that could not be translated.
#[derive(Debug)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: EngineError,
}

/// A file that was never dispatched.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Aggregated result of one run.
///
/// Buckets are append-only and follow completion order, which is not the
/// input order.
#[derive(Debug, Default)]
pub struct BatchResult {
    pub successful: Vec<TranslatedFile>,
    pub failed: Vec<FailedFile>,
    pub skipped: Vec<SkippedFile>,
}

/// Summary counts for a [`BatchResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl BatchResult {
    pub fn statistics(&self) -> Statistics {
        let successful = self.successful.len();
        let failed = self.failed.len();
        let skipped = self.skipped.len();

        Statistics {
            total: successful + failed + skipped,
            successful,
            failed,
            skipped,
        }
    }
}

/// Progress snapshot passed to the caller's callback.
#[derive(Debug, Clone, Copy)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

/// Callback invoked once per file as its outcome becomes known.
pub type ProgressFn = Box<dyn Fn(Progress) + Send + Sync>;

/// Collects outcomes and drives per-file progress reporting.
pub(super) struct Aggregator {
    result: BatchResult,
    total: usize,
    completed: usize,
    on_progress: Option<ProgressFn>,
}

impl Aggregator {
    pub fn new(total: usize, on_progress: Option<ProgressFn>) -> Self {
        Self {
            result: BatchResult::default(),
            total,
            completed: 0,
            on_progress,
        }
    }

    /// Records one file's outcome and fires the progress callback.
    ///
    /// A batched call that resolves n files triggers n calls here, so
    /// progress is always file-granular.
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Successful { path, output_path } => self
                .result
                .successful
                .push(TranslatedFile { path, output_path }),
            Outcome::Failed { path, error } => self.result.failed.push(FailedFile { path, error }),
            Outcome::Skipped { path, reason } => {
                self.result.skipped.push(SkippedFile { path, reason });
            }
        }

        self.completed += 1;
        if let Some(callback) = &self.on_progress {
            callback(Progress {
                completed: self.completed,
                total: self.total,
            });
        }
    }

    pub fn finish(self) -> BatchResult {
        self.result
    }
}
