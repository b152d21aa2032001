//! Bounded-concurrency dispatch of planned work.
//!
//! Work items (batch units and single files) run through a
//! `buffer_unordered` pool on one task, so outcome bookkeeping needs no
//! locks. Cancellation is cooperative: the token is observed at each
//! dispatch boundary and an in-flight call always runs to completion.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use futures_util::{StreamExt, stream};
use tokio_util::sync::CancellationToken;

use crate::backend::{TranslateOptions, TranslationBackend};
use crate::fs;

use super::codec;
use super::error::EngineError;
use super::executor::{self, RetryPolicy};
use super::naming;
use super::outcome::{ABORTED, Aggregator, BatchResult, Outcome, ProgressFn};
use super::planner::{self, BatchUnit, FileEntry};

/// In-flight work items when the caller does not specify a limit.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Caller-supplied knobs for one run.
pub struct RunOptions {
    /// Directory translated files are written into.
    pub output_dir: PathBuf,
    /// Optional output name pattern (`{name}`, `{lang}`, `{ext}`).
    pub output_pattern: Option<String>,
    /// In-flight work item cap; defaults to [`DEFAULT_CONCURRENCY`].
    pub concurrency: Option<usize>,
    /// Retry and backoff settings applied to every remote call.
    pub retry: RetryPolicy,
    /// Invoked once per file as its outcome becomes known.
    pub on_progress: Option<ProgressFn>,
    /// Observed, never triggered, at each dispatch boundary.
    pub cancel: Option<CancellationToken>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            output_pattern: None,
            concurrency: None,
            retry: RetryPolicy::default(),
            on_progress: None,
            cancel: None,
        }
    }
}

enum WorkItem {
    Unit(BatchUnit),
    Single(FileEntry),
}

impl WorkItem {
    fn into_paths(self) -> Vec<PathBuf> {
        match self {
            Self::Unit(unit) => unit.entries.into_iter().map(|e| e.path).collect(),
            Self::Single(entry) => vec![entry.path],
        }
    }
}

pub(super) async fn run<B: TranslationBackend>(
    backend: &B,
    files: &[PathBuf],
    options: &TranslateOptions,
    run_options: RunOptions,
) -> Result<BatchResult> {
    let RunOptions {
        output_dir,
        output_pattern,
        concurrency,
        retry,
        on_progress,
        cancel,
    } = run_options;

    let concurrency = concurrency.unwrap_or(DEFAULT_CONCURRENCY);
    if concurrency == 0 {
        bail!("concurrency must be at least 1");
    }
    if options.target_lang.is_empty() {
        bail!("target language must not be empty");
    }

    let cancel = cancel.unwrap_or_default();
    let mut aggregator = Aggregator::new(files.len(), on_progress);

    // A token cancelled before entry skips everything, without any reads.
    if cancel.is_cancelled() {
        for path in files {
            aggregator.record(skipped(path.clone()));
        }
        return Ok(aggregator.finish());
    }

    tokio::fs::create_dir_all(&output_dir)
        .await
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    // Read phase. A failed read is that file's outcome, not the run's.
    let mut entries = Vec::with_capacity(files.len());
    for path in files {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => entries.push(FileEntry::new(path.clone(), raw)),
            Err(e) => aggregator.record(Outcome::Failed {
                path: path.clone(),
                error: EngineError::Read(format!("{}: {e}", path.display())),
            }),
        }
    }

    let plan = planner::plan(entries);
    for (path, error) in plan.rejected {
        aggregator.record(Outcome::Failed { path, error });
    }

    let items: Vec<WorkItem> = plan
        .units
        .into_iter()
        .map(WorkItem::Unit)
        .chain(plan.singles.into_iter().map(WorkItem::Single))
        .collect();

    let mut outcomes = stream::iter(items)
        .map(|item| {
            process_item(
                backend,
                options,
                &retry,
                &output_dir,
                output_pattern.as_deref(),
                &cancel,
                item,
            )
        })
        .buffer_unordered(concurrency);

    while let Some(item_outcomes) = outcomes.next().await {
        for outcome in item_outcomes {
            aggregator.record(outcome);
        }
    }

    Ok(aggregator.finish())
}

async fn process_item<B: TranslationBackend>(
    backend: &B,
    options: &TranslateOptions,
    retry: &RetryPolicy,
    output_dir: &Path,
    pattern: Option<&str>,
    cancel: &CancellationToken,
    item: WorkItem,
) -> Vec<Outcome> {
    // Dispatch boundary. Items already past this point are never preempted.
    if cancel.is_cancelled() {
        return item.into_paths().into_iter().map(skipped).collect();
    }

    match item {
        WorkItem::Unit(unit) => process_unit(backend, options, retry, output_dir, pattern, unit).await,
        WorkItem::Single(entry) => {
            vec![process_single(backend, options, retry, output_dir, pattern, entry).await]
        }
    }
}

async fn process_unit<B: TranslationBackend>(
    backend: &B,
    options: &TranslateOptions,
    retry: &RetryPolicy,
    output_dir: &Path,
    pattern: Option<&str>,
    unit: BatchUnit,
) -> Vec<Outcome> {
    let texts: Vec<String> = unit.entries.iter().map(|e| e.masked.clone()).collect();

    let translations =
        match executor::execute(retry, || backend.translate_batch(&texts, options)).await {
            Ok(translations) => translations,
            Err(error) => return fail_unit(unit, &error),
        };

    // A response of the wrong length makes positional attribution unsafe
    // for every file in the unit.
    if translations.len() != unit.entries.len() {
        let error = EngineError::CountMismatch {
            sent: unit.entries.len(),
            received: translations.len(),
        };
        return fail_unit(unit, &error);
    }

    let mut outcomes = Vec::with_capacity(unit.entries.len());
    for (entry, translated) in unit.entries.into_iter().zip(translations) {
        outcomes.push(write_output(entry, &translated, options, output_dir, pattern).await);
    }
    outcomes
}

async fn process_single<B: TranslationBackend>(
    backend: &B,
    options: &TranslateOptions,
    retry: &RetryPolicy,
    output_dir: &Path,
    pattern: Option<&str>,
    entry: FileEntry,
) -> Outcome {
    let result = executor::execute(retry, || backend.translate(&entry.masked, options)).await;

    match result {
        Ok(translated) => write_output(entry, &translated, options, output_dir, pattern).await,
        Err(error) => Outcome::Failed {
            path: entry.path,
            error,
        },
    }
}

/// Unmasks and writes one translated file. Write failures stay file-local.
async fn write_output(
    entry: FileEntry,
    translated: &str,
    options: &TranslateOptions,
    output_dir: &Path,
    pattern: Option<&str>,
) -> Outcome {
    let restored = codec::unmask(translated, &entry.tokens);
    let output_path =
        naming::derive_output_path(&entry.path, &options.target_lang, output_dir, pattern);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            return Outcome::Failed {
                path: entry.path,
                error: EngineError::Write(format!("{}: {e}", parent.display())),
            };
        }
    }

    match fs::atomic_write(&output_path, &restored).await {
        Ok(()) => Outcome::Successful {
            path: entry.path,
            output_path,
        },
        Err(e) => Outcome::Failed {
            path: entry.path,
            error: EngineError::Write(format!("{}: {e}", output_path.display())),
        },
    }
}

fn fail_unit(unit: BatchUnit, error: &EngineError) -> Vec<Outcome> {
    unit.entries
        .into_iter()
        .map(|entry| Outcome::Failed {
            path: entry.path,
            error: error.clone(),
        })
        .collect()
}

fn skipped(path: PathBuf) -> Outcome {
    Outcome::Skipped {
        path,
        reason: ABORTED.to_string(),
    }
}
