//! The resilient batch translation engine.
//!
//! Groups many small files into size- and count-bounded remote calls,
//! dispatches them under bounded concurrency with cooperative
//! cancellation, retries transient failures with backoff, and reconciles
//! per-call results back to per-file outcomes.

/// Reversible masking of code and variable spans.
pub mod codec;

/// Error taxonomy for file-level and remote-call failures.
pub mod error;

/// Retrying execution of remote calls.
pub mod executor;

/// Output path derivation.
pub mod naming;

/// Per-file outcomes and the final run report.
pub mod outcome;

/// Partitioning of input files into remote calls.
pub mod planner;

mod scheduler;

pub use error::EngineError;
pub use executor::RetryPolicy;
pub use outcome::{BatchResult, FailedFile, Progress, ProgressFn, SkippedFile, Statistics, TranslatedFile};
pub use planner::{MAX_TEXT_BYTES, TRANSLATE_BATCH_SIZE, is_batchable, is_supported_file};
pub use scheduler::{DEFAULT_CONCURRENCY, RunOptions};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::Glob;
use walkdir::WalkDir;

use crate::backend::{TranslateOptions, TranslationBackend};

/// Translates a set of files and reports one outcome per input file.
///
/// Only invalid configuration (zero concurrency, missing target language)
/// is returned as `Err`, before any work starts; every file-granularity
/// problem lands in the result's `failed` or `skipped` bucket instead.
pub async fn translate_files<B: TranslationBackend>(
    backend: &B,
    files: &[PathBuf],
    options: &TranslateOptions,
    run_options: RunOptions,
) -> Result<BatchResult> {
    scheduler::run(backend, files, options, run_options).await
}

/// Discovery settings for [`translate_directory`].
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Optional glob applied to file names (e.g. `"*.md"`).
    pub pattern: Option<String>,
}

/// Discovers supported files under `dir`, then delegates to
/// [`translate_files`].
pub async fn translate_directory<B: TranslationBackend>(
    backend: &B,
    dir: &Path,
    options: &TranslateOptions,
    discovery: &DiscoveryOptions,
    run_options: RunOptions,
) -> Result<BatchResult> {
    let files = discover_files(dir, discovery)?;
    translate_files(backend, &files, options, run_options).await
}

/// Walks `dir` and returns supported files, sorted for determinism.
pub fn discover_files(dir: &Path, discovery: &DiscoveryOptions) -> Result<Vec<PathBuf>> {
    let matcher = discovery
        .pattern
        .as_deref()
        .map(|pattern| Glob::new(pattern).map(|glob| glob.compile_matcher()))
        .transpose()
        .with_context(|| format!("Invalid glob pattern: {:?}", discovery.pattern))?;

    let max_depth = if discovery.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth).sort_by_file_name() {
        let entry =
            entry.with_context(|| format!("Failed to walk directory: {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        if !is_supported_file(&path) {
            continue;
        }

        let Some(name) = path.file_name() else {
            continue;
        };
        if let Some(matcher) = &matcher
            && !matcher.is_match(Path::new(name))
        {
            continue;
        }

        files.push(path);
    }

    Ok(files)
}
