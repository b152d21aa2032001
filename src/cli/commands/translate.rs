use std::path::PathBuf;

use anyhow::{Result, bail};
use tokio_util::sync::CancellationToken;

use crate::backend::{HttpBackend, TranslateOptions};
use crate::config::{ConfigManager, ResolveOptions, resolve_config};
use crate::engine::{self, BatchResult, DiscoveryOptions, Progress, RunOptions};
use crate::language::validate_language;
use crate::ui::{FileProgress, Style};
use crate::{status, warn};

/// CLI inputs for the default translate invocation.
pub struct TranslateArgs {
    pub paths: Vec<String>,
    pub to: Option<String>,
    pub source: Option<String>,
    pub output_dir: String,
    pub pattern: Option<String>,
    pub concurrency: Option<usize>,
    pub recursive: bool,
    pub glob: Option<String>,
    pub provider: Option<String>,
    pub formality: Option<String>,
}

pub async fn run_translate(args: TranslateArgs) -> Result<BatchResult> {
    if args.paths.is_empty() {
        bail!(
            "No input files\n\n\
             Usage: lingo <FILES>... --to <lang>"
        );
    }

    let manager = ConfigManager::new();
    let config_file = manager.load_or_default();
    let resolved = resolve_config(
        &ResolveOptions {
            to: args.to,
            provider: args.provider,
            formality: args.formality,
        },
        &config_file,
    )?;

    validate_language(&resolved.target_language)?;

    let backend = HttpBackend::new(resolved.endpoint, resolved.api_key)?;
    let options = TranslateOptions {
        target_lang: resolved.target_language,
        source_lang: args.source,
        formality: resolved.formality,
    };

    let discovery = DiscoveryOptions {
        recursive: args.recursive,
        pattern: args.glob,
    };

    // Expand directory arguments; plain file arguments pass through as-is.
    let mut files: Vec<PathBuf> = Vec::new();
    for raw in &args.paths {
        let path = PathBuf::from(raw);
        if path.is_dir() {
            files.extend(engine::discover_files(&path, &discovery)?);
        } else {
            files.push(path);
        }
    }

    if files.is_empty() {
        bail!("No translatable files found");
    }

    // Ctrl+C requests cooperative cancellation: in-flight calls finish,
    // pending files are skipped, and the summary still prints.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_token.cancel();
        }
    });

    let progress = FileProgress::new(files.len() as u64);
    let bar = progress.clone();

    let run_options = RunOptions {
        output_dir: PathBuf::from(&args.output_dir),
        output_pattern: args.pattern,
        concurrency: args.concurrency,
        on_progress: Some(Box::new(move |p: Progress| {
            bar.set_position(p.completed as u64);
        })),
        cancel: Some(cancel),
        ..RunOptions::default()
    };

    let result = engine::translate_files(&backend, &files, &options, run_options).await?;
    progress.finish();

    render_summary(&result);
    Ok(result)
}

fn render_summary(result: &BatchResult) {
    for failure in &result.failed {
        warn!(
            "{} {}: {}",
            Style::error("failed"),
            failure.path.display(),
            failure.error
        );
    }

    for skip in &result.skipped {
        status!(
            "{} {}: {}",
            Style::warning("skipped"),
            skip.path.display(),
            skip.reason
        );
    }

    let stats = result.statistics();
    status!(
        "{} {} translated, {} failed, {} skipped ({} total)",
        Style::success("done:"),
        stats.successful,
        stats.failed,
        stats.skipped,
        stats.total
    );
}
