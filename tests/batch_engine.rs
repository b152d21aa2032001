#![allow(clippy::unwrap_used)]
//! Engine behavior tests against a deterministic stub backend.
//!
//! The stub echoes every text back unchanged, so a successful run writes
//! output files whose content equals the input exactly.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use lingo_cli::backend::{BackendError, TranslateOptions, TranslationBackend};
use lingo_cli::engine::{self, MAX_TEXT_BYTES, Progress, RunOptions, TRANSLATE_BATCH_SIZE};

#[derive(Default)]
struct StubBackend {
    batch_calls: Mutex<Vec<Vec<String>>>,
    single_calls: Mutex<Vec<String>>,
    /// Return one fewer result than requested, corrupting attribution.
    drop_last: bool,
    /// Cancel this token as soon as any call arrives.
    cancel_on_call: Option<CancellationToken>,
}

impl StubBackend {
    fn batch_call_sizes(&self) -> Vec<usize> {
        self.batch_calls.lock().unwrap().iter().map(Vec::len).collect()
    }

    fn total_calls(&self) -> usize {
        self.batch_calls.lock().unwrap().len() + self.single_calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl TranslationBackend for StubBackend {
    async fn translate(
        &self,
        text: &str,
        _options: &TranslateOptions,
    ) -> Result<String, BackendError> {
        if let Some(token) = &self.cancel_on_call {
            token.cancel();
        }
        self.single_calls.lock().unwrap().push(text.to_string());
        Ok(text.to_string())
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        _options: &TranslateOptions,
    ) -> Result<Vec<String>, BackendError> {
        if let Some(token) = &self.cancel_on_call {
            token.cancel();
        }
        self.batch_calls.lock().unwrap().push(texts.to_vec());

        let mut results = texts.to_vec();
        if self.drop_last {
            results.pop();
        }
        Ok(results)
    }
}

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn spanish() -> TranslateOptions {
    TranslateOptions {
        target_lang: "es".to_string(),
        ..TranslateOptions::default()
    }
}

fn into_dir(out: &TempDir) -> RunOptions {
    RunOptions {
        output_dir: out.path().to_path_buf(),
        ..RunOptions::default()
    }
}

#[tokio::test]
async fn test_three_small_files_share_one_batch_call() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![
        write_file(&input, "a.txt", "alpha"),
        write_file(&input, "b.txt", "beta"),
        write_file(&input, "c.md", "gamma"),
    ];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert_eq!(backend.batch_call_sizes(), vec![3]);
    assert_eq!(result.statistics().successful, 3);
    assert!(result.failed.is_empty());

    let translated = std::fs::read_to_string(out.path().join("a.es.txt")).unwrap();
    assert_eq!(translated, "alpha");
    assert!(out.path().join("c.es.md").exists());
}

#[tokio::test]
async fn test_fifty_two_files_split_into_two_calls() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files: Vec<_> = (0..52)
        .map(|i| write_file(&input, &format!("f{i:02}.txt"), "hello"))
        .collect();

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    let mut sizes = backend.batch_call_sizes();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, TRANSLATE_BATCH_SIZE]);
    assert_eq!(result.statistics().successful, 52);
}

#[tokio::test]
async fn test_byte_boundary_forces_separate_calls() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let half = "x".repeat(MAX_TEXT_BYTES / 2 + 1);
    let files = vec![
        write_file(&input, "a.txt", &half),
        write_file(&input, "b.txt", &half),
    ];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert_eq!(backend.batch_call_sizes(), vec![1, 1]);
    assert_eq!(result.statistics().successful, 2);
}

#[tokio::test]
async fn test_empty_file_is_rejected_without_a_call() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![write_file(&input, "empty.txt", "")];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert_eq!(backend.total_calls(), 0);
    assert_eq!(result.failed.len(), 1);
    assert!(result.failed[0].error.to_string().contains("empty"));
}

#[tokio::test]
async fn test_oversized_file_is_rejected_without_a_call() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let huge = "x".repeat(MAX_TEXT_BYTES + 1);
    let files = vec![write_file(&input, "huge.txt", &huge)];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert_eq!(backend.total_calls(), 0);
    assert_eq!(result.failed.len(), 1);
    assert!(result.failed[0].error.to_string().contains("too large"));
}

#[tokio::test]
async fn test_count_mismatch_fails_the_whole_unit() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![
        write_file(&input, "a.txt", "alpha"),
        write_file(&input, "b.txt", "beta"),
    ];

    let backend = StubBackend {
        drop_last: true,
        ..StubBackend::default()
    };
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert!(result.successful.is_empty());
    assert_eq!(result.failed.len(), 2);
    for failure in &result.failed {
        assert!(failure.error.to_string().contains("mismatch"));
    }
}

#[tokio::test]
async fn test_every_file_lands_in_exactly_one_bucket() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![
        write_file(&input, "a.txt", "alpha"),
        write_file(&input, "b.md", "beta"),
        write_file(&input, "empty.txt", ""),
        write_file(&input, "data.json", "{\"k\": \"v\"}"),
        input.path().join("missing.txt"),
    ];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    let stats = result.statistics();
    assert_eq!(stats.total, files.len());
    assert_eq!(stats.successful + stats.failed + stats.skipped, files.len());
    assert_eq!(stats.successful, 3);
    assert_eq!(stats.failed, 2); // empty + unreadable
}

#[tokio::test]
async fn test_structured_files_use_the_per_file_path() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![write_file(&input, "data.json", "{\"greeting\": \"hi\"}")];

    let backend = StubBackend::default();
    let result = engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    assert_eq!(backend.batch_calls.lock().unwrap().len(), 0);
    assert_eq!(backend.single_calls.lock().unwrap().len(), 1);
    assert_eq!(result.statistics().successful, 1);
    assert!(out.path().join("data.es.json").exists());
}

#[tokio::test]
async fn test_pre_aborted_token_skips_everything() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![
        write_file(&input, "a.txt", "alpha"),
        write_file(&input, "b.txt", "beta"),
        write_file(&input, "c.txt", "gamma"),
    ];

    let cancel = CancellationToken::new();
    cancel.cancel();

    let backend = StubBackend::default();
    let run_options = RunOptions {
        cancel: Some(cancel),
        ..into_dir(&out)
    };
    let result = engine::translate_files(&backend, &files, &spanish(), run_options)
        .await
        .unwrap();

    assert_eq!(backend.total_calls(), 0);
    assert_eq!(result.skipped.len(), 3);
    for skip in &result.skipped {
        assert_eq!(skip.reason, "Aborted");
    }
}

#[tokio::test]
async fn test_abort_after_first_item_skips_the_rest() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    // Three structured files become three separate work items.
    let files = vec![
        write_file(&input, "a.json", "{\"n\": 1}"),
        write_file(&input, "b.json", "{\"n\": 2}"),
        write_file(&input, "c.json", "{\"n\": 3}"),
    ];

    let cancel = CancellationToken::new();
    let backend = StubBackend {
        cancel_on_call: Some(cancel.clone()),
        ..StubBackend::default()
    };
    let run_options = RunOptions {
        concurrency: Some(1),
        cancel: Some(cancel),
        ..into_dir(&out)
    };
    let result = engine::translate_files(&backend, &files, &spanish(), run_options)
        .await
        .unwrap();

    // The in-flight item completes; nothing else is dispatched.
    assert_eq!(backend.total_calls(), 1);
    let stats = result.statistics();
    assert_eq!(stats.successful, 1);
    assert_eq!(stats.skipped, 2);
    for skip in &result.skipped {
        assert_eq!(skip.reason, "Aborted");
    }
}

#[tokio::test]
async fn test_progress_fires_once_per_file_in_a_batch() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![
        write_file(&input, "a.txt", "alpha"),
        write_file(&input, "b.txt", "beta"),
    ];

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);

    let backend = StubBackend::default();
    let run_options = RunOptions {
        on_progress: Some(Box::new(move |p: Progress| {
            sink.lock().unwrap().push((p.completed, p.total));
        })),
        ..into_dir(&out)
    };
    engine::translate_files(&backend, &files, &spanish(), run_options)
        .await
        .unwrap();

    // One underlying call, two per-file progress events.
    assert_eq!(backend.batch_call_sizes(), vec![2]);
    assert_eq!(*seen.lock().unwrap(), vec![(1, 2), (2, 2)]);
}

#[tokio::test]
async fn test_masked_spans_round_trip_through_the_engine() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let content = "Run `cargo test` with {flags} before shipping.";
    let files = vec![write_file(&input, "a.md", content)];

    let backend = StubBackend::default();
    engine::translate_files(&backend, &files, &spanish(), into_dir(&out))
        .await
        .unwrap();

    // The service saw tokens, not the protected spans.
    let sent = backend.batch_calls.lock().unwrap()[0][0].clone();
    assert!(sent.contains("__CODE_0__"));
    assert!(sent.contains("__VAR_1__"));
    assert!(!sent.contains("cargo test"));

    // The written output restores the original spans.
    let translated = std::fs::read_to_string(out.path().join("a.es.md")).unwrap();
    assert_eq!(translated, content);
}

#[tokio::test]
async fn test_custom_output_pattern_is_applied() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    let files = vec![write_file(&input, "notes.txt", "hello")];

    let backend = StubBackend::default();
    let run_options = RunOptions {
        output_pattern: Some("{lang}-{name}.{ext}".to_string()),
        ..into_dir(&out)
    };
    engine::translate_files(&backend, &files, &spanish(), run_options)
        .await
        .unwrap();

    assert!(out.path().join("es-notes.txt").exists());
}

#[tokio::test]
async fn test_zero_concurrency_is_rejected_up_front() {
    let out = TempDir::new().unwrap();
    let backend = StubBackend::default();

    let run_options = RunOptions {
        concurrency: Some(0),
        ..into_dir(&out)
    };
    let result =
        engine::translate_files(&backend, &[PathBuf::from("a.txt")], &spanish(), run_options)
            .await;

    assert!(result.is_err());
    assert_eq!(backend.total_calls(), 0);
}
