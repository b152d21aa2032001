//! # lingo - Resilient Batch Translation CLI
//!
//! `lingo` translates text files against a remote, rate-limited
//! translation API. Many small files are grouped into size-bounded batch
//! requests, dispatched under bounded concurrency, retried with backoff,
//! and reconciled back to one outcome per input file.
//!
//! ## Features
//!
//! - **Batching**: up to 50 files per request, bounded by payload size
//! - **Resilience**: retry/backoff that distinguishes transient,
//!   rate-limit, and fatal failures, honoring `Retry-After`
//! - **Cooperative cancellation**: Ctrl+C skips pending files without
//!   corrupting in-flight writes
//! - **Masking**: code spans and placeholders survive translation intact
//!
//! ## Quick Start
//!
//! ```bash
//! # Translate files into Spanish next to the originals
//! lingo --to es notes.md todo.txt
//!
//! # Translate a whole directory tree
//! lingo --to ja --recursive ./docs --output-dir ./docs-ja
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/lingo/config.toml`:
//!
//! ```toml
//! [lingo]
//! provider = "hosted"
//! to = "es"
//!
//! [providers.hosted]
//! endpoint = "https://api.example.com"
//! api_key_env = "LINGO_API_KEY"
//! ```

/// Remote translation backend trait and HTTP implementation.
pub mod backend;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// The batching, retrying translation engine.
pub mod engine;

/// File system utilities.
pub mod fs;

/// Supported target languages.
pub mod language;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Terminal UI components (progress bar, colors).
pub mod ui;
