//! Error taxonomy for file-level and remote-call failures.

use thiserror::Error;

/// A failure attributed to one file, or fanned out to every file in a
/// batch unit.
///
/// Variants carry plain message strings so a single remote failure can be
/// cloned onto each affected file. Remote variants embed the correlation id
/// of the last response that carried one.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    /// Credential or permission failure (401/403).
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Usage limit reached (456).
    #[error("usage quota exceeded: {0}")]
    Quota(String),

    /// 429 still failing after the retry budget was spent.
    #[error("rate limited: {0}")]
    RateLimit(String),

    /// 5xx or transport-level failure after retries.
    #[error("network failure: {0}")]
    Network(String),

    /// Any other client error; never retried.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Zero-byte input, rejected before planning.
    #[error("empty file")]
    EmptyFile,

    /// A single file whose payload alone exceeds the per-request limit.
    #[error("file too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: usize, limit: usize },

    /// A batch response whose length makes positional attribution unsafe.
    #[error("batch count mismatch: sent {sent} texts, received {received} translations")]
    CountMismatch { sent: usize, received: usize },

    #[error("read error: {0}")]
    Read(String),

    #[error("write error: {0}")]
    Write(String),
}
