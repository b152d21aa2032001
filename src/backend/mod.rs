//! Remote translation backend boundary.
//!
//! The engine only ever talks to a [`TranslationBackend`], so tests can
//! substitute a deterministic in-memory stub for the HTTP client.

mod http;

pub use http::HttpBackend;

use thiserror::Error;

/// Options applied to every translation request in a run.
#[derive(Debug, Clone, Default)]
pub struct TranslateOptions {
    /// Target language code (ISO 639-1).
    pub target_lang: String,
    /// Source language code; detected by the service if omitted.
    pub source_lang: Option<String>,
    /// Formality preference (e.g. "more", "less"), where supported.
    pub formality: Option<String>,
}

/// Failure of a single remote call attempt.
///
/// The retry layer inspects the status code and the raw `Retry-After`
/// header; everything else is opaque message text.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The service answered with a non-success HTTP status.
    #[error("API request failed with status {status}: {message}")]
    Status {
        status: u16,
        message: String,
        /// Raw `Retry-After` header value, if the response carried one.
        retry_after: Option<String>,
        /// Correlation id from the response headers, if present.
        trace_id: Option<String>,
    },
    /// The request never produced an HTTP response.
    #[error("network error: {message}")]
    Transport { message: String },
}

impl BackendError {
    /// Returns `true` when another attempt could reasonably succeed.
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Transport { .. } => true,
        }
    }

    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } => None,
        }
    }

    pub fn retry_after(&self) -> Option<&str> {
        match self {
            Self::Status { retry_after, .. } => retry_after.as_deref(),
            Self::Transport { .. } => None,
        }
    }

    pub fn trace_id(&self) -> Option<&str> {
        match self {
            Self::Status { trace_id, .. } => trace_id.as_deref(),
            Self::Transport { .. } => None,
        }
    }
}

/// A remote translation service.
#[async_trait::async_trait]
pub trait TranslationBackend {
    /// Translates a single text.
    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<String, BackendError>;

    /// Translates many texts in one request.
    ///
    /// Implementations must return translations in request order with the
    /// same length as `texts`, or fail the whole call.
    async fn translate_batch(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Result<Vec<String>, BackendError>;
}
