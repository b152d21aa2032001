use anyhow::{Context, Result};
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{BackendError, TranslateOptions, TranslationBackend};

/// Per-request HTTP timeout. Retrying across timeouts is the executor's job.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum number of response body bytes echoed into error messages.
const ERROR_BODY_LIMIT: usize = 300;

// Use borrowed fields to avoid cloning texts that are only serialized once.
#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    text: &'a [String],
    target_lang: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_lang: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formality: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

/// HTTP client for a JSON translation API.
pub struct HttpBackend {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpBackend {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to construct HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            api_key,
        })
    }

    async fn request(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Result<Vec<String>, BackendError> {
        let url = format!("{}/v2/translate", self.endpoint.trim_end_matches('/'));

        let body = TranslateRequest {
            text: texts,
            target_lang: &options.target_lang,
            source_lang: options.source_lang.as_deref(),
            formality: options.formality.as_deref(),
        };

        let mut http_request = self.client.post(&url).json(&body);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("Authorization", format!("Bearer {api_key}"));
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| BackendError::Transport {
                message: format!("Failed to reach API endpoint {url}: {e}"),
            })?;

        let status = response.status();
        let trace_id = header_value(response.headers(), "x-request-id");

        if !status.is_success() {
            let retry_after = header_value(response.headers(), "retry-after");
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: truncate(&body, ERROR_BODY_LIMIT),
                retry_after,
                trace_id,
            });
        }

        let parsed: TranslateResponse =
            response.json().await.map_err(|e| BackendError::Transport {
                message: format!("Malformed response body: {e}"),
            })?;

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}

#[async_trait::async_trait]
impl TranslationBackend for HttpBackend {
    async fn translate(
        &self,
        text: &str,
        options: &TranslateOptions,
    ) -> Result<String, BackendError> {
        let texts = [text.to_owned()];
        let mut results = self.request(&texts, options).await?;

        if results.len() != 1 {
            return Err(BackendError::Transport {
                message: format!("Expected 1 translation, received {}", results.len()),
            });
        }

        Ok(results.remove(0))
    }

    async fn translate_batch(
        &self,
        texts: &[String],
        options: &TranslateOptions,
    ) -> Result<Vec<String>, BackendError> {
        self.request(texts, options).await
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

fn truncate(body: &str, limit: usize) -> String {
    if body.len() <= limit {
        return body.to_string();
    }

    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
