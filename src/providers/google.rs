use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

use crate::errors::ProviderError;
use crate::providers::TranslationProvider;

/// Default public endpoint of the Cloud Translation API
pub const DEFAULT_ENDPOINT: &str = "https://translation.googleapis.com";

const TRANSLATE_PATH: &str = "language/translate/v2";

/// Client for the Google Cloud Translation v2 REST API
#[derive(Debug)]
pub struct GoogleTranslate {
    /// API key sent as the `key` query parameter
    api_key: String,
    /// Base URL of the API
    endpoint: String,
    /// Optional source language; auto-detected by the service when absent
    source_language: Option<String>,
    /// HTTP client for making requests
    client: Client,
    /// Maximum number of retry attempts
    max_retries: u32,
    /// Base backoff time in milliseconds for exponential backoff
    backoff_base_ms: u64,
    /// Optional rate limit in requests per minute
    rate_limit: Option<u32>,
    /// When the previous request was sent, for rate limit spacing
    last_request: Mutex<Option<Instant>>,
}

/// Translate request body
#[derive(Debug, Serialize)]
pub struct TranslateRequest<'a> {
    /// Text to translate
    pub q: &'a str,
    /// Target language code
    pub target: &'a str,
    /// `text` so the service neither expects nor emits HTML entities
    pub format: &'static str,
    /// Source language code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<&'a str>,
}

/// Translate response body
#[derive(Debug, Deserialize)]
pub struct TranslateResponse {
    pub data: TranslateData,
}

#[derive(Debug, Deserialize)]
pub struct TranslateData {
    #[serde(default)]
    pub translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

impl GoogleTranslate {
    /// Create a client with default retry settings
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::new_with_config(api_key, DEFAULT_ENDPOINT, None, 30, 3, 1000, None)
    }

    /// Create a client with full configuration
    pub fn new_with_config(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        source_language: Option<String>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
        rate_limit: Option<u32>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            source_language,
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .pool_idle_timeout(Duration::from_secs(90))
                .build()
                .unwrap_or_default(),
            max_retries,
            backoff_base_ms,
            rate_limit,
            last_request: Mutex::new(None),
        }
    }

    /// Full request URL including the API key
    pub fn build_url(endpoint: &str, api_key: &str) -> Result<Url, ProviderError> {
        let base = if endpoint.ends_with('/') {
            endpoint.to_string()
        } else {
            format!("{}/", endpoint)
        };
        let mut url = Url::parse(&base)
            .and_then(|b| b.join(TRANSLATE_PATH))
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", endpoint, e)))?;
        url.query_pairs_mut().append_pair("key", api_key);
        Ok(url)
    }

    /// Pull the first translation out of a response body
    pub fn extract_translation(body: &str) -> Result<String, ProviderError> {
        let response: TranslateResponse = serde_json::from_str(body)
            .map_err(|e| ProviderError::ParseError(format!("Invalid translate response: {}", e)))?;

        match response.data.translations.into_iter().next() {
            Some(t) if !t.translated_text.is_empty() => Ok(t.translated_text),
            _ => Err(ProviderError::EmptyResponse),
        }
    }

    /// Wait until the configured requests-per-minute budget allows another call
    async fn wait_for_slot(&self) {
        let Some(rate_limit) = self.rate_limit.filter(|r| *r > 0) else {
            return;
        };
        let spacing = Duration::from_millis(60_000 / rate_limit as u64);

        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let ready_at = previous + spacing;
            if ready_at > Instant::now() {
                tokio::time::sleep_until(ready_at).await;
            }
        }
        *last = Some(Instant::now());
    }

    async fn send_once(&self, url: &Url, request: &TranslateRequest<'_>) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to read response body: {}", e)))?;

        if status.is_success() {
            return Self::extract_translation(&body);
        }

        let message = truncate_for_log(&body);
        Err(match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
            StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
            _ => ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            },
        })
    }
}

/// Server errors, throttling and network failures are worth another attempt
fn is_retryable(error: &ProviderError) -> bool {
    match error {
        ProviderError::ConnectionError(_) | ProviderError::RateLimitExceeded(_) => true,
        ProviderError::ApiError { status_code, .. } => *status_code >= 500,
        _ => false,
    }
}

fn truncate_for_log(body: &str) -> String {
    if body.chars().count() > 500 {
        body.chars().take(500).collect()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, ProviderError> {
        let url = Self::build_url(&self.endpoint, &self.api_key)?;
        let request = TranslateRequest {
            q: text,
            target: target_code,
            format: "text",
            source: self.source_language.as_deref(),
        };

        let mut attempt = 0;
        loop {
            self.wait_for_slot().await;

            let error = match self.send_once(&url, &request).await {
                Ok(translated) => return Ok(translated),
                Err(e) => e,
            };

            if !is_retryable(&error) {
                error!("Google Translate error for '{}': {}", target_code, error);
                return Err(error);
            }

            attempt += 1;
            if attempt > self.max_retries {
                error!(
                    "Google Translate failed for '{}' after {} attempts: {}",
                    target_code,
                    self.max_retries + 1,
                    error
                );
                return Err(error);
            }

            let backoff_ms = self.backoff_base_ms * (1u64 << (attempt - 1));
            warn!(
                "Google Translate error: {} - attempt {}/{}, retrying in {}ms",
                error,
                attempt,
                self.max_retries + 1,
                backoff_ms
            );
            tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            debug!("Retrying translation into '{}'", target_code);
        }
    }

    fn name(&self) -> &str {
        "google"
    }
}
