/*!
 * Core translation service implementation.
 *
 * `TranslationService` is the capability callers hold: either disabled, in
 * which case nothing is ever sent anywhere, or configured with a provider.
 * Provider errors never escape; they are logged, counted and turned into
 * "no result".
 */

use anyhow::Result;
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::app_config::{TranslationConfig, TranslationProvider as ConfigTranslationProvider};
use crate::language_utils;
use crate::providers::google::GoogleTranslate;
use crate::providers::mock::MockProvider;
use crate::providers::TranslationProvider;

/// Whether a provider is available
#[derive(Debug, Clone)]
enum Backend {
    Disabled,
    Configured(Arc<dyn TranslationProvider>),
}

/// Translation capability shared by every reconciliation of a run
///
/// Cheap to clone; clones share the provider and the counters.
#[derive(Debug, Clone)]
pub struct TranslationService {
    backend: Backend,
    language_codes: Arc<BTreeMap<String, String>>,
    failures: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl TranslationService {
    /// A service that never translates and never fails
    pub fn disabled() -> Self {
        Self {
            backend: Backend::Disabled,
            language_codes: Arc::new(BTreeMap::new()),
            failures: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A service backed by `provider`
    ///
    /// `language_codes` maps dictionary qualifiers to provider codes for the
    /// cases the automatic conversion gets wrong.
    pub fn new(provider: Arc<dyn TranslationProvider>, language_codes: BTreeMap<String, String>) -> Self {
        Self {
            backend: Backend::Configured(provider),
            language_codes: Arc::new(language_codes),
            failures: Arc::new(AtomicUsize::new(0)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Build the service the configuration asks for
    ///
    /// A Google provider without an API key yields a disabled service; that
    /// is a supported mode, not an error.
    pub fn from_config(config: &TranslationConfig) -> Result<Self> {
        let provider: Arc<dyn TranslationProvider> = match config.provider {
            ConfigTranslationProvider::Mock => Arc::new(MockProvider::working()),
            ConfigTranslationProvider::Google => match config.get_api_key() {
                Some(api_key) => Arc::new(GoogleTranslate::new_with_config(
                    api_key,
                    config.endpoint.clone(),
                    config.source_language.clone(),
                    config.timeout_secs,
                    config.retry_count,
                    config.retry_backoff_ms,
                    config.rate_limit,
                )),
                None => {
                    warn!("No translation API key configured; running without machine translation");
                    return Ok(Self::disabled());
                }
            },
        };

        info!("Using {} for machine translation", config.provider.display_name());
        Ok(Self::new(provider, config.language_codes.clone()))
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self.backend, Backend::Configured(_))
    }

    /// Provider name, or `disabled`
    pub fn provider_name(&self) -> &str {
        match &self.backend {
            Backend::Disabled => "disabled",
            Backend::Configured(provider) => provider.name(),
        }
    }

    /// Code sent to the provider for a dictionary language
    pub fn provider_code(&self, language: &str) -> String {
        match self.language_codes.get(language) {
            Some(code) => code.clone(),
            None => language_utils::to_provider_code(language),
        }
    }

    /// Translate `text` into `language`
    ///
    /// Returns `None` when the service is disabled or the provider failed.
    /// Blank input comes back unchanged without a provider call.
    pub async fn translate(&self, text: &str, language: &str) -> Option<String> {
        let Backend::Configured(provider) = &self.backend else {
            return None;
        };

        if text.trim().is_empty() {
            return Some(text.to_string());
        }

        let code = self.provider_code(language);
        self.calls.fetch_add(1, Ordering::SeqCst);

        match provider.translate(text, &code).await {
            Ok(translated) if !translated.trim().is_empty() => {
                debug!("Translated {} chars into {}", text.chars().count(), code);
                Some(translated)
            }
            Ok(_) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                warn!("{} returned an empty translation into {}", provider.name(), code);
                None
            }
            Err(e) => {
                self.failures.fetch_add(1, Ordering::SeqCst);
                warn!("{} failed to translate into {}: {}", provider.name(), code, e);
                None
            }
        }
    }

    /// Provider calls that produced no usable result
    pub fn failure_count(&self) -> usize {
        self.failures.load(Ordering::SeqCst)
    }

    /// Provider calls made so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
