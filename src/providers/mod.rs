/*!
 * Provider implementations for machine translation services.
 *
 * This module contains client implementations for the supported services:
 * - Google: Google Cloud Translation v2 REST API
 * - Mock: deterministic in-process provider for tests and dry runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// Implementations translate one text at a time into a provider-specific
/// language code. Retries, rate limiting and timeouts are the provider's own
/// business; callers only see the final result.
#[async_trait]
pub trait TranslationProvider: Send + Sync + Debug {
    /// Translate `text` into `target_code`
    ///
    /// # Arguments
    /// * `text` - Plain source text
    /// * `target_code` - Provider language code such as `ja` or `zh-CN`
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, target_code: &str) -> Result<String, ProviderError>;

    /// Short provider name for logs and reports
    fn name(&self) -> &str;
}

pub mod google;
pub mod mock;
