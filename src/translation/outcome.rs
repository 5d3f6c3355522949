/*!
 * Per-entry results of a reconciliation.
 */

use serde::Serialize;
use std::fmt;

/// Why an entry was not sent to the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The target already holds non-empty text
    AlreadyTranslated,
    /// The source text is empty or whitespace
    EmptySource,
    /// The source entry is marked `translatable="false"`
    NotTranslatable,
}

/// Why a candidate entry was left untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// No provider is configured
    Unavailable,
    /// The provider failed or returned nothing
    Provider(String),
}

/// Result of reconciling one source entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationOutcome {
    Success(String),
    Failure(FailureReason),
    Skipped(SkipReason),
}

impl TranslationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }
}

/// Outcome paired with the key it belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryOutcome {
    pub key: String,
    pub outcome: TranslationOutcome,
}

impl EntryOutcome {
    pub fn new(key: impl Into<String>, outcome: TranslationOutcome) -> Self {
        Self {
            key: key.into(),
            outcome,
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyTranslated => write!(f, "already translated"),
            Self::EmptySource => write!(f, "empty source"),
            Self::NotTranslatable => write!(f, "not translatable"),
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "translation unavailable"),
            Self::Provider(message) => write!(f, "provider failed: {}", message),
        }
    }
}
