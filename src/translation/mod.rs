/*!
 * Machine translation of missing dictionary entries.
 *
 * This module is split into several submodules:
 *
 * - `core`: the translation service wrapping an optional provider
 * - `merge`: diff and merge of a source dictionary into a target
 * - `outcome`: per-entry results
 * - `stats`: run counters
 */

// Re-export main types for easier usage
pub use self::core::TranslationService;
pub use self::merge::{MergeEngine, ReconcileOutcome};
pub use self::outcome::{EntryOutcome, FailureReason, SkipReason, TranslationOutcome};
pub use self::stats::RunStatistics;

// Submodules
pub mod core;
pub mod merge;
pub mod outcome;
pub mod stats;
