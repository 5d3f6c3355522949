/*!
 * # resfill - machine translation fallback for Android string resources
 *
 * A Rust library that keeps per-language Android string dictionaries in sync
 * with the default language and fills untranslated entries with machine
 * translations.
 *
 * ## Features
 *
 * - Parse `<string>` and `<plurals>` resources into ordered dictionaries
 * - Fill only missing or empty entries; human translations are never touched
 * - Mark machine output with an `<!-- MT fallback -->` comment
 * - Preserve every untouched byte of the target file
 * - Google Cloud Translation v2 with retries, backoff and rate limiting
 * - Run without a credential to report gaps only
 * - Android locale qualifiers (`zh-rCN`, `b+sr+Latn`) mapped to provider codes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `resources`: Dictionary model, parser, writer and validator
 * - `translation`: Translation service and the diff/merge engine
 * - `providers`: Client implementations for translation services
 * - `app_controller`: Orchestrates jobs over languages and files
 * - `report`: Run report and exit decision
 * - `file_utils`: File system operations
 * - `language_utils`: Android locale qualifier utilities
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod report;
pub mod resources;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{ParseError, ProviderError, ValidationError, WriteError};
pub use language_utils::{get_language_name, normalize_to_part2t, to_provider_code};
pub use report::{JobStatus, RunReport};
pub use resources::{DictionaryEntry, EntryKind, ResourceDictionary};
pub use translation::{MergeEngine, RunStatistics, TranslationOutcome, TranslationService};
