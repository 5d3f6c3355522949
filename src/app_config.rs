use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::language_utils;

/// Application configuration module
///
/// This module handles loading, validating and defaulting the run settings.
/// Every field has a default, so an empty JSON object is a valid config file
/// and the tool runs with no file at all.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Android `res/` directory holding `values/` and `values-*/`
    #[serde(default = "default_res_dir")]
    pub res_dir: PathBuf,

    /// Name of the source language directory inside `res_dir`
    #[serde(default = "default_source_dir_name")]
    pub source_dir_name: String,

    /// Target language qualifiers (`ja`, `zh-rCN`, `b+sr+Latn`)
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Dictionary file names; empty means discover every resource file
    #[serde(default = "default_string_files")]
    pub string_files: Vec<String>,

    /// Start from an empty dictionary when a target file is missing
    #[serde(default)]
    pub create_missing_targets: bool,

    /// Do everything except writing files
    #[serde(default)]
    pub dry_run: bool,

    /// Translation config
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google Cloud Translation v2
    #[default]
    Google,
    // @provider: Deterministic in-process provider
    Mock,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google Translate",
            Self::Mock => "Mock",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::Mock => "mock".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "mock" => Ok(Self::Mock),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// API key; absent means disabled mode for providers that need one
    #[serde(default)]
    pub api_key: Option<String>,

    /// Service endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Source language sent to the provider; auto-detected when absent
    #[serde(default)]
    pub source_language: Option<String>,

    /// Explicit qualifier → provider code overrides, e.g. `"zh-rTW": "zh-TW"`
    #[serde(default)]
    pub language_codes: BTreeMap<String, String>,

    /// Maximum number of concurrent provider calls per file
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    /// Maximum number of files processed at once
    #[serde(default = "default_concurrent_files")]
    pub concurrent_files: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Rate limit in requests per minute; None or 0 disables spacing
    #[serde(default)]
    pub rate_limit: Option<u32>,
}

impl TranslationConfig {
    /// The API key, if one is set and non-blank
    pub fn get_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Whether the configured provider can actually be called
    pub fn is_enabled(&self) -> bool {
        match self.provider {
            TranslationProvider::Google => self.get_api_key().is_some(),
            TranslationProvider::Mock => true,
        }
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            api_key: None,
            endpoint: default_endpoint(),
            source_language: None,
            language_codes: BTreeMap::new(),
            concurrent_requests: default_concurrent_requests(),
            concurrent_files: default_concurrent_files(),
            timeout_secs: default_timeout_secs(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit: None,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(anyhow!("Invalid log level: {}", s)),
        }
    }
}

fn default_res_dir() -> PathBuf {
    PathBuf::from("app/src/main/res")
}

fn default_source_dir_name() -> String {
    "values".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["ja".to_string(), "ko".to_string(), "vi".to_string()]
}

fn default_string_files() -> Vec<String> {
    vec!["strings.xml".to_string(), "archivetune_strings.xml".to_string()]
}

fn default_endpoint() -> String {
    crate::providers::google::DEFAULT_ENDPOINT.to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_concurrent_files() -> usize {
    2
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // doubled on each retry
}

/// Split a comma-separated language list, dropping blanks
pub fn parse_language_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Config file read from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "resfill.json";

impl Config {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load the config file the user asked for, or the default one if present
    ///
    /// An explicit path that does not exist is an error; a missing default
    /// file means built-in defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => {
                Err(anyhow!("Config file not found: {}", path.display()))
            }
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Source directory, e.g. `res/values`
    pub fn source_dir(&self) -> PathBuf {
        self.res_dir.join(&self.source_dir_name)
    }

    /// Target directory for a qualifier, e.g. `res/values-ja`
    pub fn target_dir(&self, language: &str) -> PathBuf {
        self.res_dir.join(language_utils::values_dir_name(language))
    }

    /// Languages in configured order with duplicates removed
    pub fn target_languages(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.languages
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty() && seen.insert(l.clone()))
            .collect()
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.target_languages().is_empty() {
            return Err(anyhow!("At least one target language is required"));
        }

        for language in self.target_languages() {
            if language == self.source_dir_name || language_utils::values_dir_name(&language) == self.source_dir_name {
                return Err(anyhow!("Target language '{}' points at the source directory", language));
            }
            if language.contains('/') || language.contains('\\') {
                return Err(anyhow!("Invalid language qualifier: {}", language));
            }
        }

        for file in &self.string_files {
            if file.trim().is_empty() || file.contains('/') || file.contains('\\') {
                return Err(anyhow!("Invalid dictionary file name: '{}'", file));
            }
        }

        if self.translation.concurrent_requests == 0 {
            return Err(anyhow!("concurrent_requests must be at least 1"));
        }
        if self.translation.concurrent_files == 0 {
            return Err(anyhow!("concurrent_files must be at least 1"));
        }

        if self.translation.is_enabled() {
            url::Url::parse(&self.translation.endpoint)
                .with_context(|| format!("Invalid translation endpoint: {}", self.translation.endpoint))?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            res_dir: default_res_dir(),
            source_dir_name: default_source_dir_name(),
            languages: default_languages(),
            string_files: default_string_files(),
            create_missing_targets: false,
            dry_run: false,
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
