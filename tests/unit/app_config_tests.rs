/*!
 * Tests for application configuration functionality
 */

use std::path::PathBuf;

use resfill::app_config::{parse_language_list, Config, LogLevel, TranslationProvider};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.res_dir, PathBuf::from("app/src/main/res"));
    assert_eq!(config.source_dir_name, "values");
    assert_eq!(config.languages, vec!["ja", "ko", "vi"]);
    assert_eq!(config.string_files, vec!["strings.xml", "archivetune_strings.xml"]);
    assert!(!config.create_missing_targets);
    assert!(!config.dry_run);
    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.concurrent_requests, 4);
    assert_eq!(config.translation.concurrent_files, 2);
    assert_eq!(config.translation.retry_count, 3);
    assert_eq!(config.translation.endpoint, "https://translation.googleapis.com");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_withoutApiKey_shouldBeDisabledButValid() {
    let mut config = Config::default();
    assert!(!config.translation.is_enabled());
    assert!(config.validate().is_ok());

    config.translation.api_key = Some("   ".to_string());
    assert!(!config.translation.is_enabled());

    config.translation.api_key = Some("AIza-test".to_string());
    assert!(config.translation.is_enabled());
    assert_eq!(config.translation.get_api_key(), Some("AIza-test"));

    config.translation.api_key = None;
    config.translation.provider = TranslationProvider::Mock;
    assert!(config.translation.is_enabled());
}

#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    config.languages = vec![" ".to_string()];
    assert!(config.validate().is_err());
    config.languages = vec!["ja".to_string()];

    config.string_files = vec!["../strings.xml".to_string()];
    assert!(config.validate().is_err());
    config.string_files = Vec::new();
    assert!(config.validate().is_ok());

    config.translation.concurrent_requests = 0;
    assert!(config.validate().is_err());
    config.translation.concurrent_requests = 1;

    config.translation.concurrent_files = 0;
    assert!(config.validate().is_err());
    config.translation.concurrent_files = 1;

    config.translation.provider = TranslationProvider::Mock;
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_target_languages_withDuplicates_shouldKeepFirstOccurrenceOrder() {
    let mut config = Config::default();
    config.languages = vec!["ko".into(), "ja".into(), " ko ".into(), "".into(), "vi".into()];
    assert_eq!(config.target_languages(), vec!["ko", "ja", "vi"]);
}

#[test]
fn test_directory_convention_shouldFollowAndroidLayout() {
    let mut config = Config::default();
    config.res_dir = PathBuf::from("res");
    assert_eq!(config.source_dir(), PathBuf::from("res/values"));
    assert_eq!(config.target_dir("zh-rCN"), PathBuf::from("res/values-zh-rCN"));
}

#[test]
fn test_load_withPartialJson_shouldFillDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "resfill.json",
        r#"{
            "languages": ["de", "fr"],
            "translation": { "provider": "mock", "language_codes": { "zh-rTW": "zh-TW" }, "rate_limit": 60 },
            "log_level": "debug"
        }"#,
    )
    .unwrap();

    let config = Config::load(&path).unwrap();
    assert_eq!(config.languages, vec!["de", "fr"]);
    assert_eq!(config.string_files, vec!["strings.xml", "archivetune_strings.xml"]);
    assert_eq!(config.translation.provider, TranslationProvider::Mock);
    assert_eq!(config.translation.language_codes.get("zh-rTW").map(String::as_str), Some("zh-TW"));
    assert_eq!(config.translation.rate_limit, Some(60));
    assert_eq!(config.translation.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Debug);
}

#[test]
fn test_load_withInvalidJson_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "resfill.json", "{ not json").unwrap();
    assert!(Config::load(&path).is_err());
    assert!(Config::load(&dir.path().join("missing.json")).is_err());
}

#[test]
fn test_load_or_default_withExplicitMissingPath_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let missing = dir.path().join("custom.json");

    let err = Config::load_or_default(Some(&missing)).unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_load_or_default_withExplicitPath_shouldLoadIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "custom.json", r#"{ "languages": ["fr"] }"#).unwrap();

    let config = Config::load_or_default(Some(&path)).unwrap();
    assert_eq!(config.languages, vec!["fr"]);
}

#[test]
fn test_provider_fromStr_shouldParseKnownProviders() {
    assert_eq!("google".parse::<TranslationProvider>().unwrap(), TranslationProvider::Google);
    assert_eq!("MOCK".parse::<TranslationProvider>().unwrap(), TranslationProvider::Mock);
    assert!("deepl".parse::<TranslationProvider>().is_err());
    assert_eq!(TranslationProvider::Google.to_string(), "google");
    assert_eq!(TranslationProvider::Google.display_name(), "Google Translate");
}

#[test]
fn test_parse_language_list_shouldTrimAndDropBlanks() {
    assert_eq!(parse_language_list("ja, ko,,vi "), vec!["ja", "ko", "vi"]);
    assert!(parse_language_list("").is_empty());
    assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
}
