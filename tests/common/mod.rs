/*!
 * Common test utilities for the resfill test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use resfill::app_config::Config;
use resfill::providers::mock::MockProvider;
use resfill::resources::{parser, ResourceDictionary};
use resfill::translation::TranslationService;


/// Source dictionary used by most end-to-end tests
pub const SOURCE_STRINGS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<resources>
    <string name="app_name">ArchiveTune</string>
    <string name="error_message">Something went wrong</string>
    <string name="brand" translatable="false">ArchiveTune</string>
    <plurals name="days">
        <item quantity="one">%d day</item>
        <item quantity="few">%d days</item>
    </plurals>
</resources>
"#;

/// Initialise env_logger once so `RUST_LOG=debug cargo test` shows library logs
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content, creating parent directories
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Lay out `res/values/<file>` and `res/values-<lang>/<file>` under a temp dir
///
/// Returns the temp dir guard and the `res` path.
pub fn create_res_tree(source: &str, targets: &[(&str, Option<&str>)], file: &str) -> Result<(TempDir, PathBuf)> {
    let dir = create_temp_dir()?;
    let res = dir.path().join("res");
    create_test_file(&res.join("values"), file, source)?;
    for (language, content) in targets {
        let target_dir = res.join(format!("values-{}", language));
        fs::create_dir_all(&target_dir)?;
        if let Some(content) = content {
            create_test_file(&target_dir, file, content)?;
        }
    }
    Ok((dir, res))
}

/// Config pointing at a test res tree with the mock provider
pub fn test_config(res: &Path, languages: &[&str], files: &[&str]) -> Config {
    let mut config = Config::default();
    config.res_dir = res.to_path_buf();
    config.languages = languages.iter().map(|l| l.to_string()).collect();
    config.string_files = files.iter().map(|f| f.to_string()).collect();
    config.translation.provider = resfill::app_config::TranslationProvider::Mock;
    config
}

/// Service wrapping a clone of `provider` so the test keeps the original
pub fn service_with(provider: &MockProvider) -> TranslationService {
    TranslationService::new(Arc::new(provider.clone()), BTreeMap::new())
}

/// Parse dictionary text with a dummy path
pub fn parse(text: &str, language: &str) -> ResourceDictionary {
    parser::parse_str(text, Path::new("strings.xml"), language).expect("fixture should parse")
}

/// Wrap string entries in a `<resources>` document
pub fn resources(body: &str) -> String {
    format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n{}</resources>\n", body)
}
