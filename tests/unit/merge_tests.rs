/*!
 * Tests for the diff and merge engine
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use resfill::providers::mock::MockProvider;
use resfill::resources::DictionaryEntry;
use resfill::translation::{
    FailureReason, MergeEngine, RunStatistics, SkipReason, TranslationOutcome, TranslationService,
};

use crate::common;
use crate::common::mock_providers::FixedProvider;

fn outcome_for<'a>(outcomes: &'a [resfill::translation::EntryOutcome], key: &str) -> &'a TranslationOutcome {
    &outcomes
        .iter()
        .find(|o| o.key == key)
        .unwrap_or_else(|| panic!("no outcome for {}", key))
        .outcome
}

/// Scenario A: a key missing from the target is filled
#[tokio::test]
async fn test_reconcile_withMissingSimpleKey_shouldFillWithMarker() {
    let provider = MockProvider::working();
    let service = common::service_with(&provider);
    let source = common::parse(&common::resources("    <string name=\"app_name\">ArchiveTune</string>\n"), "values");
    let target = common::parse(&common::resources(""), "ja");

    let result = MergeEngine::new(4).reconcile(&source, target, "ja", &service).await;

    let entry = result.dictionary.get("app_name").unwrap();
    assert_eq!(entry.text, "ja:ArchiveTune");
    assert!(entry.machine_translated);
    assert!(result.modified);
    assert_eq!(result.stats.mt_added, 1);
    assert_eq!(result.stats.total_processed, 1);
    assert_eq!(result.outcomes[0].outcome, TranslationOutcome::Success("ja:ArchiveTune".to_string()));
}

/// Scenario B: variants are judged one by one
#[tokio::test]
async fn test_reconcile_withPartiallyTranslatedGroup_shouldFillOnlyMissingVariant() {
    let provider = MockProvider::working();
    let service = common::service_with(&provider);
    let source = common::parse(
        &common::resources(
            "    <plurals name=\"days\">\n        <item quantity=\"one\">%d day</item>\n        <item quantity=\"few\">%d days</item>\n    </plurals>\n",
        ),
        "values",
    );
    let target = common::parse(
        &common::resources("    <plurals name=\"days\">\n        <item quantity=\"one\">%d日</item>\n    </plurals>\n"),
        "ja",
    );

    let result = MergeEngine::new(4).reconcile(&source, target, "ja", &service).await;

    assert_eq!(result.dictionary.get("days_one").unwrap().text, "%d日");
    assert!(!result.dictionary.get("days_one").unwrap().machine_translated);
    assert_eq!(result.dictionary.get("days_few").unwrap().text, "ja:%d days");
    assert_eq!(result.stats.skipped, 1);
    assert_eq!(result.stats.mt_added, 1);
    assert_eq!(
        *outcome_for(&result.outcomes, "days_one"),
        TranslationOutcome::Skipped(SkipReason::AlreadyTranslated)
    );
    assert_eq!(provider.requests(), vec![("%d days".to_string(), "ja".to_string())]);
}

/// Scenario C: a provider failure leaves the entry alone and is counted
#[tokio::test]
async fn test_reconcile_withProviderFailure_shouldCountErrorAndKeepTargetUntouched() {
    let provider = MockProvider::failing_on(["Something went wrong"]);
    let service = common::service_with(&provider);
    let source = common::parse(
        &common::resources(
            "    <string name=\"app_name\">ArchiveTune</string>\n    <string name=\"error_message\">Something went wrong</string>\n",
        ),
        "values",
    );
    let target = common::parse(&common::resources(""), "ko");

    let result = MergeEngine::new(2).reconcile(&source, target, "ko", &service).await;

    assert!(!result.dictionary.contains_key("error_message"));
    assert_eq!(result.stats.errors, 1);
    assert_eq!(result.stats.mt_added, 1);
    assert!(result.modified);
    assert!(matches!(
        outcome_for(&result.outcomes, "error_message"),
        TranslationOutcome::Failure(FailureReason::Provider(_))
    ));
    assert_eq!(service.failure_count(), 1);
}

#[tokio::test]
async fn test_reconcile_withOnlyFailures_shouldNotBeModified() {
    let service = common::service_with(&MockProvider::failing());
    let source = common::parse(&common::resources("    <string name=\"error_message\">Oops</string>\n"), "values");
    let target = common::parse(&common::resources(""), "vi");

    let result = MergeEngine::new(2).reconcile(&source, target, "vi", &service).await;

    assert!(!result.modified);
    assert_eq!(result.stats, RunStatistics { total_processed: 1, mt_added: 0, skipped: 0, errors: 1 });
    assert_eq!(result.dictionary.len(), 0);
}

/// Scenario D: nothing to do, no provider calls
#[tokio::test]
async fn test_reconcile_withFullyTranslatedTarget_shouldMakeNoCalls() {
    let provider = MockProvider::working();
    let service = common::service_with(&provider);
    let source = common::parse(common::SOURCE_STRINGS, "values");
    let target = common::parse(
        &common::resources(
            "    <string name=\"app_name\">アーカイブ</string>\n    <string name=\"error_message\">エラー</string>\n    <plurals name=\"days\">\n        <item quantity=\"one\">%d日</item>\n        <item quantity=\"few\">%d日間</item>\n    </plurals>\n",
        ),
        "ja",
    );

    let result = MergeEngine::new(4).reconcile(&source, target, "ja", &service).await;

    assert_eq!(provider.request_count(), 0);
    assert!(!result.modified);
    assert_eq!(result.stats.skipped, 4);
    assert_eq!(result.stats.total_processed, 0);
    assert_eq!(
        *outcome_for(&result.outcomes, "brand"),
        TranslationOutcome::Skipped(SkipReason::NotTranslatable)
    );
}

#[tokio::test]
async fn test_reconcile_withHumanTextAndMarkerlessEmptyEntry_shouldOnlyFillEmpty() {
    let service = common::service_with(&MockProvider::working());
    let source = common::parse(
        &common::resources("    <string name=\"a\">A</string>\n    <string name=\"b\">B</string>\n"),
        "values",
    );
    let target = common::parse(
        &common::resources("    <string name=\"a\">human</string>\n    <string name=\"b\">   </string>\n    <string name=\"only_here\">x</string>\n"),
        "ja",
    );

    let result = MergeEngine::new(1).reconcile(&source, target, "ja", &service).await;

    assert_eq!(result.dictionary.get("a").unwrap().text, "human");
    assert_eq!(result.dictionary.get("b").unwrap().text, "ja:B");
    assert_eq!(result.dictionary.get("only_here").unwrap().text, "x");
    let keys: Vec<&str> = result.dictionary.keys().collect();
    assert_eq!(keys, vec!["a", "b", "only_here"]);
}

#[tokio::test]
async fn test_reconcile_withDisabledService_shouldReportUnavailableWithoutErrors() {
    let service = TranslationService::disabled();
    let source = common::parse(common::SOURCE_STRINGS, "values");
    let target = common::parse(&common::resources(""), "ja");

    let result = MergeEngine::new(4).reconcile(&source, target, "ja", &service).await;

    assert!(!result.modified);
    assert_eq!(result.stats.total_processed, 4);
    assert_eq!(result.stats.errors, 0);
    assert_eq!(result.stats.mt_added, 0);
    assert_eq!(
        *outcome_for(&result.outcomes, "app_name"),
        TranslationOutcome::Failure(FailureReason::Unavailable)
    );
}

#[tokio::test]
async fn test_reconcile_withMappedLanguage_shouldSendProviderCode() {
    let provider = MockProvider::working();
    let mut codes = BTreeMap::new();
    codes.insert("zh-rTW".to_string(), "zh-TW".to_string());
    let service = TranslationService::new(Arc::new(provider.clone()), codes);
    let source = common::parse(&common::resources("    <string name=\"a\">Hi</string>\n"), "values");

    let result = MergeEngine::new(1)
        .reconcile(&source, common::parse(&common::resources(""), "zh-rTW"), "zh-rTW", &service)
        .await;

    assert_eq!(result.dictionary.get("a").unwrap().text, "zh-TW:Hi");
}

#[tokio::test]
async fn test_reconcile_withBlankProviderAnswer_shouldNotBlankOverwrite() {
    let provider = FixedProvider::new("   ");
    let service = TranslationService::new(Arc::new(provider.clone()), BTreeMap::new());
    let source = common::parse(&common::resources("    <string name=\"a\">Hi</string>\n"), "values");
    let target = common::parse(&common::resources("    <string name=\"a\"></string>\n"), "ja");

    let result = MergeEngine::new(1).reconcile(&source, target, "ja", &service).await;

    assert_eq!(provider.calls(), 1);
    assert_eq!(result.stats.errors, 1);
    assert!(!result.dictionary.get("a").unwrap().machine_translated);
}

#[test]
fn test_reconcile_onBlockingRuntime_shouldMatchAsyncResult() {
    let service = common::service_with(&MockProvider::working());
    let mut source = resfill::ResourceDictionary::new("values", "values/strings.xml");
    source.insert(DictionaryEntry::simple("k", "v")).unwrap();
    let target = resfill::ResourceDictionary::new("vi", "values-vi/strings.xml");

    let result = tokio_test::block_on(MergeEngine::default().reconcile(&source, target, "vi", &service));
    assert_eq!(result.dictionary.get("k").unwrap().text, "vi:v");
}
