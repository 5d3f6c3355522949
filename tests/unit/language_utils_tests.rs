/*!
 * Tests for Android locale qualifier utilities
 */

use resfill::language_utils::{
    get_language_name, normalize_to_part2t, parse_qualifier, to_provider_code, validate_language_code,
    values_dir_name, LanguageCodeType,
};

#[test]
fn test_validate_language_code_withValidCodes_shouldReturnType() {
    assert_eq!(validate_language_code("ja").unwrap(), LanguageCodeType::Part1);
    assert_eq!(validate_language_code("kor").unwrap(), LanguageCodeType::Part2T);
    assert_eq!(validate_language_code("fre").unwrap(), LanguageCodeType::Part2B);
    assert_eq!(validate_language_code("in").unwrap(), LanguageCodeType::Part1);
    assert!(validate_language_code("xx").is_err());
    assert!(validate_language_code("").is_err());
}

#[test]
fn test_normalize_to_part2t_shouldReturnThreeLetterCodes() {
    assert_eq!(normalize_to_part2t("ja").unwrap(), "jpn");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert_eq!(normalize_to_part2t("iw").unwrap(), "heb");
    assert!(normalize_to_part2t("zz").is_err());
}

#[test]
fn test_parse_qualifier_withLegacyRegion_shouldSplitParts() {
    let q = parse_qualifier("zh-rCN").unwrap();
    assert_eq!(q.language, "zh");
    assert_eq!(q.script, None);
    assert_eq!(q.region.as_deref(), Some("CN"));

    let q = parse_qualifier("es-r419").unwrap();
    assert_eq!(q.region.as_deref(), Some("419"));
}

#[test]
fn test_parse_qualifier_withBcp47Form_shouldReadScript() {
    let q = parse_qualifier("b+sr+latn").unwrap();
    assert_eq!(q.language, "sr");
    assert_eq!(q.script.as_deref(), Some("Latn"));
    assert_eq!(q.region, None);
    assert!(parse_qualifier("values-ja").is_err());
}

#[test]
fn test_to_provider_code_shouldProduceBcp47Codes() {
    assert_eq!(to_provider_code("ja"), "ja");
    assert_eq!(to_provider_code("zh-rCN"), "zh-CN");
    assert_eq!(to_provider_code("pt-rBR"), "pt-BR");
    assert_eq!(to_provider_code("b+sr+Latn"), "sr-Latn");
    assert_eq!(to_provider_code("in"), "id");
    assert_eq!(to_provider_code("weird_code"), "weird_code");
}

#[test]
fn test_get_language_name_shouldAcceptQualifiers() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(get_language_name("ko-rKR").unwrap(), "Korean");
    assert_eq!(get_language_name("vie").unwrap(), "Vietnamese");
    assert_eq!(values_dir_name("vi"), "values-vi");
}
