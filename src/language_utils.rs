//! Language utilities for Android resource qualifiers
//!
//! Android names per-language resource directories with a qualifier
//! (`values-ja`, `values-zh-rCN`, `values-b+sr+Latn`). This module parses those
//! qualifiers, validates their primary language subtag against ISO 639 and
//! converts them to the BCP-47 style codes translation services expect.

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// Parsed Android locale qualifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleQualifier {
    /// Primary language subtag, lowercase
    pub language: String,
    /// Optional four-letter script subtag (only reachable through `b+` qualifiers)
    pub script: Option<String>,
    /// Optional region subtag (two letters or three digits)
    pub region: Option<String>,
}

// values-ja, values-zh-rCN, values-es-r419
static LEGACY_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z]{2,3})(?:-r([A-Za-z]{2}|[0-9]{3}))?$").expect("valid qualifier regex")
});

// values-b+sr+Latn, values-b+es+419
static BCP47_QUALIFIER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^b\+([A-Za-z]{2,3})(?:\+([A-Za-z]{4}))?(?:\+([A-Za-z]{2}|[0-9]{3}))?$")
        .expect("valid bcp47 qualifier regex")
});

/// Android still emits the pre-1989 codes for a handful of languages
fn modern_code(code: &str) -> &str {
    match code {
        "in" => "id",
        "iw" => "he",
        "ji" => "yi",
        other => other,
    }
}

/// ISO 639-2/B codes that differ from their 639-2/T form
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "chi" => Some("zho"),
        "cze" => Some("ces"),
        "ice" => Some("isl"),
        "alb" => Some("sqi"),
        "arm" => Some("hye"),
        "baq" => Some("eus"),
        "bur" => Some("mya"),
        "per" => Some("fas"),
        "geo" => Some("kat"),
        "may" => Some("msa"),
        "mac" => Some("mkd"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = code.trim().to_lowercase();
    let normalized_code = modern_code(&normalized_code);

    if normalized_code.len() == 2 {
        if Language::from_639_1(normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if part2b_to_part2t(normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();
    let normalized_code = modern_code(&normalized_code);

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(normalized_code).is_some() {
            return Ok(normalized_code.to_string());
        }
        if let Some(part2t) = part2b_to_part2t(normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English language name from a code or qualifier
pub fn get_language_name(code: &str) -> Result<String> {
    let qualifier = parse_qualifier(code)?;
    let normalized = normalize_to_part2t(&qualifier.language)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Parse an Android resource qualifier such as `ja`, `zh-rCN` or `b+sr+Latn`
pub fn parse_qualifier(qualifier: &str) -> Result<LocaleQualifier> {
    let trimmed = qualifier.trim();

    let (language, script, region) = if let Some(caps) = BCP47_QUALIFIER.captures(trimmed) {
        (
            caps[1].to_string(),
            caps.get(2).map(|m| m.as_str().to_string()),
            caps.get(3).map(|m| m.as_str().to_string()),
        )
    } else if let Some(caps) = LEGACY_QUALIFIER.captures(trimmed) {
        (caps[1].to_string(), None, caps.get(2).map(|m| m.as_str().to_string()))
    } else {
        return Err(anyhow!("Invalid Android locale qualifier: {}", qualifier));
    };

    validate_language_code(&language)?;

    Ok(LocaleQualifier {
        language: language.to_lowercase(),
        script: script.map(|s| {
            let mut chars = s.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_lowercase(),
                None => s,
            }
        }),
        region: region.map(|r| r.to_uppercase()),
    })
}

/// Convert a qualifier into the BCP-47 code a translation service expects
///
/// Plain codes pass through unchanged; anything that does not parse as a
/// qualifier is returned as given so the service can decide.
pub fn to_provider_code(qualifier: &str) -> String {
    match parse_qualifier(qualifier) {
        Ok(parsed) => {
            let mut code = modern_code(&parsed.language).to_string();
            if let Some(script) = parsed.script {
                code.push('-');
                code.push_str(&script);
            }
            if let Some(region) = parsed.region {
                code.push('-');
                code.push_str(&region);
            }
            code
        }
        Err(_) => qualifier.trim().to_string(),
    }
}

/// Directory name holding the resources for a qualifier, e.g. `values-ja`
pub fn values_dir_name(qualifier: &str) -> String {
    format!("values-{}", qualifier.trim())
}
