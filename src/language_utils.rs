use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for vendor language tag handling
///
/// The translation API identifies languages by region-qualified tags
/// (`hi-IN`, `ta-IN`, ...). This module validates and normalizes user input
/// into those tags and resolves human-readable names.
/// Language code accepted as a source when the language should be detected
pub const AUTO_DETECT: &str = "auto";

/// Two-letter prefixes of the languages the API supports
const SUPPORTED_PREFIXES: &[&str] = &[
    "en", "hi", "bn", "te", "mr", "ta", "gu", "kn", "ml", "od", "pa",
];

/// Normalize a language code to the vendor tag format (`xx-IN`)
///
/// Accepts bare ISO 639-1 codes, tags with any region suffix, and `or` as an
/// alias for Odia.
pub fn normalize_language_code(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase().replace('_', "-");
    let prefix = normalized_code
        .split('-')
        .next()
        .unwrap_or_default();

    // The vendor spells Odia as "od"
    let prefix = if prefix == "or" { "od" } else { prefix };

    if SUPPORTED_PREFIXES.contains(&prefix) {
        return Ok(format!("{}-IN", prefix));
    }

    Err(anyhow!("Unsupported language code: {}", code))
}

/// Normalize a source language code, which may also be `auto`
pub fn normalize_source_code(code: &str) -> Result<String> {
    if code.trim().eq_ignore_ascii_case(AUTO_DETECT) {
        return Ok(AUTO_DETECT.to_string());
    }
    normalize_language_code(code)
}

/// Validate a language code, returning the normalized vendor tag
pub fn validate_language_code(code: &str) -> Result<String> {
    normalize_language_code(code)
}

/// Check whether a code requests automatic language detection
pub fn is_auto(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// Language a transcript should be translated from
///
/// A fixed source language always wins. With `auto`, the language the
/// recognizer detected is used when it is a known tag, otherwise `auto`.
pub fn resolve_source_code(configured: &str, detected: Option<&str>) -> String {
    if !is_auto(configured) {
        return configured.to_string();
    }
    detected
        .and_then(|code| normalize_language_code(code).ok())
        .unwrap_or_else(|| configured.to_string())
}

/// Short form of a vendor tag, used in output file names (`hi-IN` -> `hi`)
pub fn short_code(code: &str) -> String {
    code.split('-').next().unwrap_or(code).to_lowercase()
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_language_code(code1), normalize_language_code(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    if is_auto(code) {
        return Ok("Auto-detect".to_string());
    }
    let tag = normalize_language_code(code)?;
    let iso = match short_code(&tag).as_str() {
        "od" => "or".to_string(),
        other => other.to_string(),
    };
    let lang = Language::from_639_1(&iso)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", tag))?;

    Ok(lang.to_name().to_string())
}

/// All supported vendor tags, in display order
pub fn supported_languages() -> Vec<String> {
    SUPPORTED_PREFIXES
        .iter()
        .map(|prefix| format!("{}-IN", prefix))
        .collect()
}
