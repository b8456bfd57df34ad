/*!
 * Language code handling.
 *
 * Destination folders are named after the codes given to the translation
 * engine, which may carry a regional variant ("en-gb", "pt-BR", "zh-hans").
 * Only the primary subtag is checked against ISO 639.
 */

use anyhow::{Result, anyhow};
use isolang::Language;

/// Primary subtag of a language code, lowercased
pub fn primary_subtag(code: &str) -> String {
    code.trim()
        .split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_lowercase()
}

/// Validate a language code (ISO 639-1 or ISO 639-3 primary subtag)
pub fn validate_language_code(code: &str) -> Result<()> {
    let primary = primary_subtag(code);

    let known = match primary.len() {
        2 => Language::from_639_1(&primary).is_some(),
        3 => Language::from_639_3(&primary).is_some(),
        _ => false,
    };

    if known {
        Ok(())
    } else {
        Err(anyhow!("Invalid language code: {}", code))
    }
}

/// Check if a path segment names one of the given language codes
///
/// Comparison is case-insensitive on the full code, so "FR" matches "fr" and
/// "pt-br" matches "PT-BR".
pub fn is_language_segment(segment: &str, languages: &[String]) -> bool {
    languages.iter().any(|language| language.eq_ignore_ascii_case(segment))
}

/// Code sent to the translation engine, which expects upper case
pub fn engine_code(code: &str) -> String {
    code.trim().replace('_', "-").to_uppercase()
}
