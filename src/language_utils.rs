use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for game locale tags
///
/// Game localization tables name their columns with locale tags such as
/// `fr`, `pt-BR` or `zh_CN`. Only the primary subtag is checked against
/// ISO 639-1 (2-letter) and ISO 639-2 (3-letter) codes; the region is kept as-is.
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

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: [(&str, &str); 18] = [
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn bibliographic_to_terminologic(code: &str) -> Option<&'static str> {
    BIBLIOGRAPHIC_CODES
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Split a locale tag into its lowercase primary subtag and optional region
///
/// Both `-` and `_` are accepted as separators.
pub fn split_locale(tag: &str) -> (String, Option<String>) {
    let trimmed = tag.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, region)) if !region.is_empty() => {
            (primary.to_lowercase(), Some(region.to_string()))
        }
        Some((primary, _)) => (primary.to_lowercase(), None),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Validate the primary subtag of a locale tag
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let (primary, _) = split_locale(code);

    if primary.len() == 2 && Language::from_639_1(&primary).is_some() {
        return Ok(LanguageCodeType::Part1);
    }

    if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if bibliographic_to_terminologic(&primary).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize the primary subtag of a locale tag to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (primary, _) = split_locale(code);

    if primary.len() == 2 {
        if let Some(lang) = Language::from_639_1(&primary) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if primary.len() == 3 {
        if Language::from_639_3(&primary).is_some() {
            return Ok(primary);
        }
        if let Some(part2t) = bibliographic_to_terminologic(&primary) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two locale tags name the same language and region
///
/// `fr` and `fra` match, `pt-BR` and `pt_br` match, `pt-BR` and `pt-PT` do not.
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    let (Ok(lang1), Ok(lang2)) = (normalize_to_part2t(code1), normalize_to_part2t(code2)) else {
        return false;
    };

    let region1 = split_locale(code1).1.map(|r| r.to_lowercase());
    let region2 = split_locale(code2).1.map(|r| r.to_lowercase());

    lang1 == lang2 && region1 == region2
}

/// Get a display name for a locale tag, e.g. `Portuguese (BR)` for `pt-BR`
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(match split_locale(code).1 {
        Some(region) => format!("{} ({})", lang.to_name(), region.to_uppercase()),
        None => lang.to_name().to_string(),
    })
}
