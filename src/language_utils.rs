//! Language utilities
//!
//! This module resolves user supplied languages (ISO 639-1 / 639-2 codes or
//! English names such as `Chinese`, the form whisper expects) and detects
//! Chinese script in text.

use anyhow::{Result, anyhow};
use isolang::Language;

/// First code point of the CJK Unified Ideographs block
const HAN_START: char = '\u{4e00}';

/// Last code point of the CJK Unified Ideographs block
const HAN_END: char = '\u{9fff}';

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    match code {
        "chi" => Some("zho"),
        "fre" => Some("fra"),
        "ger" => Some("deu"),
        "dut" => Some("nld"),
        "gre" => Some("ell"),
        "cze" => Some("ces"),
        "per" => Some("fas"),
        "rum" => Some("ron"),
        "slo" => Some("slk"),
        "wel" => Some("cym"),
        _ => None,
    }
}

/// Resolve a language from an ISO code or an English language name
pub fn resolve_language(input: &str) -> Result<Language> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(anyhow!("Language must not be empty"));
    }

    let by_code = match normalized.len() {
        2 => Language::from_639_1(&normalized),
        3 => Language::from_639_3(part2b_to_part2t(&normalized).unwrap_or(normalized.as_str())),
        _ => None,
    };
    if let Some(lang) = by_code {
        return Ok(lang);
    }

    // English names are stored capitalized ("Chinese", "Mandarin Chinese")
    let capitalized = normalized
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    Language::from_name(&capitalized).ok_or_else(|| anyhow!("Unknown language: {}", input))
}

/// English name of a language, as passed to the speech-to-text engine
pub fn get_language_name(input: &str) -> Result<String> {
    Ok(resolve_language(input)?.to_name().to_string())
}

/// Whether the language is Chinese (macrolanguage or Mandarin)
pub fn is_chinese_language(input: &str) -> bool {
    matches!(resolve_language(input), Ok(Language::Zho) | Ok(Language::Cmn))
}

/// Whether a character belongs to the CJK Unified Ideographs block
pub fn is_han(c: char) -> bool {
    (HAN_START..=HAN_END).contains(&c)
}

/// Whether the text contains at least one Chinese character
pub fn contains_han(text: &str) -> bool {
    text.chars().any(is_han)
}
