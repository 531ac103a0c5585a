use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::DictionaryError;

// @module: Dictionary records and loaders

// @const: CC-CEDICT line, e.g. `中國 中国 [Zhong1 guo2] /China/`
static CEDICT_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+\[([^\]]*)\]\s+/(.*)/\s*$").unwrap()
});

/// One sense of a headword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Traditional-script headword
    #[serde(default)]
    pub traditional: String,

    /// Simplified-script headword
    #[serde(default)]
    pub simplified: String,

    /// Reading as stored in the source data
    #[serde(default)]
    pub pinyin: String,

    /// English gloss
    pub english: String,
}

impl DictionaryEntry {
    pub fn new(traditional: &str, simplified: &str, pinyin: &str, english: &str) -> Self {
        Self {
            traditional: traditional.to_string(),
            simplified: simplified.to_string(),
            pinyin: pinyin.to_string(),
            english: english.to_string(),
        }
    }
}

/// Load all entries from a dictionary file
///
/// Files ending in `.json` hold an array of entries; anything else is read as
/// CC-CEDICT text.
pub fn load_entries(path: &Path) -> Result<Vec<DictionaryEntry>, DictionaryError> {
    if !path.exists() {
        return Err(DictionaryError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path).map_err(|e| DictionaryError::Unreadable {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("json"));

    let entries = if is_json {
        serde_json::from_str::<Vec<DictionaryEntry>>(&content).map_err(|e| {
            DictionaryError::Unreadable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?
    } else {
        parse_cedict(&content)
    };

    debug!("Loaded {} dictionary entries from {}", entries.len(), path.display());
    Ok(entries)
}

/// Parse CC-CEDICT formatted text
///
/// Each line carries `Traditional Simplified [pin1 yin1] /sense 1/sense 2/`.
/// The senses of one line are kept together as a single gloss.
pub fn parse_cedict(content: &str) -> Vec<DictionaryEntry> {
    let mut entries = Vec::new();
    let mut skipped = 0;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match CEDICT_LINE_REGEX.captures(line) {
            Some(caps) => {
                let senses: Vec<&str> = caps[4].split('/').filter(|s| !s.is_empty()).collect();
                entries.push(DictionaryEntry::new(&caps[1], &caps[2], &caps[3], &senses.join("; ")));
            }
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed dictionary lines", skipped);
    }

    entries
}
