/*!
 * Pinyin romanization of Chinese text.
 *
 * The romanizer is a pure collaborator of the segmenter: it converts the exact
 * characters of a matched word into a phonetic transcription in the requested
 * tone notation. It keeps no state between calls.
 */

use anyhow::anyhow;
use pinyin::ToPinyin;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tone notation used when rendering pinyin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToneStyle {
    /// Diacritic tone marks, e.g. `zhōng`
    #[default]
    Marks,
    /// Numeric tone suffixes, e.g. `zhong1`
    Numbers,
    /// No tone information, e.g. `zhong`
    Plain,
}

impl fmt::Display for ToneStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Marks => "marks",
            Self::Numbers => "numbers",
            Self::Plain => "plain",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for ToneStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "marks" => Ok(Self::Marks),
            "numbers" => Ok(Self::Numbers),
            "plain" | "none" => Ok(Self::Plain),
            _ => Err(anyhow!("Invalid tone style: {}", s)),
        }
    }
}

/// Converts Chinese text into a phonetic transcription
pub trait Romanizer: Send + Sync {
    /// Romanize `text`, leaving characters without a reading untouched
    fn romanize(&self, text: &str, style: ToneStyle) -> String;
}

/// Romanizer backed by the `pinyin` crate's character readings
#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinRomanizer;

impl Romanizer for PinyinRomanizer {
    fn romanize(&self, text: &str, style: ToneStyle) -> String {
        let mut out = String::with_capacity(text.len() * 2);
        for c in text.chars() {
            match c.to_pinyin() {
                Some(reading) => out.push_str(match style {
                    ToneStyle::Marks => reading.with_tone(),
                    ToneStyle::Numbers => reading.with_tone_num_end(),
                    ToneStyle::Plain => reading.plain(),
                }),
                None => out.push(c),
            }
        }
        out
    }
}
