//! Application configuration
//!
//! Settings are loaded from a JSON file, overridden from the command line and
//! validated once before any work starts.

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::PathBuf;

use crate::dictionary::DEFAULT_MAX_WORD_LENGTH;
use crate::errors::DictionaryError;
use crate::language_utils;
use crate::romanizer::ToneStyle;
use crate::subtitle_processor::ParseMode;
use crate::transcriber::WhisperTask;

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Spoken language of the media (whisper language name or ISO code)
    #[serde(default = "default_language")]
    pub language: String,

    /// Speech-to-text settings
    #[serde(default)]
    pub whisper: WhisperConfig,

    /// Tasks run on every media file, in order
    #[serde(default)]
    pub tasks: Vec<WhisperTask>,

    /// Dictionary data file (JSON or CC-CEDICT)
    #[serde(default)]
    pub dictionary_path: Option<PathBuf>,

    /// Longest word tried by the segmenter, in characters
    #[serde(default = "default_max_word_length")]
    pub max_word_length: usize,

    /// Which derived files to write
    #[serde(default)]
    pub outputs: OutputConfig,

    /// Tone notation of the pinyin subtitle track
    #[serde(default = "default_subtitle_tone_style")]
    pub subtitle_tone_style: ToneStyle,

    /// Tone notation of definition files and flashcards
    #[serde(default = "default_definition_tone_style")]
    pub definition_tone_style: ToneStyle,

    /// How strictly subtitle files are parsed
    #[serde(default)]
    pub parse_mode: ParseMode,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Speech-to-text engine configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WhisperConfig {
    /// Model name (e.g., "small", "medium")
    #[serde(default = "default_whisper_model")]
    pub model: String,

    /// Executable name or path
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Maximum duration of one run in seconds
    #[serde(default = "default_whisper_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        Self {
            model: default_whisper_model(),
            binary: default_whisper_binary(),
            timeout_secs: default_whisper_timeout_secs(),
        }
    }
}

/// Derived outputs written for every input
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct OutputConfig {
    /// Pinyin subtitle track
    #[serde(default)]
    pub pinyin: bool,

    /// Per-frame definitions file
    #[serde(default)]
    pub timed_definitions: bool,

    /// Frequency ranked definitions file
    #[serde(default)]
    pub ranked_definitions: bool,

    /// Bilingual track merging the Chinese side with the English translation
    #[serde(default)]
    pub merge: bool,

    /// Flashcard import file
    #[serde(default)]
    pub flashcards: bool,
}

impl OutputConfig {
    /// Whether any enabled output needs the Chinese dictionary
    pub fn needs_dictionary(&self) -> bool {
        self.pinyin || self.timed_definitions || self.ranked_definitions || self.flashcards
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_language() -> String {
    "Chinese".to_string()
}

fn default_max_word_length() -> usize {
    DEFAULT_MAX_WORD_LENGTH
}

fn default_subtitle_tone_style() -> ToneStyle {
    ToneStyle::Marks
}

fn default_definition_tone_style() -> ToneStyle {
    ToneStyle::Numbers
}

fn default_whisper_model() -> String {
    "small".to_string()
}

fn default_whisper_binary() -> String {
    "whisper".to_string()
}

fn default_whisper_timeout_secs() -> u64 {
    3600
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        language_utils::resolve_language(&self.language)?;

        if self.max_word_length == 0 {
            return Err(DictionaryError::InvalidMaxWordLength.into());
        }

        if self.outputs.needs_dictionary() && !language_utils::is_chinese_language(&self.language) {
            return Err(DictionaryError::LanguageMismatch(self.language.clone()).into());
        }

        if self.whisper.timeout_secs == 0 {
            return Err(anyhow!("Whisper timeout must be greater than zero"));
        }

        Ok(())
    }

    /// English name of the configured language, e.g. `Chinese`
    pub fn language_name(&self) -> Result<String> {
        language_utils::get_language_name(&self.language)
    }

    /// Dictionary file to load, if one can be found
    ///
    /// The configured path wins; otherwise `dictionary.json` in the working
    /// directory, then in the user data directory.
    pub fn resolve_dictionary_path(&self) -> Option<PathBuf> {
        if let Some(path) = &self.dictionary_path {
            return Some(path.clone());
        }

        let local = PathBuf::from("dictionary.json");
        if local.is_file() {
            return Some(local);
        }

        dirs::data_dir()
            .map(|dir| dir.join("llsubtitles").join("dictionary.json"))
            .filter(|path| path.is_file())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            language: default_language(),
            whisper: WhisperConfig::default(),
            tasks: Vec::new(),
            dictionary_path: None,
            max_word_length: default_max_word_length(),
            outputs: OutputConfig::default(),
            subtitle_tone_style: default_subtitle_tone_style(),
            definition_tone_style: default_definition_tone_style(),
            parse_mode: ParseMode::default(),
            log_level: LogLevel::default(),
        }
    }
}
