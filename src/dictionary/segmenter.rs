/*!
 * Greedy longest-match word segmentation.
 *
 * A line is cut into dictionary words by always consuming the longest
 * recognized prefix (bounded by the maximum word length) at the cursor. Each
 * word carries its pinyin and its resolved English gloss.
 */

use std::fmt;
use std::sync::Arc;

use super::index::{DictionaryIndex, resolve_gloss};
use crate::errors::DictionaryError;
use crate::language_utils;
use crate::romanizer::{PinyinRomanizer, Romanizer, ToneStyle};

/// Default bound on the segmentation window, in characters
pub const DEFAULT_MAX_WORD_LENGTH: usize = 3;

/// Where a translation unit came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitSource {
    /// Matched a dictionary headword
    Dictionary,
    /// Copied from the input unchanged
    PassThrough,
}

/// One segmented word with its reading and gloss
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranslationUnit {
    pub word: String,
    pub romanization: String,
    pub gloss: String,
    pub source: UnitSource,
}

impl TranslationUnit {
    /// Unit that copies the text into every field
    pub fn pass_through(text: &str) -> Self {
        Self {
            word: text.to_string(),
            romanization: text.to_string(),
            gloss: text.to_string(),
            source: UnitSource::PassThrough,
        }
    }

    pub fn is_pass_through(&self) -> bool {
        self.source == UnitSource::PassThrough
    }

    /// The `(word, romanization, gloss)` triple
    pub fn as_tuple(&self) -> (&str, &str, &str) {
        (&self.word, &self.romanization, &self.gloss)
    }
}

/// Segments lines against a shared dictionary index
#[derive(Clone)]
pub struct Segmenter {
    // @field: Shared read-only headword index
    index: Arc<DictionaryIndex>,

    // @field: Longest candidate tried at each position
    max_word_length: usize,

    // @field: Tone notation for romanization
    tone_style: ToneStyle,

    // @field: Reading provider
    romanizer: Arc<dyn Romanizer>,
}

impl fmt::Debug for Segmenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segmenter")
            .field("entries", &self.index.len())
            .field("max_word_length", &self.max_word_length)
            .field("tone_style", &self.tone_style)
            .finish()
    }
}

impl Segmenter {
    /// Create a segmenter using pinyin readings
    pub fn new(index: Arc<DictionaryIndex>, max_word_length: usize) -> Result<Self, DictionaryError> {
        Self::with_romanizer(index, max_word_length, Arc::new(PinyinRomanizer))
    }

    /// Create a segmenter with a custom reading provider
    pub fn with_romanizer(
        index: Arc<DictionaryIndex>,
        max_word_length: usize,
        romanizer: Arc<dyn Romanizer>,
    ) -> Result<Self, DictionaryError> {
        if max_word_length == 0 {
            return Err(DictionaryError::InvalidMaxWordLength);
        }

        Ok(Self {
            index,
            max_word_length,
            tone_style: ToneStyle::default(),
            romanizer,
        })
    }

    pub fn index(&self) -> &DictionaryIndex {
        &self.index
    }

    pub fn max_word_length(&self) -> usize {
        self.max_word_length
    }

    pub fn tone_style(&self) -> ToneStyle {
        self.tone_style
    }

    /// Change the tone notation used by subsequent calls
    pub fn set_tone_style(&mut self, tone_style: ToneStyle) {
        self.tone_style = tone_style;
    }

    /// Builder-style variant of [`Segmenter::set_tone_style`]
    pub fn with_tone_style(mut self, tone_style: ToneStyle) -> Self {
        self.tone_style = tone_style;
        self
    }

    /// Segment a line into translation units
    ///
    /// Lines without any Chinese character come back as a single pass-through
    /// unit. Otherwise the concatenated words reproduce the line exactly.
    pub fn translate(&self, line: &str) -> Vec<TranslationUnit> {
        if !language_utils::contains_han(line) {
            return vec![TranslationUnit::pass_through(line)];
        }

        // Byte offset of every character boundary, including the end
        let bounds: Vec<usize> = line
            .char_indices()
            .map(|(offset, _)| offset)
            .chain(std::iter::once(line.len()))
            .collect();
        let char_count = bounds.len() - 1;

        let mut units = Vec::new();
        let mut left = 0;
        while left < char_count {
            let mut matched = None;
            let widest = (left + self.max_word_length).min(char_count);
            for right in (left + 1..=widest).rev() {
                let word = &line[bounds[left]..bounds[right]];
                if let Some(senses) = self.index.lookup(word) {
                    matched = Some((right, word, resolve_gloss(senses)));
                    break;
                }
            }

            match matched {
                Some((right, word, gloss)) => {
                    units.push(TranslationUnit {
                        word: word.to_string(),
                        romanization: self.romanizer.romanize(word, self.tone_style),
                        gloss,
                        source: UnitSource::Dictionary,
                    });
                    left = right;
                }
                None => {
                    units.push(TranslationUnit::pass_through(&line[bounds[left]..bounds[left + 1]]));
                    left += 1;
                }
            }
        }

        units
    }

    /// Romanization of every unit, space separated
    pub fn romanize_line(&self, line: &str) -> String {
        self.translate(line)
            .iter()
            .map(|unit| unit.romanization.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Gloss of every unit, space separated
    pub fn gloss_line(&self, line: &str) -> String {
        self.translate(line)
            .iter()
            .map(|unit| unit.gloss.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
