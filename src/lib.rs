/*!
 * # llsubtitles - Language-learning subtitles
 *
 * A Rust library that turns foreign-language media into study material.
 *
 * ## Features
 *
 * - Transcribe and translate media with the `whisper` speech-to-text engine
 * - Parse SRT subtitle files into timed frames
 * - Segment Chinese text into dictionary words with greedy longest matching
 * - Romanize words as pinyin with tone marks, tone numbers or no tones
 * - Merge a Chinese (or pinyin) track with its English translation by time
 * - Summarize vocabulary per frame or by frequency
 * - Export flashcard decks
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT parsing and writing
 * - `dictionary`: Dictionary loading, headword index and segmentation
 * - `romanizer`: Pinyin readings
 * - `alignment`: Time-based merging of two tracks
 * - `definitions`: Vocabulary summaries
 * - `flashcards`: Deck export
 * - `transcriber`: Speech-to-text engine
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod alignment;
pub mod app_config;
pub mod app_controller;
pub mod definitions;
pub mod dictionary;
pub mod errors;
pub mod file_utils;
pub mod flashcards;
pub mod language_utils;
pub mod romanizer;
pub mod subtitle_processor;
pub mod transcriber;

// Re-export main types for easier usage
pub use alignment::merge_tracks;
pub use app_config::Config;
pub use app_controller::Controller;
pub use dictionary::{DictionaryEntry, DictionaryIndex, Segmenter, TranslationUnit};
pub use errors::{AppError, DictionaryError, ErrorKind, SubtitleError, TranscriptionError};
pub use romanizer::ToneStyle;
pub use subtitle_processor::{SubtitleFrame, SubtitleParser, SubtitleTrack, TimeSpan};
pub use transcriber::{Transcriber, WhisperCli, WhisperTask};
