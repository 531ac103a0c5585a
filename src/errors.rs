/*!
 * Error types for the llsubtitles application.
 *
 * This module contains custom error types for the different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 * Every error maps onto one of a small set of [`ErrorKind`] categories so the
 * command line layer can report failures uniformly.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Broad failure category shared by all error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced input file does not exist
    NotFound,
    /// An operation was invoked without the configuration it depends on
    PreconditionFailed,
    /// An invalid task selector was given to the speech-to-text engine
    UnknownTask,
    /// Anything else (I/O failures, external process failures)
    Other,
}

/// Errors that can occur while reading or merging subtitle tracks
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The subtitle file does not exist
    #[error("Subtitle file {0} does not exist")]
    NotFound(PathBuf),

    /// The subtitle file exists but could not be read
    #[error("Failed to read subtitle file {path}: {source}")]
    Read {
        /// Path of the file
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A line was found where the strict parser does not allow one
    #[error("Unexpected content at line {line_number}: {content}")]
    UnexpectedLine {
        /// 1-based line number in the source
        line_number: usize,
        /// The offending (trimmed) line
        content: String,
    },

    /// A frame has no time span
    #[error("Frame {index} has no time span")]
    MissingTimeSpan {
        /// Index of the frame as written in the source
        index: String,
    },

    /// A timestamp could not be parsed
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl SubtitleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }
}

/// Errors that can occur while loading or using the dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary data file does not exist
    #[error("Dictionary file {0} does not exist")]
    NotFound(PathBuf),

    /// The dictionary data could not be read or decoded
    #[error("Dictionary file {path} is unreadable: {reason}")]
    Unreadable {
        /// Path of the file
        path: PathBuf,
        /// What went wrong
        reason: String,
    },

    /// A dictionary-dependent operation was requested without a dictionary
    #[error("Chinese dictionary not loaded")]
    NotLoaded,

    /// Romanization or definitions were requested for a non-Chinese source
    #[error("Chinese must be the language for pinyin and definitions, got {0}")]
    LanguageMismatch(String),

    /// The segmentation window must hold at least one character
    #[error("Maximum word length must be at least 1")]
    InvalidMaxWordLength,
}

impl DictionaryError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::PreconditionFailed
    }
}

/// Errors that can occur while running the speech-to-text engine
#[derive(Error, Debug)]
pub enum TranscriptionError {
    /// The task selector is neither `transcribe` nor `translate`
    #[error("Unknown task {0}")]
    UnknownTask(String),

    /// The media file does not exist
    #[error("Media file {0} does not exist")]
    MediaNotFound(PathBuf),

    /// The engine binary could not be started
    #[error("Failed to launch {binary}: {reason}")]
    LaunchFailed {
        /// Binary name or path
        binary: String,
        /// Launch error
        reason: String,
    },

    /// The engine exited with a failure status
    #[error("Speech-to-text engine failed with {status}: {stderr}")]
    ProcessFailed {
        /// Exit status description
        status: String,
        /// Captured standard error
        stderr: String,
    },

    /// The engine did not finish in time
    #[error("Speech-to-text engine timed out after {0} seconds")]
    TimedOut(u64),

    /// The engine finished but the expected subtitle file is missing
    #[error("Expected subtitle output {0} was not produced")]
    MissingOutput(PathBuf),

    /// Moving the produced file into place failed
    #[error("Failed to move subtitle output: {0}")]
    Io(#[from] std::io::Error),
}

impl TranscriptionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownTask(_) => ErrorKind::UnknownTask,
            Self::MediaNotFound(_) => ErrorKind::NotFound,
            _ => ErrorKind::Other,
        }
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle processing
    #[error("Subtitle error: {0}")]
    Subtitle(#[from] SubtitleError),

    /// Error from the dictionary
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from the speech-to-text engine
    #[error("Transcription error: {0}")]
    Transcription(#[from] TranscriptionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Subtitle(e) => e.kind(),
            Self::Dictionary(e) => e.kind(),
            Self::Transcription(e) => e.kind(),
            Self::File(_) | Self::Unknown(_) => ErrorKind::Other,
        }
    }
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
