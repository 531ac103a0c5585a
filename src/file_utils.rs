use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Extensions treated as media input for the speech-to-text engine
const MEDIA_EXTENSIONS: &[&str] = &[
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "m4v", "mpg", "mpeg", "ts",
    "mp3", "wav", "m4a", "flac", "ogg", "opus", "aac",
];

/// Enum representing different file types
#[derive(Debug, PartialEq, Eq)]
pub enum FileType {
    /// Subtitle file (SRT)
    Subtitle,
    /// Audio or video file
    Media,
    /// Unknown file type
    Unknown,
}

/// Files derived from one input path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    /// Same-language transcript, `<stem>.<Language>.srt`
    pub transcript: PathBuf,
    /// English translation, `<stem>.English.srt`
    pub english: PathBuf,
    /// Pinyin track, `<stem>.Pinyin.srt`
    pub pinyin: PathBuf,
    /// Bilingual track, `<stem>.Merged.srt`
    pub merged: PathBuf,
    /// Per-frame definitions, `<stem>.definitions.json`
    pub timed_definitions: PathBuf,
    /// Frequency ranked definitions, `<stem>.ranked.json`
    pub ranked_definitions: PathBuf,
    /// Flashcard import file, `<stem>.flashcards.txt`
    pub flashcards: PathBuf,
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @resolves: Absolute form of a possibly relative path
    pub fn absolute<P: AsRef<Path>>(path: P) -> Result<PathBuf> {
        let path = path.as_ref();
        if path.is_absolute() {
            Ok(path.to_path_buf())
        } else {
            Ok(std::env::current_dir()
                .context("Failed to read current directory")?
                .join(path))
        }
    }

    // @generates: Sibling path `<dir>/<stem>.<suffix>.<extension>`
    pub fn generate_output_path<P: AsRef<Path>>(input_file: P, suffix: &str, extension: &str) -> PathBuf {
        let input_file = input_file.as_ref();
        let stem = input_file.file_stem().unwrap_or_default().to_string_lossy();
        let dir = input_file.parent().unwrap_or_else(|| Path::new(""));

        dir.join(format!("{}.{}.{}", stem, suffix, extension))
    }

    /// Every output file name derived from an input media path
    pub fn output_paths<P: AsRef<Path>>(input_file: P, language_name: &str) -> OutputPaths {
        let input_file = input_file.as_ref();
        OutputPaths {
            transcript: Self::generate_output_path(input_file, language_name, "srt"),
            english: Self::generate_output_path(input_file, "English", "srt"),
            pinyin: Self::generate_output_path(input_file, "Pinyin", "srt"),
            merged: Self::generate_output_path(input_file, "Merged", "srt"),
            timed_definitions: Self::generate_output_path(input_file, "definitions", "json"),
            ranked_definitions: Self::generate_output_path(input_file, "ranked", "json"),
            flashcards: Self::generate_output_path(input_file, "flashcards", "txt"),
        }
    }

    /// Deck name for a subtitle file: its name up to the first dot
    pub fn deck_name<P: AsRef<Path>>(subtitle_file: P) -> String {
        let name = subtitle_file
            .as_ref()
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        name.split('.').next().unwrap_or_default().to_string()
    }

    /// Find media files below a directory
    pub fn find_media_files<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file() && Self::detect_file_type(path) == FileType::Media {
                result.push(path.to_path_buf());
            }
        }

        Ok(result)
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Remove a file, doing nothing if it does not exist
    pub fn remove_if_exists<P: AsRef<Path>>(path: P) -> Result<bool> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(path).with_context(|| format!("Failed to remove file: {:?}", path))?;
        debug!("Removed {:?}", path);
        Ok(true)
    }

    /// Classify a file by its extension
    pub fn detect_file_type<P: AsRef<Path>>(path: P) -> FileType {
        let Some(ext) = path.as_ref().extension() else {
            return FileType::Unknown;
        };
        let ext = ext.to_string_lossy().to_lowercase();

        if ext == "srt" {
            FileType::Subtitle
        } else if MEDIA_EXTENSIONS.contains(&ext.as_str()) {
            FileType::Media
        } else {
            FileType::Unknown
        }
    }
}
