use anyhow::{Context, Result, anyhow};
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::errors::SubtitleError;

// @module: Subtitle frame parsing and SRT writing

// @const: Frame index line
static INDEX_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").unwrap());

// @const: SRT time span line
static TIME_SPAN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2},\d{3})\s+-->\s+(\d{2}:\d{2}:\d{2},\d{3})$").unwrap()
});

/// Parse an SRT timestamp (`HH:MM:SS,mmm`) to milliseconds
pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
    let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

    if parts.len() != 4 {
        return Err(anyhow!("Invalid timestamp format: {}", timestamp));
    }

    let hours: u64 = parts[0].parse().context("Failed to parse hours")?;
    let minutes: u64 = parts[1].parse().context("Failed to parse minutes")?;
    let seconds: u64 = parts[2].parse().context("Failed to parse seconds")?;
    let millis: u64 = parts[3].parse().context("Failed to parse milliseconds")?;

    if minutes >= 60 || seconds >= 60 || millis >= 1000 {
        return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
    }

    hours
        .checked_mul(3_600_000)
        .and_then(|ms| ms.checked_add(minutes * 60_000 + seconds * 1_000 + millis))
        .ok_or_else(|| anyhow!("Invalid timestamp format: {} is out of range", timestamp))
}

/// Format milliseconds as an SRT timestamp (`HH:MM:SS,mmm`)
pub fn format_timestamp(ms: u64) -> String {
    let hours = ms / 3_600_000;
    let minutes = (ms % 3_600_000) / 60_000;
    let seconds = (ms % 60_000) / 1_000;
    let millis = ms % 1_000;

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}

// @struct: Raw start and end timestamps of a frame
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: String,
    pub end: String,
}

impl TimeSpan {
    pub fn new(start: &str, end: &str) -> Self {
        Self {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Start time in milliseconds
    pub fn start_ms(&self) -> Result<u64, SubtitleError> {
        parse_timestamp(&self.start).map_err(|_| SubtitleError::InvalidTimestamp(self.start.clone()))
    }

    /// End time in milliseconds
    pub fn end_ms(&self) -> Result<u64, SubtitleError> {
        parse_timestamp(&self.end).map_err(|_| SubtitleError::InvalidTimestamp(self.end.clone()))
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} --> {}", self.start, self.end)
    }
}

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleFrame {
    // @field: Sequence index, verbatim from the source
    pub index: String,

    // @field: Time span, absent if the source never gave one
    pub time_span: Option<TimeSpan>,

    // @field: Text lines in order
    pub lines: Vec<String>,
}

impl SubtitleFrame {
    pub fn new(index: &str, time_span: TimeSpan, lines: Vec<String>) -> Self {
        Self {
            index: index.to_string(),
            time_span: Some(time_span),
            lines,
        }
    }

    fn open(index: &str) -> Self {
        Self {
            index: index.to_string(),
            time_span: None,
            lines: Vec::new(),
        }
    }

    /// Lines joined by newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Same frame with every line replaced by `f(line)`
    pub fn map_lines<F>(&self, f: F) -> Self
    where
        F: FnMut(&String) -> String,
    {
        Self {
            index: self.index.clone(),
            time_span: self.time_span.clone(),
            lines: self.lines.iter().map(f).collect(),
        }
    }
}

impl fmt::Display for SubtitleFrame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        match &self.time_span {
            Some(span) => writeln!(f, "{}", span)?,
            None => writeln!(f, "n/a")?,
        }
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Ordered sequence of frames from one subtitle source
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubtitleTrack {
    pub frames: Vec<SubtitleFrame>,
}

impl SubtitleTrack {
    pub fn new(frames: Vec<SubtitleFrame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SubtitleFrame> {
        self.frames.iter()
    }

    /// Same track with every text line replaced by `f(line)`
    pub fn map_lines<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        Self {
            frames: self
                .frames
                .iter()
                .map(|frame| frame.map_lines(|line| f(line)))
                .collect(),
        }
    }

    /// Write the track to an SRT file, creating parent directories
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut file = File::create(path)
            .with_context(|| format!("Failed to create subtitle file: {}", path.display()))?;
        write!(file, "{}", self)
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))?;

        Ok(())
    }
}

impl fmt::Display for SubtitleTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for frame in &self.frames {
            write!(f, "{}", frame)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SubtitleTrack {
    type Item = &'a SubtitleFrame;
    type IntoIter = std::slice::Iter<'a, SubtitleFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// How the parser treats content it cannot place in a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParseMode {
    /// Drop stray content and keep frames without a time span
    #[default]
    Lenient,
    /// Reject stray content and frames without a time span
    Strict,
}

/// Parser turning SRT text into frames
///
/// Each trimmed line is classified in priority order as an index line, a time
/// span line or a text line; blank lines only separate frames. The parser holds
/// no state between calls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubtitleParser {
    mode: ParseMode,
}

impl SubtitleParser {
    pub fn new(mode: ParseMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Parse a subtitle file
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<SubtitleTrack, SubtitleError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SubtitleError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|source| SubtitleError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let track = self.parse_str(&content)?;
        debug!("Parsed {} frames from {}", track.len(), path.display());
        Ok(track)
    }

    /// Parse SRT content held in memory
    pub fn parse_str(&self, content: &str) -> Result<SubtitleTrack, SubtitleError> {
        self.parse_lines(content.lines())
    }

    /// Parse a sequence of raw lines
    pub fn parse_lines<I, S>(&self, lines: I) -> Result<SubtitleTrack, SubtitleError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut frames = Vec::new();
        let mut current: Option<SubtitleFrame> = None;
        let mut dropped = 0;

        for (number, raw) in lines.into_iter().enumerate() {
            let line_number = number + 1;
            let raw = raw.as_ref();
            let raw = if line_number == 1 { raw.trim_start_matches('\u{feff}') } else { raw };
            let line = raw.trim();

            if line.is_empty() {
                continue;
            }

            if INDEX_REGEX.is_match(line) {
                if let Some(frame) = current.take() {
                    frames.push(self.close(frame)?);
                }
                current = Some(SubtitleFrame::open(line));
                continue;
            }

            let Some(frame) = current.as_mut() else {
                if self.mode == ParseMode::Strict {
                    return Err(SubtitleError::UnexpectedLine {
                        line_number,
                        content: line.to_string(),
                    });
                }
                debug!("Dropping line {} outside any frame: {}", line_number, line);
                dropped += 1;
                continue;
            };

            if let Some(caps) = TIME_SPAN_REGEX.captures(line) {
                if self.mode == ParseMode::Strict && frame.time_span.is_some() {
                    return Err(SubtitleError::UnexpectedLine {
                        line_number,
                        content: line.to_string(),
                    });
                }
                frame.time_span = Some(TimeSpan::new(&caps[1], &caps[2]));
            } else {
                if self.mode == ParseMode::Strict && frame.time_span.is_none() {
                    return Err(SubtitleError::UnexpectedLine {
                        line_number,
                        content: line.to_string(),
                    });
                }
                frame.lines.push(line.to_string());
            }
        }

        if let Some(frame) = current.take() {
            frames.push(self.close(frame)?);
        }

        if dropped > 0 {
            warn!("Ignored {} subtitle lines outside of any frame", dropped);
        }

        Ok(SubtitleTrack::new(frames))
    }

    fn close(&self, frame: SubtitleFrame) -> Result<SubtitleFrame, SubtitleError> {
        if frame.time_span.is_none() {
            if self.mode == ParseMode::Strict {
                return Err(SubtitleError::MissingTimeSpan { index: frame.index });
            }
            warn!("Subtitle frame {} has no time span", frame.index);
        }
        Ok(frame)
    }
}
