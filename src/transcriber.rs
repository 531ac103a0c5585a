/*!
 * Speech-to-text collaborator.
 *
 * The engine is an external `whisper` process that writes an SRT file next to
 * the media file, plus auxiliary artifacts that are thrown away. The
 * [`Transcriber`] trait is the seam the controller depends on so that tests
 * can substitute the process.
 */

use async_trait::async_trait;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt::{self, Debug};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tokio::process::Command;

use crate::errors::TranscriptionError;
use crate::file_utils::FileManager;

// @const: Side outputs of the engine removed after a run
const AUXILIARY_EXTENSIONS: &[&str] = &["txt", "vtt", "tsv", "json"];

/// What the engine should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhisperTask {
    /// Subtitles in the spoken language
    Transcribe,
    /// English subtitles
    Translate,
}

impl WhisperTask {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transcribe => "transcribe",
            Self::Translate => "translate",
        }
    }
}

impl fmt::Display for WhisperTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WhisperTask {
    type Err = TranscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "transcribe" => Ok(Self::Transcribe),
            "translate" => Ok(Self::Translate),
            other => Err(TranscriptionError::UnknownTask(other.to_string())),
        }
    }
}

/// Parse a comma separated task list such as `transcribe,translate`
pub fn parse_task_list(tasks: &str) -> Result<Vec<WhisperTask>, TranscriptionError> {
    tasks
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(WhisperTask::from_str)
        .collect()
}

/// Produces a subtitle file from a media file
#[async_trait]
pub trait Transcriber: Send + Sync + Debug {
    /// Run `task` on `media` and leave the resulting SRT at `output`
    async fn transcribe(&self, media: &Path, task: WhisperTask, output: &Path) -> Result<PathBuf, TranscriptionError>;
}

/// Transcriber running the `whisper` command line tool
#[derive(Debug, Clone)]
pub struct WhisperCli {
    // @field: Executable name or path
    binary: String,

    // @field: Model identifier, e.g. `small`
    model: String,

    // @field: Spoken language name, e.g. `Chinese`
    language: String,

    // @field: Upper bound on one run
    timeout: Duration,
}

impl WhisperCli {
    pub fn new(binary: &str, model: &str, language: &str, timeout_secs: u64) -> Self {
        Self {
            binary: binary.to_string(),
            model: model.to_string(),
            language: language.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// Candidate locations of the engine's SRT output
    fn produced_paths(media: &Path) -> Vec<PathBuf> {
        let mut with_suffix = media.as_os_str().to_owned();
        with_suffix.push(".srt");
        vec![PathBuf::from(with_suffix), media.with_extension("srt")]
    }

    /// Candidate locations of the engine's side outputs
    fn auxiliary_paths(media: &Path) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        for ext in AUXILIARY_EXTENSIONS {
            let mut with_suffix = media.as_os_str().to_owned();
            with_suffix.push(format!(".{}", ext));
            for candidate in [PathBuf::from(with_suffix), media.with_extension(ext)] {
                if candidate != media && !paths.contains(&candidate) {
                    paths.push(candidate);
                }
            }
        }
        paths
    }

    /// Side outputs already on disk before the engine runs
    fn existing_auxiliary_files(media: &Path) -> HashSet<PathBuf> {
        Self::auxiliary_paths(media).into_iter().filter(|p| p.exists()).collect()
    }

    /// Remove side outputs, leaving files that predate the run untouched
    fn remove_auxiliary_files(media: &Path, preexisting: &HashSet<PathBuf>) {
        for candidate in Self::auxiliary_paths(media) {
            if preexisting.contains(&candidate) {
                debug!("Keeping pre-existing {:?}", candidate);
                continue;
            }
            if let Err(e) = FileManager::remove_if_exists(&candidate) {
                warn!("{:#}", e);
            }
        }
    }
}

#[async_trait]
impl Transcriber for WhisperCli {
    async fn transcribe(&self, media: &Path, task: WhisperTask, output: &Path) -> Result<PathBuf, TranscriptionError> {
        if !media.is_file() {
            return Err(TranscriptionError::MediaNotFound(media.to_path_buf()));
        }

        let output_dir = media.parent().unwrap_or_else(|| Path::new("."));
        let preexisting = Self::existing_auxiliary_files(media);
        info!("Generating [{}] subtitles for {:?}", task, media);

        let mut command = Command::new(&self.binary);
        command
            .arg("--model")
            .arg(&self.model)
            .arg("--language")
            .arg(&self.language)
            .arg("--task")
            .arg(task.as_str())
            .arg("--output_dir")
            .arg(output_dir)
            .arg(media)
            .kill_on_drop(true);
        let run = command.output();

        let result = tokio::select! {
            result = run => {
                result.map_err(|e| TranscriptionError::LaunchFailed {
                    binary: self.binary.clone(),
                    reason: e.to_string(),
                })?
            },
            _ = tokio::time::sleep(self.timeout) => {
                return Err(TranscriptionError::TimedOut(self.timeout.as_secs()));
            }
        };

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
            error!("{} failed: {}", self.binary, stderr);
            return Err(TranscriptionError::ProcessFailed {
                status: result.status.to_string(),
                stderr,
            });
        }

        let produced = Self::produced_paths(media)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| TranscriptionError::MissingOutput(media.with_extension("srt")))?;

        if produced != output {
            std::fs::rename(&produced, output)?;
        }
        Self::remove_auxiliary_files(media, &preexisting);

        debug!("Subtitles for {:?} written to {:?}", media, output);
        Ok(output.to_path_buf())
    }
}
