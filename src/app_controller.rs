use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::alignment;
use crate::app_config::Config;
use crate::definitions;
use crate::dictionary::{DictionaryIndex, Segmenter};
use crate::errors::DictionaryError;
use crate::file_utils::{FileManager, FileType, OutputPaths};
use crate::flashcards;
use crate::romanizer::ToneStyle;
use crate::subtitle_processor::{SubtitleParser, SubtitleTrack};
use crate::transcriber::{Transcriber, WhisperCli, WhisperTask};

// @module: Application controller for subtitle generation

/// Main application controller
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Speech-to-text engine
    transcriber: Box<dyn Transcriber>,

    // @field: Shared dictionary, present when a dictionary output is enabled
    dictionary: Option<Arc<DictionaryIndex>>,

    // @field: Subtitle parser in the configured mode
    parser: SubtitleParser,
}

impl Controller {
    /// Create a controller from explicit collaborators
    pub fn new(config: Config, transcriber: Box<dyn Transcriber>, dictionary: Option<Arc<DictionaryIndex>>) -> Self {
        let parser = SubtitleParser::new(config.parse_mode);
        Self {
            config,
            transcriber,
            dictionary,
            parser,
        }
    }

    // @method: Create a controller running whisper, loading the dictionary when needed
    pub fn with_config(config: Config) -> Result<Self> {
        let transcriber = WhisperCli::new(
            &config.whisper.binary,
            &config.whisper.model,
            &config.language_name()?,
            config.whisper.timeout_secs,
        );

        let dictionary = if config.outputs.needs_dictionary() {
            let path = config
                .resolve_dictionary_path()
                .ok_or_else(|| DictionaryError::NotFound(PathBuf::from("dictionary.json")))?;
            info!("Loading Chinese dictionary from {}", path.display());
            Some(Arc::new(DictionaryIndex::load(&path)?))
        } else {
            None
        };

        Ok(Self::new(config, Box::new(transcriber), dictionary))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Segmenter over the loaded dictionary using `tone_style`
    pub fn segmenter(&self, tone_style: ToneStyle) -> Result<Segmenter, DictionaryError> {
        let index = self.dictionary.clone().ok_or(DictionaryError::NotLoaded)?;
        Ok(Segmenter::new(index, self.config.max_word_length)?.with_tone_style(tone_style))
    }

    /// Process every input path; directories are searched for media files
    ///
    /// A failing input is logged and the remaining inputs still run. The
    /// result is an error if any input failed.
    pub async fn run(&self, inputs: &[PathBuf]) -> Result<()> {
        let start_time = Instant::now();

        let mut files = Vec::new();
        for input in inputs {
            if input.is_dir() {
                files.extend(FileManager::find_media_files(input)?);
            } else {
                files.push(input.clone());
            }
        }

        if files.is_empty() {
            warn!("No input files to process");
            return Ok(());
        }

        let progress_bar = ProgressBar::new(files.len() as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("=>-"));

        let mut failures = 0;
        for file in &files {
            let file_name = file.file_name().unwrap_or_default().to_string_lossy().to_string();
            progress_bar.set_message(file_name);

            if let Err(e) = self.process_path(file).await {
                error!("Failed to process {:?}: {:#}", file, e);
                failures += 1;
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_and_clear();

        info!(
            "Processed {} of {} files in {}",
            files.len() - failures,
            files.len(),
            Self::format_duration(start_time.elapsed())
        );

        if failures > 0 {
            return Err(anyhow!("{} of {} files failed", failures, files.len()));
        }
        Ok(())
    }

    /// Run the configured tasks and outputs for one media or subtitle file
    pub async fn process_path(&self, input: &Path) -> Result<OutputPaths> {
        let input = FileManager::absolute(input)?;
        if !input.exists() {
            return Err(anyhow!("Input file does not exist: {:?}", input));
        }

        let language_name = self.config.language_name()?;
        let paths = self.output_paths(&input, &language_name);
        info!("Generating subtitles for {:?}", input);

        let is_subtitle = FileManager::detect_file_type(&input) == FileType::Subtitle;
        let tasks: &[WhisperTask] = if is_subtitle { &[] } else { &self.config.tasks };

        for task in tasks {
            let output = match task {
                WhisperTask::Transcribe => &paths.transcript,
                WhisperTask::Translate => &paths.english,
            };
            info!("Running task {}", task);
            self.transcriber
                .transcribe(&input, *task, output)
                .await
                .with_context(|| format!("Task {} failed for {:?}", task, input))?;
        }

        let outputs = &self.config.outputs;
        if !outputs.needs_dictionary() && !outputs.merge {
            return Ok(paths);
        }

        let transcript = self
            .parser
            .parse_file(&paths.transcript)
            .with_context(|| format!("Failed to read transcript for {:?}", input))?;

        let pinyin_track = if outputs.pinyin {
            let segmenter = self.segmenter(self.config.subtitle_tone_style)?;
            let track = Self::pinyin_track(&transcript, &segmenter);
            track.write_to_srt(&paths.pinyin)?;
            info!("Wrote pinyin subtitles to {:?}", paths.pinyin);
            Some(track)
        } else {
            None
        };

        let definition_segmenter = if outputs.timed_definitions || outputs.ranked_definitions || outputs.flashcards {
            Some(self.segmenter(self.config.definition_tone_style)?)
        } else {
            None
        };

        if let Some(segmenter) = &definition_segmenter {

            if outputs.timed_definitions {
                let timed = definitions::timed_definitions(&transcript, segmenter);
                definitions::write_timed_definitions(&timed, &paths.timed_definitions)?;
                info!("Wrote timed definitions to {:?}", paths.timed_definitions);
            }

            if outputs.ranked_definitions {
                let ranked = definitions::ranked_definitions(&transcript, segmenter);
                definitions::write_ranked_definitions(&ranked, &paths.ranked_definitions)?;
                info!("Wrote {} ranked definitions to {:?}", ranked.len(), paths.ranked_definitions);
            }
        }

        if outputs.merge {
            let english = self
                .parser
                .parse_file(&paths.english)
                .with_context(|| format!("Failed to read English subtitles for {:?}", input))?;
            let primary = pinyin_track.as_ref().unwrap_or(&transcript);
            let merged = alignment::merge_tracks(primary, &english)?;
            merged.write_to_srt(&paths.merged)?;
            info!("Wrote {} merged frames to {:?}", merged.len(), paths.merged);
        }

        if let Some(segmenter) = definition_segmenter.as_ref().filter(|_| outputs.flashcards) {
            let notes = definitions::flashcard_notes(&transcript, segmenter);
            flashcards::write_deck(&notes, &FileManager::deck_name(&paths.transcript), &paths.flashcards)?;
        }

        Ok(paths)
    }

    /// Derive output paths; subtitle inputs act as the transcript themselves
    fn output_paths(&self, input: &Path, language_name: &str) -> OutputPaths {
        if FileManager::detect_file_type(input) != FileType::Subtitle {
            return FileManager::output_paths(input, language_name);
        }

        debug!("Detected subtitle file, using it as the transcript");
        let stem = input.file_stem().unwrap_or_default().to_string_lossy().to_string();
        let language_suffix = format!(".{}", language_name);
        let base_stem = stem.strip_suffix(&language_suffix).unwrap_or(&stem);
        let base = input.with_file_name(format!("{}.srt", base_stem));

        let mut paths = FileManager::output_paths(&base, language_name);
        paths.transcript = input.to_path_buf();
        paths
    }

    /// Pinyin rendering of a track, frame numbering and timing unchanged
    pub fn pinyin_track(track: &SubtitleTrack, segmenter: &Segmenter) -> SubtitleTrack {
        track.map_lines(|line| segmenter.romanize_line(line))
    }

    /// Merge two subtitle files into one
    pub fn merge_files(&self, primary: &Path, secondary: &Path, output: &Path) -> Result<SubtitleTrack> {
        let primary_track = self.parser.parse_file(primary)?;
        let secondary_track = self.parser.parse_file(secondary)?;

        let merged = alignment::merge_tracks(&primary_track, &secondary_track)?;
        merged.write_to_srt(output)?;
        info!(
            "Merged {} + {} frames into {} frames at {:?}",
            primary_track.len(),
            secondary_track.len(),
            merged.len(),
            output
        );

        Ok(merged)
    }

    /// Write a flashcard deck next to a subtitle file
    pub fn export_deck(&self, subtitle: &Path, tone_style: ToneStyle) -> Result<PathBuf> {
        info!("Generating deck from {:?}", subtitle);
        let segmenter = self.segmenter(tone_style)?;
        let track = self.parser.parse_file(subtitle)?;

        let notes = definitions::flashcard_notes(&track, &segmenter);
        let deck_name = FileManager::deck_name(subtitle);
        let output = subtitle.with_file_name(format!("{}.flashcards.txt", deck_name));
        flashcards::write_deck(&notes, &deck_name, &output)?;

        Ok(output)
    }

    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
