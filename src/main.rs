// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use llsubtitles::app_config::{self, Config};
use llsubtitles::romanizer::ToneStyle;
use llsubtitles::subtitle_processor::ParseMode;
use llsubtitles::transcriber::WhisperTask;
use llsubtitles::Controller;
use llsubtitles::file_utils::FileManager;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ToneStyle to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliToneStyle {
    /// Tone marks over vowels (zhōngguó)
    Marks,
    /// Tone numbers after each syllable (zhong1guo2)
    Numbers,
    /// No tones (zhongguo)
    Plain,
}

impl From<CliToneStyle> for ToneStyle {
    fn from(cli_style: CliToneStyle) -> Self {
        match cli_style {
            CliToneStyle::Marks => ToneStyle::Marks,
            CliToneStyle::Numbers => ToneStyle::Numbers,
            CliToneStyle::Plain => ToneStyle::Plain,
        }
    }
}

/// CLI Wrapper for WhisperTask to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliTask {
    /// Subtitles in the spoken language
    Transcribe,
    /// English subtitles
    Translate,
}

impl From<CliTask> for WhisperTask {
    fn from(cli_task: CliTask) -> Self {
        match cli_task {
            CliTask::Transcribe => WhisperTask::Transcribe,
            CliTask::Translate => WhisperTask::Translate,
        }
    }
}

/// CLI Wrapper for ParseMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliParseMode {
    Lenient,
    Strict,
}

impl From<CliParseMode> for ParseMode {
    fn from(cli_mode: CliParseMode) -> Self {
        match cli_mode {
            CliParseMode::Lenient => ParseMode::Lenient,
            CliParseMode::Strict => ParseMode::Strict,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Dictionary file (JSON or CC-CEDICT)
    #[arg(short, long, global = true)]
    dictionary: Option<PathBuf>,

    /// Subtitle parsing mode
    #[arg(long, global = true, value_enum)]
    parse_mode: Option<CliParseMode>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Media files, subtitle files or directories to process
    #[arg(value_name = "INPUT_PATH")]
    input_paths: Vec<PathBuf>,

    /// Spoken language of the media (e.g. 'Chinese', 'zh')
    #[arg(short = 'L', long)]
    language: Option<String>,

    /// Whisper model name
    #[arg(short, long)]
    model: Option<String>,

    /// Whisper tasks to run, in order
    #[arg(short, long, value_enum, value_delimiter = ',')]
    tasks: Vec<CliTask>,

    /// Write a pinyin subtitle track
    #[arg(long)]
    pinyin: bool,

    /// Write per-frame definitions
    #[arg(long)]
    timed_definitions: bool,

    /// Write frequency ranked definitions
    #[arg(long)]
    ranked_definitions: bool,

    /// Write a merged bilingual track
    #[arg(long)]
    merge: bool,

    /// Write a flashcard deck
    #[arg(long)]
    flashcards: bool,

    /// Longest word the segmenter tries, in characters
    #[arg(long)]
    max_word_length: Option<usize>,

    /// Tone notation of the pinyin track
    #[arg(long, value_enum)]
    subtitle_tones: Option<CliToneStyle>,

    /// Tone notation of definitions and flashcards
    #[arg(long, value_enum)]
    definition_tones: Option<CliToneStyle>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate subtitles and study material (default command)
    Generate(GenerateArgs),

    /// Merge two subtitle files into one bilingual track
    Merge {
        /// Track whose timing is kept
        #[arg(value_name = "PRIMARY")]
        primary: PathBuf,

        /// Track attached to the nearest primary frame
        #[arg(value_name = "SECONDARY")]
        secondary: PathBuf,

        /// Output file (defaults to `<primary stem>.Merged.srt`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build flashcard decks from Chinese subtitle files
    Deck {
        /// Subtitle files to read
        #[arg(value_name = "SUBTITLE", required = true)]
        subtitles: Vec<PathBuf>,

        /// Tone notation on the cards
        #[arg(long, value_enum)]
        tones: Option<CliToneStyle>,
    },

    /// Generate shell completions for llsubtitles
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// llsubtitles - Language-learning subtitles
///
/// Generates transcripts, English translations, pinyin tracks, bilingual
/// merged tracks, vocabulary lists and flashcards from media files.
#[derive(Parser, Debug)]
#[command(name = "llsubtitles")]
#[command(version)]
#[command(about = "Subtitles and study material for language learners")]
#[command(long_about = "llsubtitles runs whisper on media files and turns the subtitles into study material.

EXAMPLES:
    llsubtitles -t transcribe,translate --pinyin --merge show.mp4
    llsubtitles --ranked-definitions show.Chinese.srt
    llsubtitles merge show.Pinyin.srt show.English.srt -o show.Merged.srt
    llsubtitles deck show.Chinese.srt --tones marks
    llsubtitles completions bash > llsubtitles.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. Command line flags override the file.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    common: CommonArgs,

    #[command(flatten)]
    generate: GenerateArgs,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and label for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("1;31", "ERROR"),
            Level::Warn => ("1;33", "WARN "),
            Level::Info => ("1;32", "INFO "),
            Level::Debug => ("1;36", "DEBUG"),
            Level::Trace => ("1;35", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, label) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "\x1B[{}m{} {} {}\x1B[0m", color, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Verbosity is controlled through the global max level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(log_level) = &cli.common.log_level {
        let config_log_level: app_config::LogLevel = log_level.clone().into();
        log::set_max_level(level_filter(&config_log_level));
    }

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "llsubtitles", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Generate(args)) => run_generate(&cli.common, args).await,
        Some(Commands::Merge { primary, secondary, output }) => {
            run_merge(&cli.common, &primary, &secondary, output)
        }
        Some(Commands::Deck { subtitles, tones }) => run_deck(&cli.common, &subtitles, tones),
        None => run_generate(&cli.common, cli.generate).await,
    }
}

/// Load the config file, creating a default one if it is missing
fn load_config(common: &CommonArgs) -> Result<Config> {
    let config_path = &common.config_path;
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(log_level) = &common.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(dictionary) = &common.dictionary {
        config.dictionary_path = Some(dictionary.clone());
    }
    if let Some(parse_mode) = common.parse_mode {
        config.parse_mode = parse_mode.into();
    }

    if common.log_level.is_none() {
        log::set_max_level(level_filter(&config.log_level));
    }

    Ok(config)
}

async fn run_generate(common: &CommonArgs, options: GenerateArgs) -> Result<()> {
    if options.input_paths.is_empty() {
        return Err(anyhow!("INPUT_PATH is required when no subcommand is specified"));
    }

    let mut config = load_config(common)?;

    if let Some(language) = &options.language {
        config.language = language.clone();
    }
    if let Some(model) = &options.model {
        config.whisper.model = model.clone();
    }
    if !options.tasks.is_empty() {
        config.tasks = options.tasks.iter().map(|task| (*task).into()).collect();
    }
    if let Some(max_word_length) = options.max_word_length {
        config.max_word_length = max_word_length;
    }
    if let Some(style) = options.subtitle_tones {
        config.subtitle_tone_style = style.into();
    }
    if let Some(style) = options.definition_tones {
        config.definition_tone_style = style.into();
    }

    let outputs = &mut config.outputs;
    outputs.pinyin |= options.pinyin;
    outputs.timed_definitions |= options.timed_definitions;
    outputs.ranked_definitions |= options.ranked_definitions;
    outputs.merge |= options.merge;
    outputs.flashcards |= options.flashcards;

    config.validate().context("Configuration validation failed")?;

    let controller = Controller::with_config(config)?;
    controller.run(&options.input_paths).await
}

fn run_merge(common: &CommonArgs, primary: &Path, secondary: &Path, output: Option<PathBuf>) -> Result<()> {
    let mut config = load_config(common)?;
    config.outputs = Default::default();
    config.validate().context("Configuration validation failed")?;

    let output = output.unwrap_or_else(|| FileManager::generate_output_path(primary, "Merged", "srt"));
    let controller = Controller::with_config(config)?;
    controller.merge_files(primary, secondary, &output)?;
    info!("Success: {:?}", output);

    Ok(())
}

fn run_deck(common: &CommonArgs, subtitles: &[PathBuf], tones: Option<CliToneStyle>) -> Result<()> {
    let mut config = load_config(common)?;
    config.outputs = Default::default();
    config.outputs.flashcards = true;
    config.validate().context("Configuration validation failed")?;

    let tone_style = tones.map(ToneStyle::from).unwrap_or(config.definition_tone_style);
    let controller = Controller::with_config(config)?;

    for subtitle in subtitles {
        let deck = controller.export_deck(subtitle, tone_style)?;
        info!("Success: {:?}", deck);
    }

    Ok(())
}
