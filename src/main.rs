// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use yabtwai::app_config::{Config, LogLevel};
use yabtwai::app_controller::{Controller, ResumePolicy};
use yabtwai::chapter_segmenter::SegmentMode;
use yabtwai::dictionary;
use yabtwai::file_utils::FileManager;
use yabtwai::providers::mock::MockTranslator;
use yabtwai::providers::Translator;
use yabtwai::session::FileSessionStore;

/// CLI wrapper for SegmentMode to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliSegmentMode {
    Single,
    Multiple,
}

impl From<CliSegmentMode> for SegmentMode {
    fn from(mode: CliSegmentMode) -> Self {
        match mode {
            CliSegmentMode::Single => SegmentMode::Single,
            CliSegmentMode::Multiple => SegmentMode::Multiple,
        }
    }
}

/// CLI wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Available translation providers
///
/// Concrete API clients implement the `Translator` trait; the mock provider
/// echoes content through the full pipeline without network access.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliProvider {
    Mock,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate book chapters using AI providers (default command)
    Translate(TranslateArgs),

    /// Detect and report chapter boundaries without translating
    Analyze(AnalyzeArgs),

    /// Export the configured dictionary to a text file
    ExportDictionary {
        /// Output file (one original=translation mapping per line)
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Configuration file path
        #[arg(short, long, default_value = "conf.json")]
        config_path: String,
    },

    /// Generate shell completions for yabtwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input text file or directory of .txt files to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for translated files
    #[arg(short, long, default_value = "translated")]
    output_dir: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum, default_value = "mock")]
    provider: CliProvider,

    /// How files without recognizable headings are treated
    /// (default: single for one input file, multiple otherwise)
    #[arg(long, value_enum)]
    mode: Option<CliSegmentMode>,

    /// Import a dictionary file (one original=translation mapping per line)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Resume the persisted unfinished session
    #[arg(long)]
    resume: bool,

    /// Discard the persisted unfinished session and start fresh
    #[arg(long, conflicts_with = "resume")]
    discard_session: bool,

    /// Session slot path (default: per-user data directory)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Input text file or directory of .txt files to analyze
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// How files without recognizable headings are treated
    #[arg(long, value_enum)]
    mode: Option<CliSegmentMode>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// YABTwAI - Yet Another Book Translator with AI
///
/// Detects chapter boundaries in raw text files and translates the chapters
/// through an AI provider, with resumable progress.
#[derive(Parser, Debug)]
#[command(name = "yabtwai")]
#[command(author = "YABTwAI Team")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered book chapter translation tool")]
#[command(long_about = "YABTwAI splits raw text files into chapters and translates them \
chapter by chapter using an AI provider.

EXAMPLES:
    yabtwai book.txt                        # Translate using default config
    yabtwai analyze book.txt                # Report detected chapters only
    yabtwai -m gemini-2.5-pro book.txt      # Use a specific model
    yabtwai --mode multiple ./chapters/     # Per-file chapters from a directory
    yabtwai --resume book.txt               # Continue an interrupted run
    yabtwai -d glossary.txt book.txt        # Import a custom dictionary
    yabtwai completions bash > yabtwai.bash # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. The same file doubles as
    the settings preset format; missing fields fall back to defaults. If the
    config file doesn't exist, a default one is created automatically.

SESSIONS:
    Progress is persisted after every translated chunk. An interrupted or
    failed run leaves a session behind; rerun with --resume to continue it
    from the exact chunk it stopped at, or --discard-session to drop it.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input text file or directory of .txt files to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for translated files
    #[arg(short, long, default_value = "translated")]
    output_dir: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Translation provider to use
    #[arg(short, long, value_enum, default_value = "mock")]
    provider: CliProvider,

    /// How files without recognizable headings are treated
    #[arg(long, value_enum)]
    mode: Option<CliSegmentMode>,

    /// Import a dictionary file (one original=translation mapping per line)
    #[arg(short, long)]
    dictionary: Option<PathBuf>,

    /// Resume the persisted unfinished session
    #[arg(long)]
    resume: bool,

    /// Discard the persisted unfinished session and start fresh
    #[arg(long, conflicts_with = "resume")]
    discard_session: bool,

    /// Session slot path (default: per-user data directory)
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
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

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }

    // @returns: ANSI color code for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let emoji = Self::get_emoji_for_level(record.level());
            let color = Self::get_color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Error => LevelFilter::Error,
        LogLevel::Warn => LevelFilter::Warn,
        LogLevel::Info => LevelFilter::Info,
        LogLevel::Debug => LevelFilter::Debug,
        LogLevel::Trace => LevelFilter::Trace,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "yabtwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Analyze(args)) => run_analyze(args),
        Some(Commands::ExportDictionary {
            output,
            config_path,
        }) => {
            let config = Config::from_file(&config_path)?;
            FileManager::write_to_file(&output, &dictionary::export(&config.translation.dictionary))?;
            log::info!(
                "Exported {} dictionary entries to {:?}",
                config.translation.dictionary.len(),
                output
            );
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                config_path: cli.config_path,
                model: cli.model,
                provider: cli.provider,
                mode: cli.mode,
                dictionary: cli.dictionary,
                resume: cli.resume,
                discard_session: cli.discard_session,
                session_file: cli.session_file,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

fn run_analyze(options: AnalyzeArgs) -> Result<()> {
    if let Some(level) = &options.log_level {
        log::set_max_level(level_filter(level.clone().into()));
    }

    let controller = Controller::new(
        Config::default(),
        build_translator(CliProvider::Mock),
        Arc::new(FileSessionStore::new_default()),
    );
    controller.analyze(&options.input_path, options.mode.map(Into::into))?;
    Ok(())
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        log::set_max_level(level_filter(cmd_log_level.clone().into()));
    }

    // Load or create configuration
    let config_path = &options.config_path;
    let mut config = if std::path::Path::new(config_path).exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .context("Failed to write default config file")?;
        config
    };

    // Override config with CLI options if provided
    if let Some(model) = &options.model {
        config.translation.model = model.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if options.log_level.is_none() {
        log::set_max_level(level_filter(config.log_level));
    }

    // Merge an imported dictionary file into the session's dictionary
    if let Some(dictionary_path) = &options.dictionary {
        let content = FileManager::read_to_string(dictionary_path)?;
        let imported = dictionary::parse_import(&content, &config.translation.dictionary);
        log::info!(
            "Imported {} dictionary entries from {:?}",
            imported.len(),
            dictionary_path
        );
        config.translation.dictionary.extend(imported);
    }

    let store: Arc<FileSessionStore> = Arc::new(match &options.session_file {
        Some(path) => FileSessionStore::new(path),
        None => FileSessionStore::new_default(),
    });

    let policy = if options.resume {
        ResumePolicy::Resume
    } else if options.discard_session {
        ResumePolicy::Discard
    } else {
        ResumePolicy::Fresh
    };

    let controller = Controller::new(config, build_translator(options.provider), store);
    controller
        .run(
            &options.input_path,
            &options.output_dir,
            options.mode.map(Into::into),
            policy,
        )
        .await
}

fn build_translator(provider: CliProvider) -> Arc<dyn Translator> {
    match provider {
        CliProvider::Mock => Arc::new(MockTranslator::working()),
    }
}
