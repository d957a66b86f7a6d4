// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use shikshalok::app_config::{self, Config};
use shikshalok::translation::BlockStatus;
use shikshalok::{language_utils, AppError, Controller, FileOutcome};

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

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate a document, or every document in a directory
    Translate {
        /// Input document or directory to process
        #[arg(value_name = "INPUT_PATH")]
        input_path: PathBuf,

        /// Directory for the translated file (defaults to the input's directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Force overwrite of existing output files
        #[arg(short, long)]
        force_overwrite: bool,
    },

    /// Translate text given on the command line
    Text {
        /// Text to translate
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Transcribe a WAV recording and translate the transcript
    Transcribe {
        /// WAV file to transcribe
        #[arg(value_name = "AUDIO_FILE")]
        input_path: PathBuf,

        /// Print the transcript without translating it
        #[arg(long)]
        no_translate: bool,
    },

    /// Speak text in the target language
    Speak {
        /// Text to speak
        #[arg(required = true)]
        text: Vec<String>,

        /// Where to write the audio
        #[arg(short, long, default_value = "speech.wav")]
        output: PathBuf,
    },

    /// Replay a WAV recording through a live translation session
    Stream {
        /// WAV file to stream
        #[arg(value_name = "AUDIO_FILE")]
        input_path: PathBuf,
    },

    /// Show supported languages and document formats
    Status,

    /// Generate shell completions for shikshalok
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Shiksha Lok - educational content translation for Indian languages
///
/// Translates documents, text and speech between English and Indian
/// languages using the Sarvam API.
#[derive(Parser, Debug)]
#[command(name = "shikshalok")]
#[command(version)]
#[command(about = "Translate documents and speech into Indian languages")]
#[command(long_about = "Shiksha Lok translates documents, text and speech between English and the major Indian languages.

EXAMPLES:
    shikshalok translate notes.docx                 # Translate using default config
    shikshalok -t ta-IN translate notes.pdf -f      # Translate to Tamil, overwrite output
    shikshalok translate /lessons/                  # Process an entire directory
    shikshalok text \"Good morning, class\"           # Translate a sentence
    shikshalok -s auto transcribe lecture.wav       # Detect the spoken language
    shikshalok stream lecture.wav                   # Live translation of a recording
    shikshalok speak -o hello.wav \"नमस्ते\"           # Synthesize speech
    shikshalok status                               # Show supported formats
    shikshalok completions bash > shikshalok.bash   # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key can also be given with the
    SARVAM_API_KEY environment variable.

LANGUAGES:
    en-IN hi-IN bn-IN te-IN mr-IN ta-IN gu-IN kn-IN ml-IN od-IN pa-IN")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Source language code (e.g., 'en-IN', 'hi', 'auto')
    #[arg(short, long, global = true)]
    source_language: Option<String>,

    /// Target language code (e.g., 'hi-IN', 'ta')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Sarvam API subscription key
    #[arg(long, global = true, env = "SARVAM_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(CustomLogger { level: LevelFilter::Trace }))?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("shikshalok")
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let _ = writeln!(
                std::io::stderr(),
                "\x1B[{}m{} {:<5} {}\x1B[0m",
                Self::color_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    if CustomLogger::init(LevelFilter::Info).is_err() {
        eprintln!("Failed to initialize logger");
    }

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("[{}] {}", e.status_code(), e);
            ExitCode::FAILURE
        }
    }
}

/// Load the configuration file and apply command line overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config, AppError> {
    if let Some(cmd_log_level) = &cli.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(&cli.config_path)
        .context("Failed to load configuration")
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(source_language) = &cli.source_language {
        config.source_language = source_language.clone();
    }
    if let Some(target_language) = &cli.target_language {
        config.target_language = target_language.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.api.api_key = api_key.clone();
    }
    if let Some(log_level) = &cli.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(*shell, &mut cmd, "shikshalok", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli)?;

    if matches!(cli.command, Commands::Status) {
        let controller = Controller::with_config(config)?;
        print_status(&controller);
        return Ok(());
    }

    config
        .validate()
        .map_err(|e| AppError::Config(format!("Configuration validation failed: {:#}", e)))?;
    let controller = Controller::with_config(config)?;

    match cli.command {
        Commands::Translate {
            input_path,
            output_dir,
            force_overwrite,
        } => run_translate(&controller, &input_path, output_dir.as_deref(), force_overwrite).await,
        Commands::Text { text } => {
            let block = controller.translate_text(&text.join(" ")).await?;
            if let BlockStatus::PassedThrough { reason } = &block.status {
                warn!("Text was not translated: {}", reason);
            }
            println!("{}", block.translated_text);
            Ok(())
        }
        Commands::Transcribe {
            input_path,
            no_translate,
        } => {
            let transcript = controller.transcribe_file(&input_path).await?;
            if let Some(language) = &transcript.language_code {
                info!("Detected language: {}", language);
            }
            println!("{}", transcript.transcript);
            if !no_translate {
                let translation = controller.translate_transcript(&transcript).await?;
                println!("{}", translation.block.translated_text);
            }
            Ok(())
        }
        Commands::Speak { text, output } => {
            controller.speak(&text.join(" "), &output).await?;
            Ok(())
        }
        Commands::Stream { input_path } => {
            let session = controller.stream_file(&input_path).await?;
            info!(
                "Session {} finished with {} utterances",
                session.id(),
                session.history_len()
            );
            info!("{}", session.usage().summary(&controller.config().costs));
            println!("\n{}\n\n{}", session.original_transcript(), session.translated_transcript());
            Ok(())
        }
        Commands::Status | Commands::Completions { .. } => Ok(()),
    }
}

async fn run_translate(
    controller: &Controller,
    input_path: &Path,
    output_dir: Option<&Path>,
    force_overwrite: bool,
) -> Result<(), AppError> {
    if input_path.is_dir() {
        let summary = controller.run_folder(input_path, force_overwrite).await?;
        if summary.failed > 0 {
            warn!("{} documents could not be translated", summary.failed);
        }
        return Ok(());
    }

    let output_dir = output_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| input_path.parent().unwrap_or(Path::new(".")).to_path_buf());

    match controller.translate_file(input_path, &output_dir, force_overwrite).await? {
        FileOutcome::Translated(report) => {
            if report.passed_through_blocks > 0 {
                warn!(
                    "{} of {} blocks were kept untranslated",
                    report.passed_through_blocks, report.blocks
                );
            }
        }
        FileOutcome::Skipped { output_path } => {
            info!("Existing translation kept: {}", output_path.display());
        }
    }

    Ok(())
}

fn print_status(controller: &Controller) {
    let config = controller.config();
    println!("Source language: {}", describe_language(&config.source_language));
    println!("Target language: {}", describe_language(&config.target_language));
    println!(
        "API key: {}",
        if config.api.api_key.trim().is_empty() { "missing" } else { "configured" }
    );

    println!("\nLanguages:");
    for code in language_utils::supported_languages() {
        println!("  {}", describe_language(&code));
    }

    println!("\nDocument formats:");
    for (file_type, reason) in controller.status() {
        match reason {
            None => println!("  {:<6} available", file_type.name()),
            Some(reason) => println!("  {:<6} unavailable ({})", file_type.name(), reason),
        }
    }
}

fn describe_language(code: &str) -> String {
    match language_utils::get_language_name(code) {
        Ok(name) => format!("{} ({})", code, name),
        Err(_) => format!("{} (unsupported)", code),
    }
}
