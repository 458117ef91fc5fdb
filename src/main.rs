// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{error, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use scriptbreak::app_config::{self, Config};
use scriptbreak::app_controller::{exit_code_for, scene_table, Controller};
use scriptbreak::screenplay::model::ScreenplayFormat;

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

/// CLI Wrapper for ScreenplayFormat to implement ValueEnum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliFormat {
    Text,
    Pdf,
    Fdx,
}

impl From<CliFormat> for ScreenplayFormat {
    fn from(cli_format: CliFormat) -> Self {
        match cli_format {
            CliFormat::Text => ScreenplayFormat::Text,
            CliFormat::Pdf => ScreenplayFormat::Pdf,
            CliFormat::Fdx => ScreenplayFormat::Fdx,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Parse a screenplay file or a folder of screenplays into scene JSON
    Parse(ParseArgs),

    /// Print the scene list of one screenplay
    Scenes(ScenesArgs),

    /// Generate shell completions for scriptbreak
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct ParseArgs {
    /// Input screenplay file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Input dialect, detected from the file when omitted
    #[arg(long, value_enum)]
    format: Option<CliFormat>,

    /// Print the JSON to stdout instead of writing a file
    #[arg(long)]
    stdout: bool,
}

#[derive(Parser, Debug)]
struct ScenesArgs {
    /// Input screenplay file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Input dialect, detected from the file when omitted
    #[arg(long, value_enum)]
    format: Option<CliFormat>,
}

/// scriptbreak - screenplay structural parser
///
/// Splits screenplays into numbered scenes from plain text, PDF or
/// Final Draft XML.
#[derive(Parser, Debug)]
#[command(name = "scriptbreak")]
#[command(version)]
#[command(about = "Screenplay scene breakdown parser")]
#[command(long_about = "scriptbreak splits screenplays into an ordered list of numbered scenes.

EXAMPLES:
    scriptbreak parse script.pdf                 # Writes script.scenes.json
    scriptbreak parse -f script.fdx              # Overwrite existing output
    scriptbreak parse --format text notes.md     # Force the plaintext dialect
    scriptbreak parse --stdout script.txt        # Print JSON instead of writing it
    scriptbreak parse -l debug /scripts/         # Process an entire directory
    scriptbreak scenes script.fdx                # Print a scene table
    scriptbreak completions bash > scriptbreak.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
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

    // @returns: Prefix and ANSI colour for a level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
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
            let (label, colour) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", colour, now, label, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() {
    // The logger accepts everything; the effective level is set through max_level
    if let Err(e) = CustomLogger::init(LevelFilter::Trace) {
        eprintln!("Failed to initialize logger: {}", e);
    }
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let result = match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "scriptbreak", &mut std::io::stdout());
            Ok(())
        }
        Commands::Parse(args) => run_parse(args).await,
        Commands::Scenes(args) => run_scenes(args).await,
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(exit_code_for(&e));
    }
}

fn apply_log_level(level: &app_config::LogLevel) {
    log::set_max_level(level.to_level_filter());
}

/// Load the config file, creating it with defaults if missing
fn load_config(config_path: &str, log_level: Option<&CliLogLevel>) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = log_level {
        apply_log_level(&cmd_log_level.clone().into());
    }

    let mut config = if Path::new(config_path).exists() {
        let contents = std::fs::read_to_string(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        Config::from_json(&contents).context(format!("Failed to load config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json =
            serde_json::to_string_pretty(&config).context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    match log_level {
        Some(level) => config.log_level = level.clone().into(),
        None => apply_log_level(&config.log_level),
    }

    Ok(config)
}

async fn run_parse(options: ParseArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;
    let controller = Controller::with_config(config)?;
    let format = options.format.map(ScreenplayFormat::from);

    if options.input_path.is_file() {
        if options.stdout {
            let parsed = controller.parse(&options.input_path, format).await?;
            println!("{}", controller.to_json(&parsed)?);
            return Ok(());
        }

        controller
            .run(
                options.input_path.clone(),
                options.input_path.parent().unwrap_or(Path::new(".")).to_path_buf(),
                options.force_overwrite,
                format,
            )
            .await?;
    } else if options.input_path.is_dir() {
        if options.stdout || format.is_some() {
            warn!("--stdout and --format apply to single files only, ignoring them for a folder");
        }

        let summary = controller
            .run_folder(options.input_path.clone(), options.force_overwrite)
            .await?;

        if summary.errors > 0 {
            return Err(anyhow!("{} file(s) failed to parse", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}

async fn run_scenes(options: ScenesArgs) -> Result<()> {
    let config = load_config(&options.config_path, options.log_level.as_ref())?;
    let controller = Controller::with_config(config)?;

    let parsed = controller
        .parse(&options.input, options.format.map(ScreenplayFormat::from))
        .await?;

    print!("{}", scene_table(&parsed));
    for warning in &parsed.warnings {
        warn!("{}", warning);
    }

    Ok(())
}
