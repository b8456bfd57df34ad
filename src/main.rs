// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow, Context};
use log::{warn, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::path::{Path, PathBuf};
use std::io::Write;
use std::fs::File;
use std::io::BufReader;
use clap::{Args, Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use mdsync::app_config::{self, Config, EngineKind, VersioningMode};
use mdsync::Controller;

/// CLI Wrapper for EngineKind to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliEngine {
    #[value(name = "deepl")]
    DeepL,
    Disabled,
}

impl From<CliEngine> for EngineKind {
    fn from(cli_engine: CliEngine) -> Self {
        match cli_engine {
            CliEngine::DeepL => EngineKind::DeepL,
            CliEngine::Disabled => EngineKind::Disabled,
        }
    }
}

/// CLI Wrapper for VersioningMode to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliVersioning {
    Disabled,
    Json,
    Sql,
}

impl From<CliVersioning> for VersioningMode {
    fn from(cli_versioning: CliVersioning) -> Self {
        match cli_versioning {
            CliVersioning::Disabled => VersioningMode::Disabled,
            CliVersioning::Json => VersioningMode::Json,
            CliVersioning::Sql => VersioningMode::Sql,
        }
    }
}

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
    /// Synchronize translated trees with the source tree (default command)
    #[command(alias = "update")]
    Sync(SyncArgs),

    /// Generate shell completions for mdsync
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct SyncOptions {
    /// Destination language codes, comma separated (e.g. 'fr,de')
    #[arg(short = 'l', long, value_delimiter = ',')]
    languages: Option<Vec<String>>,

    /// Source language code, detected by the engine when empty
    #[arg(short, long)]
    source_language: Option<String>,

    /// Hash inventory mode
    #[arg(long, value_enum)]
    versioning: Option<CliVersioning>,

    /// Translation engine to use
    #[arg(short, long, value_enum)]
    engine: Option<CliEngine>,

    /// Translation API key
    #[arg(long, env = "MDSYNC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Remove translated files whose source no longer exists
    #[arg(short, long)]
    keep_clean: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "mdsync.json")]
    config: String,

    /// Set logging level
    #[arg(long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct SyncArgs {
    /// Source directory
    #[arg(value_name = "SOURCE")]
    source: PathBuf,

    /// Destination directory, one sub-folder per language
    #[arg(value_name = "DESTINATION")]
    destination: PathBuf,

    #[command(flatten)]
    options: SyncOptions,
}

/// mdsync - Incremental translation of Markdown trees
#[derive(Parser, Debug)]
#[command(name = "mdsync")]
#[command(version)]
#[command(about = "Keep translated Markdown trees in sync with their source")]
#[command(long_about = "mdsync mirrors a tree of Markdown documents into one translated tree per language,
retranslating only the blocks that changed since the previous run.

EXAMPLES:
    mdsync docs translations                      # Sync using default config
    mdsync -l fr,de docs translations             # Translate to French and German
    mdsync --versioning json docs translations    # Keep block identities in hashes.json
    mdsync -e disabled docs translations          # Mirror without translating
    mdsync -k docs translations                   # Remove translations of deleted files
    mdsync completions bash > mdsync.bash         # Generate bash completions

CONFIGURATION:
    Configuration is stored in mdsync.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically. The API key can also be given through the
    MDSYNC_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source directory
    #[arg(value_name = "SOURCE")]
    source: Option<PathBuf>,

    /// Destination directory, one sub-folder per language
    #[arg(value_name = "DESTINATION")]
    destination: Option<PathBuf>,

    #[command(flatten)]
    options: SyncOptions,
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

    // @returns: ANSI color of a log level
    fn get_color_for_level(level: Level) -> &'static str {
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
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::get_color_for_level(record.level()),
                now,
                Self::get_emoji_for_level(record.level()),
                record.args()
            );
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
    // Trace lets set_max_level raise the level once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mdsync", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Sync(args)) => run_sync(args).await,
        None => {
            let source = cli.source.ok_or_else(|| {
                anyhow!("SOURCE is required when no subcommand is specified")
            })?;
            let destination = cli.destination.ok_or_else(|| {
                anyhow!("DESTINATION is required when no subcommand is specified")
            })?;

            run_sync(SyncArgs { source, destination, options: cli.options }).await
        }
    }
}

/// Load the configuration file, creating a default one when missing
fn load_config(config_path: &str) -> Result<Config> {
    if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?;
        Ok(config)
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        Ok(config)
    }
}

/// Override configuration values with the ones given on the command line
fn apply_overrides(config: &mut Config, options: &SyncOptions) {
    if let Some(languages) = &options.languages {
        config.destination_languages = languages
            .iter()
            .map(|language| language.trim().to_string())
            .filter(|language| !language.is_empty())
            .collect();
    }

    if let Some(source_language) = &options.source_language {
        config.source_language = source_language.clone();
    }

    if let Some(versioning) = &options.versioning {
        config.versioning = versioning.clone().into();
    }

    if let Some(engine) = &options.engine {
        config.translation.engine = engine.clone().into();
    }

    if let Some(api_key) = &options.api_key {
        config.translation.api_key = api_key.clone();
    }

    if options.keep_clean {
        config.keep_clean = true;
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

async fn run_sync(args: SyncArgs) -> Result<()> {
    if let Some(cmd_log_level) = &args.options.log_level {
        log::set_max_level(level_filter(&cmd_log_level.clone().into()));
    }

    let mut config = load_config(&args.options.config)?;
    apply_overrides(&mut config, &args.options);

    config.validate()
        .context("Configuration validation failed")?;

    log::set_max_level(level_filter(&config.log_level));

    let controller = Controller::with_config(config)?;
    let report = controller.sync(&args.source, &args.destination).await?;

    if report.failed > 0 {
        warn!("{} file(s) could not be synchronized", report.failed);
    }

    Ok(())
}
