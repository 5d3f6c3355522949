// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::io::Write;
use std::path::PathBuf;

use resfill::app_config::{self, Config, TranslationProvider, parse_language_list};
use resfill::app_controller::Controller;
use resfill::translation::TranslationService;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    Mock,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::Mock => TranslationProvider::Mock,
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
    /// Fill missing translations (default command)
    Sync(SyncArgs),

    /// Check that every source and target dictionary is well-formed XML
    Validate(CommonArgs),

    /// Generate shell completions for resfill
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by every command that reads dictionaries
#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Android res/ directory
    #[arg(short, long, value_name = "DIR")]
    res_dir: Option<PathBuf>,

    /// Comma-separated target language qualifiers (e.g. 'ja,ko,zh-rCN')
    #[arg(short = 'L', long, env = "LANGUAGES")]
    languages: Option<String>,

    /// Comma-separated dictionary file names; an empty value discovers all
    #[arg(long)]
    files: Option<String>,

    /// Configuration file path [default: resfill.json when present]
    #[arg(short, long, value_name = "PATH")]
    config_path: Option<PathBuf>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Options of the sync command
#[derive(Args, Debug, Clone)]
struct SyncArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Translation API key; without one the run only reports gaps
    #[arg(long, env = "GOOGLE_TRANSLATE_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Maximum concurrent translation requests per file
    #[arg(long)]
    concurrency: Option<usize>,

    /// Create target files that do not exist yet
    #[arg(long)]
    create_missing: bool,

    /// Do everything except writing files
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Exit non-zero when any file fails
    #[arg(long)]
    strict: bool,

    /// Write the run report as JSON to this path
    #[arg(long, value_name = "PATH")]
    report_json: Option<PathBuf>,
}

/// resfill - fill missing Android string resources with machine translations
///
/// Compares res/values/<file> against res/values-<lang>/<file> and adds a
/// machine translation, marked with an `MT fallback` comment, for every entry
/// the target language lacks. Human translations are never touched.
#[derive(Parser, Debug)]
#[command(name = "resfill")]
#[command(version)]
#[command(about = "Fill missing Android string resources with machine translations")]
#[command(long_about = "resfill compares the default string resources with each target language and fills gaps using a translation service.

EXAMPLES:
    resfill                                      # Sync ja,ko,vi using GOOGLE_TRANSLATE_API_KEY
    resfill -L de,fr --res-dir app/src/main/res  # Sync other languages
    resfill --dry-run                            # Report what would be translated
    resfill --provider mock --create-missing     # Exercise the pipeline offline
    resfill validate                             # Check all dictionaries are well-formed
    resfill completions bash > resfill.bash      # Generate bash completions

CONFIGURATION:
    Settings are read from resfill.json when it exists. Command line options and
    the LANGUAGES / GOOGLE_TRANSLATE_API_KEY environment variables override it.
    Without an API key the run still parses, diffs and reports.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    sync: SyncArgs,
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

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
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
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The logger accepts everything; the effective level is set later
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    let exit_code = match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "resfill", &mut std::io::stdout());
            return Ok(());
        }
        Some(Commands::Validate(args)) => run_validate(args)?,
        Some(Commands::Sync(args)) => run_sync(args).await?,
        None => run_sync(cli.sync).await?,
    };

    log::logger().flush();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}

// @method: Load the config file and apply the shared command line overrides
fn load_config(options: &CommonArgs) -> Result<Config> {
    if let Some(level) = &options.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_default(options.config_path.as_deref())?;
    if let Some(path) = &options.config_path {
        info!("Loaded configuration from {}", path.display());
    }

    if let Some(res_dir) = &options.res_dir {
        config.res_dir = res_dir.clone();
    }
    if let Some(languages) = &options.languages {
        config.languages = parse_language_list(languages);
    }
    if let Some(files) = &options.files {
        config.string_files = parse_language_list(files);
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    Ok(config)
}

async fn run_sync(options: SyncArgs) -> Result<i32> {
    let mut config = load_config(&options.common)?;

    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(api_key) = &options.api_key {
        config.translation.api_key = Some(api_key.clone());
    }
    if let Some(concurrency) = options.concurrency {
        config.translation.concurrent_requests = concurrency;
    }
    if options.create_missing {
        config.create_missing_targets = true;
    }
    if options.dry_run {
        config.dry_run = true;
    }

    config.validate().context("Configuration validation failed")?;

    if !config.res_dir.is_dir() {
        return Err(anyhow!("Resource directory does not exist: {:?}", config.res_dir));
    }

    let controller = Controller::with_config(config)?;
    let report = controller.run().await?;

    if let Some(path) = &options.report_json {
        report.write_json(path)?;
        info!("Report written to {}", path.display());
    }

    let exit_code = report.exit_code(options.strict);
    if report.is_total_failure() {
        error!("Run failed: no job or translation succeeded");
    } else if exit_code != 0 {
        warn!("{} file(s) failed in strict mode", report.files_failed);
    }
    Ok(exit_code)
}

fn run_validate(options: CommonArgs) -> Result<i32> {
    let config = load_config(&options)?;
    let controller = Controller::with_service(config, TranslationService::disabled());

    let broken = controller.validate_all()?;
    if broken.is_empty() {
        info!("All dictionaries are well-formed");
        Ok(0)
    } else {
        error!("{} malformed dictionar{}", broken.len(), if broken.len() == 1 { "y" } else { "ies" });
        Ok(1)
    }
}
