// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use mtloc::app_config::{self, Config, ConfigOverrides};
use mtloc::app_controller::Controller;
use mtloc::engine::CommandEngineFactory;
use mtloc::reporter::ConsoleReporter;

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
    /// Run the translation pipeline (default command)
    Run(RunArgs),

    /// Generate shell completions for mtloc
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug, Clone)]
struct RunArgs {
    /// Configuration file path [default: conf.json if present]
    #[arg(short, long, env = "MTLOC_CONFIG")]
    config_path: Option<PathBuf>,

    /// Target language code (e.g. 'fr', 'pt-BR')
    #[arg(short, long)]
    target_lang: Option<String>,

    /// Comma-separated sheets to translate
    #[arg(short, long, value_delimiter = ',')]
    sheets: Option<Vec<String>>,

    /// Number of keys per engine batch
    #[arg(short, long)]
    batch_size: Option<usize>,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Directory for run logs and status ledgers
    #[arg(long)]
    logs_dir: Option<PathBuf>,

    /// Engine program to execute
    #[arg(short, long)]
    engine_command: Option<String>,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            target_lang: self.target_lang.clone(),
            sheets_to_translate: self
                .sheets
                .as_ref()
                .map(|sheets| app_config::parse_sheet_list(&sheets.join(","))),
            batch_size: self.batch_size,
            log_level: self.log_level.clone().map(Into::into),
            logs_dir: self.logs_dir.clone(),
            engine_command: self.engine_command.clone(),
        }
    }
}

/// mtloc - machine translation for game localization
#[derive(Parser, Debug)]
#[command(name = "mtloc")]
#[command(version)]
#[command(about = "Machine-translation pipeline for game localization")]
#[command(args_conflicts_with_subcommands = true)]
#[command(long_about = "mtloc runs a localization engine over the configured sheets and reports the outcome.

EXAMPLES:
    mtloc                                   # Run with conf.json
    mtloc -t de -s UI,Dialogue              # Translate two sheets to German
    mtloc -c prod.json --log-level debug    # Use another config with debug logging
    mtloc completions bash > mtloc.bash     # Generate bash completions

CONFIGURATION:
    Settings are read from conf.json (or --config / MTLOC_CONFIG), then from
    MTLOC_* environment variables, then from command-line flags.

EXIT CODES:
    0    pipeline completed
    1    fatal error
    130  interrupted by user")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "mtloc", &mut io::stdout());
            ExitCode::SUCCESS
        }
        Some(Commands::Run(args)) => run(args).await,
        None => run(cli.run).await,
    }
}

async fn run(args: RunArgs) -> ExitCode {
    let config = Config::load(args.config_path.as_deref(), &args.overrides());

    let reporter = ConsoleReporter::stdout(io::stdout().is_terminal());
    let mut controller = Controller::new(reporter).with_global_logger(true);

    let outcome = controller
        .run(config, &CommandEngineFactory, interrupt_signal())
        .await;

    ExitCode::from(outcome.exit_code())
}

// Resolves on Ctrl+C; never resolves if the handler cannot be installed
async fn interrupt_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
