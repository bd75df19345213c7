use log::Level;
use std::error::Error;
use std::future::Future;
use std::io::{self, Write};

use crate::app_config::Config;
use crate::engine::{EngineFactory, LocalizationEngine};
use crate::errors::{ConfigError, EngineError, PipelineError};
use crate::logging::{self, LogSession, RunLogger};
use crate::reporter::Reporter;
use crate::run_context::{RunContext, RunId};

// @module: Pipeline orchestration from config to exit code

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 130;

const BANNER_WIDTH: usize = 80;

macro_rules! run_log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.emit($level, module_path!(), format_args!($($arg)+))
    };
}

/// Terminal result of one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Engine completed; the context names the run's log and ledger files
    Success { context: RunContext },
    /// Operator cancelled the run
    Interrupted,
    /// Config, logging or engine failure
    Failed { message: String },
}

impl RunOutcome {
    // @returns: Process exit code for this outcome
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Success { .. } => EXIT_SUCCESS,
            Self::Interrupted => EXIT_INTERRUPTED,
            Self::Failed { .. } => EXIT_FAILURE,
        }
    }
}

/// Result of a single engine invocation
#[derive(Debug)]
pub enum EngineOutcome {
    Completed,
    Interrupted,
    Failed(EngineError),
}

/// Run the engine until it finishes or `interrupt` resolves
///
/// An engine reporting `EngineError::Interrupted` itself counts as an interrupt.
pub async fn invoke_engine<I>(engine: &dyn LocalizationEngine, interrupt: I) -> EngineOutcome
where
    I: Future<Output = ()>,
{
    tokio::select! {
        biased;
        result = engine.run() => match result {
            Ok(()) => EngineOutcome::Completed,
            Err(EngineError::Interrupted) => EngineOutcome::Interrupted,
            Err(e) => EngineOutcome::Failed(e),
        },
        _ = interrupt => EngineOutcome::Interrupted,
    }
}

/// Main application controller: config → logging → engine → report
pub struct Controller<R: Reporter> {
    reporter: R,
    log_console: Option<Box<dyn Write + Send>>,
    log_color: bool,
    install_global_logger: bool,
}

impl<R: Reporter> Controller<R> {
    // @method: Create a controller logging to stdout
    pub fn new(reporter: R) -> Self {
        Self {
            reporter,
            log_console: None,
            log_color: io::IsTerminal::is_terminal(&io::stdout()),
            install_global_logger: false,
        }
    }

    /// Send console log records to `console` instead of stdout
    pub fn with_log_console(mut self, console: Box<dyn Write + Send>, color: bool) -> Self {
        self.log_console = Some(console);
        self.log_color = color;
        self
    }

    /// Also route the global `log` facade to the run logger
    pub fn with_global_logger(mut self, install: bool) -> Self {
        self.install_global_logger = install;
        self
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn into_reporter(self) -> R {
        self.reporter
    }

    /// Execute one run and decide its outcome
    ///
    /// # Arguments
    /// * `config` - Result of loading configuration; an error ends the run as fatal
    /// * `factory` - Builds the engine once logging is set up
    /// * `interrupt` - Resolves when the operator cancels the run
    pub async fn run<F, I>(
        &mut self,
        config: Result<Config, ConfigError>,
        factory: &F,
        interrupt: I,
    ) -> RunOutcome
    where
        F: EngineFactory + ?Sized,
        I: Future<Output = ()>,
    {
        let config = match config {
            Ok(config) => config,
            Err(e) => return self.fail(None, PipelineError::Config(e)),
        };

        let console = self
            .log_console
            .take()
            .unwrap_or_else(|| Box::new(io::stdout()));
        let session = match LogSession::open(&config.logging, RunId::now(), console, self.log_color) {
            Ok(session) => session,
            Err(e) => return self.fail(None, e),
        };

        if self.install_global_logger {
            if let Err(e) = logging::install_global(session.logger().clone()) {
                run_log!(session.logger(), Level::Warn, "Global logger already installed: {}", e);
            }
        }

        let translation = &config.translation;
        self.reporter.render_header(&config.ui.title);
        self.reporter.render_config(
            &translation.target_lang,
            &translation.sheets_to_translate,
            translation.batch_size,
        );

        let context = session.context().clone();
        let logger: &RunLogger = session.logger();

        run_log!(logger, Level::Info, "{}", "=".repeat(BANNER_WIDTH));
        run_log!(logger, Level::Info, "Run ID: {}", context.run_id);
        run_log!(logger, Level::Info, "Target Language: {}", translation.target_lang);
        run_log!(logger, Level::Info, "Sheets to Translate: {:?}", translation.sheets_to_translate);
        run_log!(logger, Level::Info, "{}", "=".repeat(BANNER_WIDTH));

        let engine = match factory.create(&config, &context.keys_log_path, session.logger().clone()) {
            Ok(engine) => engine,
            Err(e) => return self.fail(Some(logger), e.into()),
        };

        match invoke_engine(engine.as_ref(), interrupt).await {
            EngineOutcome::Completed => {
                self.reporter.render_success(&context);
                run_log!(logger, Level::Info, "{}", "=".repeat(BANNER_WIDTH));
                run_log!(logger, Level::Info, "Translation pipeline completed successfully");
                run_log!(logger, Level::Info, "{}", "=".repeat(BANNER_WIDTH));
                RunOutcome::Success { context }
            }
            EngineOutcome::Interrupted => {
                self.reporter.render_interrupt();
                run_log!(logger, Level::Warn, "Translation interrupted by user");
                RunOutcome::Interrupted
            }
            EngineOutcome::Failed(e) => self.fail(Some(logger), e.into()),
        }
    }

    fn fail(&mut self, logger: Option<&RunLogger>, error: PipelineError) -> RunOutcome {
        self.reporter.render_fatal(&error);

        if let Some(logger) = logger {
            run_log!(logger, Level::Error, "Fatal error: {}", error);

            // Skip causes already spelled out by the outer message
            let mut shown = error.to_string();
            let mut source = error.source();
            while let Some(cause) = source {
                let text = cause.to_string();
                if !shown.contains(&text) {
                    run_log!(logger, Level::Error, "Caused by: {}", text);
                    shown = text;
                }
                source = cause.source();
            }
        }

        RunOutcome::Failed {
            message: error.to_string(),
        }
    }
}
