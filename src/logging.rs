/*!
 * Per-run logging.
 *
 * A `RunLogger` writes every record to the run log file and to a console
 * stream. It is an ordinary object handed to the orchestrator and the engine;
 * `install_global` optionally routes the `log` facade to it as well.
 * `LogSession` owns the logger for one run and flushes it when dropped.
 */

use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use parking_lot::Mutex;
use std::fmt;
use std::fs::File;
use std::io::{self, LineWriter, Write};
use std::sync::Arc;

use crate::app_config::LoggingConfig;
use crate::errors::PipelineError;
use crate::file_utils::FileManager;
use crate::run_context::{RunContext, RunId};

/// Timestamp pattern of a log line, e.g. `2025-03-14 09:30:12,345`
pub const LOG_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Logger writing each record to a file and a console stream
pub struct RunLogger {
    level: LevelFilter,
    quiet_targets: Vec<String>,
    file: Mutex<LineWriter<File>>,
    console: Mutex<Box<dyn Write + Send>>,
    color: bool,
}

impl RunLogger {
    // @creates: Logger over an already opened log file
    pub fn new(level: LevelFilter, file: File, console: Box<dyn Write + Send>, color: bool) -> Self {
        Self {
            level,
            quiet_targets: Vec::new(),
            file: Mutex::new(LineWriter::new(file)),
            console: Mutex::new(console),
            color,
        }
    }

    /// Limit the given targets (and their sub-modules) to warnings and errors
    pub fn with_quiet_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.quiet_targets = targets.into_iter().map(Into::into).collect();
        self
    }

    pub fn level(&self) -> LevelFilter {
        self.level
    }

    /// Log a message under an explicit target without going through the global facade
    pub fn emit(&self, level: Level, target: &str, args: fmt::Arguments<'_>) {
        self.log(
            &Record::builder()
                .args(args)
                .level(level)
                .target(target)
                .build(),
        );
    }

    fn is_quiet(&self, target: &str) -> bool {
        self.quiet_targets.iter().any(|quiet| {
            target == quiet
                || target
                    .strip_prefix(quiet.as_str())
                    .is_some_and(|rest| rest.starts_with("::"))
        })
    }

    /// Render a record as `<timestamp> [<LEVEL>] <target> - <message>`
    pub fn format_line(record: &Record<'_>) -> String {
        format!(
            "{} [{}] {} - {}",
            Local::now().format(LOG_TIMESTAMP_FORMAT),
            level_name(record.level()),
            record.target(),
            record.args()
        )
    }

    // @returns: ANSI color for level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl fmt::Debug for RunLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunLogger")
            .field("level", &self.level)
            .field("quiet_targets", &self.quiet_targets)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// Upper-case level name as written to the log file
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

impl Log for RunLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        if metadata.level() > self.level {
            return false;
        }
        metadata.level() <= Level::Warn || !self.is_quiet(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_line(record);

        // Sink failures must not take the pipeline down with them
        let _ = writeln!(self.file.lock(), "{}", line);

        let mut console = self.console.lock();
        let _ = if self.color {
            writeln!(
                console,
                "{}{}\x1B[0m",
                Self::color_for_level(record.level()),
                line
            )
        } else {
            writeln!(console, "{}", line)
        };
    }

    fn flush(&self) {
        let _ = self.file.lock().flush();
        let _ = self.console.lock().flush();
    }
}

/// Forwards the global `log` facade to a shared `RunLogger`
struct GlobalBridge(Arc<RunLogger>);

impl Log for GlobalBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.0.enabled(metadata)
    }

    fn log(&self, record: &Record) {
        self.0.log(record)
    }

    fn flush(&self) {
        self.0.flush()
    }
}

/// Route `log::info!` and friends to `logger`
///
/// Can succeed at most once per process.
pub fn install_global(logger: Arc<RunLogger>) -> Result<(), SetLoggerError> {
    let level = logger.level();
    log::set_boxed_logger(Box::new(GlobalBridge(logger)))?;
    log::set_max_level(level);
    Ok(())
}

/// Logging state of one run
pub struct LogSession {
    context: RunContext,
    logger: Arc<RunLogger>,
}

impl LogSession {
    /// Create the logs directory if needed, open the run log and build the logger
    pub fn open(
        config: &LoggingConfig,
        run_id: RunId,
        console: Box<dyn Write + Send>,
        color: bool,
    ) -> Result<Self, PipelineError> {
        let context = RunContext::new(run_id, &config.logs_dir);

        let file = FileManager::open_append(&context.log_file_path).map_err(|source| {
            PipelineError::Logging {
                path: context.log_file_path.clone(),
                source,
            }
        })?;

        let logger = RunLogger::new(config.level.to_level_filter(), file, console, color)
            .with_quiet_targets(config.quiet_targets.iter().cloned());

        Ok(Self {
            context,
            logger: Arc::new(logger),
        })
    }

    pub fn context(&self) -> &RunContext {
        &self.context
    }

    pub fn logger(&self) -> &Arc<RunLogger> {
        &self.logger
    }
}

impl Drop for LogSession {
    fn drop(&mut self) {
        self.logger.flush();
    }
}

/// Open the run log for the current second, logging to stdout
pub fn initialize_logging(config: &LoggingConfig) -> Result<LogSession, PipelineError> {
    let color = io::IsTerminal::is_terminal(&io::stdout());
    LogSession::open(config, RunId::now(), Box::new(io::stdout()), color)
}
