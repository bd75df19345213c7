use async_trait::async_trait;
use log::Level;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;

use super::{EngineFactory, LocalizationEngine};
use crate::app_config::Config;
use crate::errors::EngineError;
use crate::logging::RunLogger;

/// Log target of records forwarded from the engine process
pub const ENGINE_LOG_TARGET: &str = "engine";

/// Exit status an engine uses to report operator cancellation
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

// Optional timestamp, then a level tag such as `[INFO]`, `WARNING:` or `ERROR -`
static LEVEL_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:\d{4}-\d{2}-\d{2}[ T][\d:.,]+\s+)?\[?(trace|debug|info|warn(?:ing)?|error|critical|fatal)\]?(?:\s*[:-]\s*|\s+)(.*)$",
    )
    .expect("level prefix pattern is valid")
});

/// Split an engine output line into a log level and the message
pub fn classify_line(line: &str, default_level: Level) -> (Level, &str) {
    let Some(caps) = LEVEL_PREFIX.captures(line) else {
        return (default_level, line);
    };

    let level = match caps[1].to_lowercase().as_str() {
        "trace" => Level::Trace,
        "debug" => Level::Debug,
        "info" => Level::Info,
        "warn" | "warning" => Level::Warn,
        _ => Level::Error,
    };

    let message = caps.get(2).map_or("", |m| m.as_str());
    (level, message)
}

/// Replace `{name}` placeholders in an argument
pub fn substitute(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{}}}", name), value)
    })
}

/// Engine adapter running an external engine program
///
/// Child output is forwarded line by line into the run log. The child is
/// killed when the run future is dropped.
#[derive(Debug)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, String)>,
    working_dir: Option<PathBuf>,
    timeout: Option<Duration>,
    logger: Arc<RunLogger>,
}

impl CommandEngine {
    pub fn new(config: &Config, keys_log_path: &Path, logger: Arc<RunLogger>) -> Result<Self, EngineError> {
        let program = config.engine.command.trim().to_string();
        if program.is_empty() {
            return Err(EngineError::Failed("No engine command configured".to_string()));
        }

        let translation = &config.translation;
        let vars = [
            ("target_lang", translation.target_lang.clone()),
            ("source_lang", translation.source_lang.clone()),
            ("sheets", translation.sheets_to_translate.join(",")),
            ("batch_size", translation.batch_size.to_string()),
            ("keys_log", keys_log_path.display().to_string()),
        ];

        let args = config
            .engine
            .args
            .iter()
            .map(|arg| substitute(arg, &vars))
            .collect();

        let envs = vars
            .iter()
            .map(|(name, value)| (format!("MTLOC_{}", name.to_uppercase()), value.clone()))
            .collect();

        Ok(Self {
            program,
            args,
            envs,
            working_dir: config.engine.working_dir.clone(),
            timeout: config.engine.timeout_secs.map(Duration::from_secs),
            logger,
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(self.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            command.current_dir(dir);
        }

        command
    }

    fn interpret_status(status: ExitStatus, last_stderr: Option<String>) -> Result<(), EngineError> {
        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(INTERRUPTED_EXIT_CODE) => Err(EngineError::Interrupted),
            Some(code) => Err(EngineError::ExitStatus {
                code,
                detail: last_stderr.unwrap_or_else(|| "no error output".to_string()),
            }),
            None => {
                #[cfg(unix)]
                {
                    use std::os::unix::process::ExitStatusExt;
                    const SIGINT: i32 = 2;
                    if status.signal() == Some(SIGINT) {
                        return Err(EngineError::Interrupted);
                    }
                }
                Err(EngineError::Failed(format!("Engine terminated by signal ({})", status)))
            }
        }
    }
}

/// Forward every line of `reader` to the logger, returning the last non-empty message
///
/// Lines are decoded lossily. The pipe is drained to EOF even after a read
/// error so the child never blocks or dies on a closed pipe.
async fn forward_lines<R>(reader: Option<R>, default_level: Level, logger: &RunLogger) -> Option<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader?);
    let mut buf = Vec::new();
    let mut last = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                logger.emit(
                    Level::Warn,
                    module_path!(),
                    format_args!("Failed to read engine output: {}", e),
                );
                let _ = tokio::io::copy(&mut reader, &mut tokio::io::sink()).await;
                break;
            }
        }

        let text = String::from_utf8_lossy(&buf);
        let line = text.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() {
            continue;
        }
        let (level, message) = classify_line(line, default_level);
        logger.emit(level, ENGINE_LOG_TARGET, format_args!("{}", message));
        last = Some(message.to_string());
    }

    last
}

#[async_trait]
impl LocalizationEngine for CommandEngine {
    async fn run(&self) -> Result<(), EngineError> {
        self.logger.emit(
            Level::Debug,
            module_path!(),
            format_args!("Starting engine: {} {}", self.program, self.args.join(" ")),
        );

        let mut child = self.command().spawn().map_err(|source| EngineError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let logger = self.logger.as_ref();
        let run = async {
            tokio::join!(
                child.wait(),
                forward_lines(stdout, Level::Info, logger),
                forward_lines(stderr, Level::Warn, logger),
            )
        };

        let finished = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run).await.ok(),
            None => Some(run.await),
        };

        let Some((status, _, last_stderr)) = finished else {
            let _ = child.kill().await;
            return Err(EngineError::TimedOut {
                secs: self.timeout.map_or(0, |t| t.as_secs()),
            });
        };

        Self::interpret_status(status?, last_stderr)
    }
}

/// Builds a `CommandEngine` from the `engine` config section
#[derive(Debug, Default, Clone, Copy)]
pub struct CommandEngineFactory;

impl EngineFactory for CommandEngineFactory {
    fn create(
        &self,
        config: &Config,
        keys_log_path: &Path,
        logger: Arc<RunLogger>,
    ) -> Result<Box<dyn LocalizationEngine>, EngineError> {
        Ok(Box::new(CommandEngine::new(config, keys_log_path, logger)?))
    }
}
