use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::language_utils;

/// Application configuration module
///
/// Configuration is assembled from three layers, later layers winning:
/// the JSON config file, `MTLOC_*` environment variables, and command-line
/// overrides. The result is validated once and then treated as read-only.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Translation settings consumed by the engine
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Run log settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External engine program settings
    #[serde(default)]
    pub engine: EngineConfig,

    /// Console presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

/// Translation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Source locale of the game text
    #[serde(default = "default_source_lang")]
    pub source_lang: String,

    /// Target locale (e.g. "fr", "pt-BR")
    #[serde(default = "default_target_lang")]
    pub target_lang: String,

    /// Sheets to translate, in order
    #[serde(default)]
    pub sheets_to_translate: Vec<String>,

    /// Number of text keys sent per engine request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            source_lang: default_source_lang(),
            target_lang: default_target_lang(),
            sheets_to_translate: Vec::new(),
            batch_size: default_batch_size(),
        }
    }
}

/// Run log settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Severity threshold
    #[serde(default)]
    pub level: LogLevel,

    /// Directory for run logs and status ledgers
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,

    /// Log targets only shown at warning level or above
    #[serde(default = "default_quiet_targets")]
    pub quiet_targets: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            logs_dir: default_logs_dir(),
            quiet_targets: default_quiet_targets(),
        }
    }
}

/// External engine program settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EngineConfig {
    /// Program to execute
    #[serde(default = "default_engine_command")]
    pub command: String,

    /// Arguments; `{target_lang}`, `{source_lang}`, `{sheets}`,
    /// `{batch_size}` and `{keys_log}` are substituted
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the engine process
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Kill the engine after this many seconds
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command: default_engine_command(),
            args: Vec::new(),
            working_dir: None,
            timeout_secs: None,
        }
    }
}

/// Console presentation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UiConfig {
    /// Title shown in the header panel
    #[serde(default = "default_title")]
    pub title: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
        }
    }
}

/// Log verbosity level
///
/// Accepts any casing, plus the `warning` and `critical` spellings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching `log` crate filter
    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            Self::Error => LevelFilter::Error,
            Self::Warn => LevelFilter::Warn,
            Self::Info => LevelFilter::Info,
            Self::Debug => LevelFilter::Debug,
            Self::Trace => LevelFilter::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" | "critical" | "fatal" => Ok(Self::Error),
            "warn" | "warning" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            "debug" => Ok(Self::Debug),
            "trace" => Ok(Self::Trace),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, ConfigError> {
        value.parse()
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        };
        write!(f, "{}", name)
    }
}

/// Values given on the command line, applied after file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target_lang: Option<String>,
    pub sheets_to_translate: Option<Vec<String>>,
    pub batch_size: Option<usize>,
    pub log_level: Option<LogLevel>,
    pub logs_dir: Option<PathBuf>,
    pub engine_command: Option<String>,
}

/// Config file read when no path is given
pub const DEFAULT_CONFIG_PATH: &str = "conf.json";

pub const ENV_TARGET_LANG: &str = "MTLOC_TARGET_LANG";
pub const ENV_SOURCE_LANG: &str = "MTLOC_SOURCE_LANG";
pub const ENV_SHEETS: &str = "MTLOC_SHEETS";
pub const ENV_BATCH_SIZE: &str = "MTLOC_BATCH_SIZE";
pub const ENV_LOG_LEVEL: &str = "MTLOC_LOG_LEVEL";
pub const ENV_LOGS_DIR: &str = "MTLOC_LOGS_DIR";
pub const ENV_ENGINE_COMMAND: &str = "MTLOC_ENGINE_COMMAND";

fn default_source_lang() -> String {
    "en".to_string()
}

fn default_target_lang() -> String {
    "fr".to_string()
}

fn default_batch_size() -> usize {
    50
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_quiet_targets() -> Vec<String> {
    // HTTP client internals log every connection at debug level
    vec!["reqwest".to_string(), "hyper".to_string()]
}

fn default_engine_command() -> String {
    "mt-engine".to_string()
}

fn default_title() -> String {
    "Localization Translation".to_string()
}

/// Parse a comma-separated sheet list, dropping empty entries
pub fn parse_sheet_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Load the full configuration: file, environment, overrides, validation
    ///
    /// An explicit `path` must exist. Without one, `conf.json` in the working
    /// directory is read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if FileManager::file_exists(DEFAULT_CONFIG_PATH) => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_env_from(|key| std::env::var(key).ok())?;
        config.apply_overrides(overrides);
        config.validate()?;

        Ok(config)
    }

    /// Read a configuration file without applying any other layer
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `MTLOC_*` variables using the given lookup
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_TARGET_LANG) {
            self.translation.target_lang = value;
        }

        if let Some(value) = lookup(ENV_SOURCE_LANG) {
            self.translation.source_lang = value;
        }

        if let Some(value) = lookup(ENV_SHEETS) {
            self.translation.sheets_to_translate = parse_sheet_list(&value);
        }

        if let Some(value) = lookup(ENV_BATCH_SIZE) {
            self.translation.batch_size =
                value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                    key: ENV_BATCH_SIZE.to_string(),
                    value: value.clone(),
                })?;
        }

        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = value.parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_LOG_LEVEL.to_string(),
                value: value.clone(),
            })?;
        }

        if let Some(value) = lookup(ENV_LOGS_DIR) {
            self.logging.logs_dir = PathBuf::from(value);
        }

        if let Some(value) = lookup(ENV_ENGINE_COMMAND) {
            self.engine.command = value;
        }

        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(target_lang) = &overrides.target_lang {
            self.translation.target_lang = target_lang.clone();
        }
        if let Some(sheets) = &overrides.sheets_to_translate {
            self.translation.sheets_to_translate = sheets.clone();
        }
        if let Some(batch_size) = overrides.batch_size {
            self.translation.batch_size = batch_size;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(logs_dir) = &overrides.logs_dir {
            self.logging.logs_dir = logs_dir.clone();
        }
        if let Some(command) = &overrides.engine_command {
            self.engine.command = command.clone();
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let translation = &self.translation;

        for code in [&translation.source_lang, &translation.target_lang] {
            language_utils::validate_language_code(code)
                .map_err(|_| ConfigError::InvalidLanguage(code.clone()))?;
        }

        if language_utils::language_codes_match(&translation.source_lang, &translation.target_lang) {
            return Err(ConfigError::SameLanguage(translation.target_lang.clone()));
        }

        if translation.sheets_to_translate.is_empty() {
            return Err(ConfigError::NoSheets);
        }

        if translation.sheets_to_translate.iter().any(|s| s.trim().is_empty()) {
            return Err(ConfigError::BlankSheet);
        }

        if translation.batch_size == 0 {
            return Err(ConfigError::InvalidBatchSize(translation.batch_size));
        }

        if self.engine.command.trim().is_empty() {
            return Err(ConfigError::EmptyEngineCommand);
        }

        Ok(())
    }
}
