/*!
 * Error types for the mtloc pipeline.
 *
 * Each concern has its own error enum built with thiserror:
 * - `ConfigError` for loading and validating configuration
 * - `EngineError` for anything the localization engine reports
 * - `PipelineError` for the orchestrator, wrapping the other two
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file exists but could not be read
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for `Config`
    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An `MTLOC_*` environment variable holds an unusable value
    #[error("Invalid value for {key}: '{value}'")]
    InvalidEnv { key: String, value: String },

    /// Language code is not a known ISO 639 code
    #[error("Invalid language code: '{0}'")]
    InvalidLanguage(String),

    /// Source and target language resolve to the same language
    #[error("Source and target language are the same: '{0}'")]
    SameLanguage(String),

    /// No sheet was selected for translation
    #[error("At least one sheet to translate is required")]
    NoSheets,

    /// A sheet identifier is empty or whitespace
    #[error("Sheet identifiers must not be blank")]
    BlankSheet,

    /// Batch size must be positive
    #[error("Batch size must be greater than zero, got {0}")]
    InvalidBatchSize(usize),

    /// Unknown severity name
    #[error("Unknown log level: '{0}'")]
    InvalidLogLevel(String),

    /// The engine command is empty
    #[error("No engine command configured")]
    EmptyEngineCommand,
}

/// Errors reported by a localization engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// The run was cancelled by the operator
    #[error("Translation interrupted by user")]
    Interrupted,

    /// Generic engine failure with a human-readable message
    #[error("{0}")]
    Failed(String),

    /// The engine program could not be started
    #[error("Failed to start engine '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine program exited unsuccessfully
    #[error("Engine exited with status {code}: {detail}")]
    ExitStatus { code: i32, detail: String },

    /// The engine program exceeded its time budget
    #[error("Engine timed out after {secs}s")]
    TimedOut { secs: u64 },

    /// I/O failure while talking to the engine
    #[error("Engine I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Top-level error observed by the orchestrator
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The run log could not be set up
    #[error("Failed to initialize logging at {path:?}: {source}")]
    Logging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The engine failed
    #[error(transparent)]
    Engine(#[from] EngineError),
}
