/*!
 * # mtloc - Machine-translation pipeline for game localization
 *
 * Command-line shell around a localization engine that sends game text to a
 * machine-translation API and writes back validated translations.
 *
 * ## Flow
 *
 * 1. Load configuration (JSON file, `MTLOC_*` environment, CLI overrides)
 * 2. Open the per-run log (`<logs_dir>/mt_run_<run_id>.log`)
 * 3. Print the header and configuration panels
 * 4. Run the engine with the status ledger path (`<logs_dir>/mt_keys_<run_id>.csv`)
 * 5. Print exactly one of the success / interrupt / fatal panels
 *
 * The outcome maps to exit code 0 (success), 130 (interrupted) or 1 (fatal).
 *
 * ## Architecture
 *
 * - `app_config`: Configuration loading and validation
 * - `run_context`: Run id and derived file paths
 * - `logging`: Per-run file + console logger
 * - `reporter`: Console status panels
 * - `engine`: Engine interface, external-process adapter and mock
 * - `app_controller`: Orchestration and exit-code mapping
 * - `language_utils`: Locale tag utilities
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod engine;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod logging;
pub mod reporter;
pub mod run_context;

// Re-export main types for easier usage
pub use app_config::{Config, ConfigOverrides, LogLevel};
pub use app_controller::{Controller, EngineOutcome, RunOutcome, invoke_engine};
pub use engine::{EngineFactory, LocalizationEngine};
pub use errors::{ConfigError, EngineError, PipelineError};
pub use logging::{LogSession, RunLogger, initialize_logging};
pub use reporter::{ConsoleReporter, Reporter};
pub use run_context::{RunContext, RunId};
