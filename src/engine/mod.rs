/*!
 * Localization engine interface.
 *
 * The engine performs the whole translation workflow (batching, placeholder
 * validation, gap-filling, retries). The orchestrator only builds one through
 * an `EngineFactory` and awaits `run()`:
 * - `command`: adapter running an external engine program
 * - `mock`: scripted engine for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::EngineError;
use crate::logging::RunLogger;

/// A translation workflow that either completes or fails as a whole
#[async_trait]
pub trait LocalizationEngine: Send + Sync + Debug {
    /// Run the entire workflow
    ///
    /// Per-key outcomes go to the status ledger; only overall success or
    /// failure is reported here.
    async fn run(&self) -> Result<(), EngineError>;
}

/// Builds the engine for one run
pub trait EngineFactory {
    /// # Arguments
    /// * `config` - Validated run configuration
    /// * `keys_log_path` - Destination of the per-key status ledger
    /// * `logger` - The run's logger
    fn create(
        &self,
        config: &Config,
        keys_log_path: &Path,
        logger: Arc<RunLogger>,
    ) -> Result<Box<dyn LocalizationEngine>, EngineError>;
}

pub mod command;
pub mod mock;

pub use command::{CommandEngine, CommandEngineFactory};
pub use mock::{MockBehavior, MockEngine, MockEngineFactory};
