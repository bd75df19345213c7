/*!
 * Mock engine implementation for testing.
 *
 * - `MockEngine::working()` - Writes a status ledger and succeeds
 * - `MockEngine::failing(msg)` - Fails with the given message
 * - `MockEngine::interrupted()` - Reports operator cancellation
 * - `MockEngine::slow(ms)` - Succeeds after a delay
 */

use async_trait::async_trait;
use log::Level;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{EngineFactory, LocalizationEngine};
use crate::app_config::Config;
use crate::errors::EngineError;
use crate::logging::RunLogger;

/// Behavior mode for the mock engine
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Translates every sheet and writes the ledger
    Working,
    /// Fails with the given message
    Failing(String),
    /// Reports that the operator cancelled the run
    Interrupted,
    /// Sleeps before succeeding
    Slow { delay_ms: u64 },
}

/// Mock engine for testing orchestration
#[derive(Debug)]
pub struct MockEngine {
    behavior: MockBehavior,
    sheets: Vec<String>,
    keys_log_path: PathBuf,
    logger: Option<Arc<RunLogger>>,
    run_count: Arc<AtomicUsize>,
}

impl MockEngine {
    /// Create a new mock engine with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            sheets: Vec::new(),
            keys_log_path: PathBuf::new(),
            logger: None,
            run_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new(MockBehavior::Failing(message.into()))
    }

    pub fn interrupted() -> Self {
        Self::new(MockBehavior::Interrupted)
    }

    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Attach the run's sheets, ledger path and logger
    pub fn for_run(mut self, config: &Config, keys_log_path: &Path, logger: Arc<RunLogger>) -> Self {
        self.sheets = config.translation.sheets_to_translate.clone();
        self.keys_log_path = keys_log_path.to_path_buf();
        self.logger = Some(logger);
        self
    }

    /// Share a counter incremented on every `run()`
    pub fn with_run_counter(mut self, counter: Arc<AtomicUsize>) -> Self {
        self.run_count = counter;
        self
    }

    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }

    fn log(&self, level: Level, message: &str) {
        if let Some(logger) = &self.logger {
            logger.emit(level, module_path!(), format_args!("{}", message));
        }
    }

    fn write_ledger(&self) -> Result<(), EngineError> {
        if self.keys_log_path.as_os_str().is_empty() {
            return Ok(());
        }

        let mut ledger = String::from("key,sheet,status\n");
        for sheet in &self.sheets {
            ledger.push_str(&format!("{}_TITLE,{},translated\n", sheet.to_uppercase(), sheet));
        }
        fs::write(&self.keys_log_path, ledger)?;
        Ok(())
    }
}

#[async_trait]
impl LocalizationEngine for MockEngine {
    async fn run(&self) -> Result<(), EngineError> {
        self.run_count.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Working => {}
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(Duration::from_millis(*delay_ms)).await;
            }
            MockBehavior::Failing(message) => {
                self.log(Level::Warn, "Mock engine giving up");
                return Err(EngineError::Failed(message.clone()));
            }
            MockBehavior::Interrupted => return Err(EngineError::Interrupted),
        }

        for sheet in &self.sheets {
            self.log(Level::Info, &format!("Translated sheet {}", sheet));
        }
        self.write_ledger()
    }
}

/// Factory handing out mock engines with a fixed behavior
#[derive(Debug, Clone)]
pub struct MockEngineFactory {
    behavior: MockBehavior,
    run_count: Arc<AtomicUsize>,
}

impl MockEngineFactory {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            run_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Total `run()` calls across all engines built by this factory
    pub fn run_count(&self) -> usize {
        self.run_count.load(Ordering::SeqCst)
    }
}

impl EngineFactory for MockEngineFactory {
    fn create(
        &self,
        config: &Config,
        keys_log_path: &Path,
        logger: Arc<RunLogger>,
    ) -> Result<Box<dyn LocalizationEngine>, EngineError> {
        Ok(Box::new(
            MockEngine::new(self.behavior.clone())
                .for_run(config, keys_log_path, logger)
                .with_run_counter(Arc::clone(&self.run_count)),
        ))
    }
}
