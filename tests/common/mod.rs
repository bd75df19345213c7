/*!
 * Common test utilities for the mtloc test suite
 */

use anyhow::Result;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use mtloc::app_config::Config;
use mtloc::reporter::Reporter;
use mtloc::run_context::RunContext;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Valid configuration logging into `logs_dir`
pub fn test_config(logs_dir: &Path) -> Config {
    let mut config = Config::default();
    config.translation.target_lang = "fr".to_string();
    config.translation.sheets_to_translate = vec!["UI".to_string(), "Dialogue".to_string()];
    config.translation.batch_size = 50;
    config.logging.logs_dir = logs_dir.to_path_buf();
    config
}

/// Read the single run log in `logs_dir`
pub fn read_run_log(logs_dir: &Path) -> Result<String> {
    let log_file = fs::read_dir(logs_dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .find(|p| {
            p.file_name()
                .map(|n| n.to_string_lossy().starts_with("mt_run_"))
                .unwrap_or(false)
        })
        .ok_or_else(|| anyhow::anyhow!("no run log in {:?}", logs_dir))?;
    Ok(fs::read_to_string(log_file)?)
}

/// Cloneable in-memory writer
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writer that always fails
pub struct BrokenWriter;

impl Write for BrokenWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
    }
}

/// Panel rendered by a `RecordingReporter`
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Header(String),
    Config {
        target_lang: String,
        sheets: Vec<String>,
        batch_size: usize,
    },
    Success(RunContext),
    Interrupt,
    Fatal(String),
}

/// Reporter that records calls instead of printing
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<ReportEvent>,
}

impl RecordingReporter {
    pub fn count(&self, predicate: impl Fn(&ReportEvent) -> bool) -> usize {
        self.events.iter().filter(|e| predicate(e)).count()
    }
}

impl Reporter for RecordingReporter {
    fn render_header(&mut self, title: &str) {
        self.events.push(ReportEvent::Header(title.to_string()));
    }

    fn render_config(&mut self, target_lang: &str, sheets: &[String], batch_size: usize) {
        self.events.push(ReportEvent::Config {
            target_lang: target_lang.to_string(),
            sheets: sheets.to_vec(),
            batch_size,
        });
    }

    fn render_success(&mut self, context: &RunContext) {
        self.events.push(ReportEvent::Success(context.clone()));
    }

    fn render_interrupt(&mut self) {
        self.events.push(ReportEvent::Interrupt);
    }

    fn render_fatal(&mut self, error: &dyn Error) {
        self.events.push(ReportEvent::Fatal(error.to_string()));
    }
}
