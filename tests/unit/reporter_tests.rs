/*!
 * Tests for console status panels
 */

use std::path::Path;

use crate::common::{BrokenWriter, SharedBuffer};
use mtloc::errors::EngineError;
use mtloc::reporter::{ConsoleReporter, Reporter};
use mtloc::run_context::{RunContext, RunId};

fn sheets(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_renderConfig_shouldListLanguageSheetsAndBatchSize() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);

    reporter.render_config("fr", &sheets(&["UI", "Dialogue"]), 50);

    let output = buffer.contents();
    assert!(output.contains("Configuration"));
    assert!(output.contains("Target Language: fr (French)"));
    assert!(output.contains("Sheets to Translate: UI, Dialogue"));
    assert!(output.contains("Batch Size: 50"));
}

#[test]
fn test_renderConfig_withUnknownLanguage_shouldShowRawCode() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);

    reporter.render_config("klingon", &sheets(&["UI"]), 1);

    assert!(buffer.contents().contains("Target Language: klingon"));
}

#[test]
fn test_renderSuccess_shouldPointAtRunFiles() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);
    let run_id: RunId = "20250314_093012".parse().unwrap();
    let context = RunContext::new(run_id, Path::new("logs"));

    reporter.render_success(&context);

    let output = buffer.contents();
    assert!(output.contains("Translation pipeline completed successfully!"));
    assert!(output.contains("mt_run_20250314_093012.log"));
    assert!(output.contains("mt_keys_20250314_093012.csv"));
}

#[test]
fn test_renderFatal_shouldPrefixMessageWithIndicator() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);

    reporter.render_fatal(&EngineError::Failed("API quota exceeded".to_string()));

    assert!(buffer.contents().contains("❌ Fatal error: API quota exceeded"));
}

#[test]
fn test_renderInterrupt_shouldWarn() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);

    reporter.render_interrupt();

    assert!(buffer.contents().contains("Translation interrupted by user"));
}

#[test]
fn test_renderHeader_shouldShowTitle() {
    let mut reporter = ConsoleReporter::new(Vec::new(), false);
    reporter.render_header("Tennis Manager 25 - Localization Translation");

    let output = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(output.contains("Tennis Manager 25 - Localization Translation"));
    assert_eq!(output.lines().count(), 3);
}

#[test]
fn test_reporter_withBrokenWriter_shouldNotPanic() {
    let mut reporter = ConsoleReporter::new(BrokenWriter, true);

    reporter.render_header("title");
    reporter.render_config("fr", &sheets(&["UI"]), 10);
    reporter.render_interrupt();
    reporter.render_fatal(&EngineError::TimedOut { secs: 1 });
}

#[test]
fn test_renderFatal_withMultilineError_shouldKeepBordersClosed() {
    let buffer = SharedBuffer::new();
    let mut reporter = ConsoleReporter::new(buffer.clone(), false);

    reporter.render_fatal(&EngineError::Failed("sheet not found\nsee engine log".to_string()));

    let output = buffer.contents();
    assert_eq!(output.lines().count(), 4);
    assert!(output.lines().all(|l| l.ends_with('│') || l.ends_with('╮') || l.ends_with('╯')));
}
