/*!
 * End-to-end pipeline scenarios checked through console panels and the run log
 */

use anyhow::Result;
use std::future::pending;

use crate::common::{self, SharedBuffer};
use mtloc::app_config::{Config, ConfigOverrides};
use mtloc::app_controller::{Controller, RunOutcome};
use mtloc::engine::{MockBehavior, MockEngineFactory};
use mtloc::reporter::ConsoleReporter;

struct Scenario {
    panels: SharedBuffer,
    console_log: SharedBuffer,
    controller: Controller<ConsoleReporter<SharedBuffer>>,
}

fn scenario() -> Scenario {
    let panels = SharedBuffer::new();
    let console_log = SharedBuffer::new();
    let controller = Controller::new(ConsoleReporter::new(panels.clone(), false))
        .with_log_console(Box::new(console_log.clone()), false);
    Scenario {
        panels,
        console_log,
        controller,
    }
}

#[tokio::test]
async fn test_scenario_successfulFrenchRun() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut sc = scenario();
    let factory = MockEngineFactory::new(MockBehavior::Working);

    let outcome = sc
        .controller
        .run(Ok(common::test_config(temp_dir.path())), &factory, pending())
        .await;

    assert_eq!(outcome.exit_code(), 0);

    let panels = sc.panels.contents();
    assert!(panels.contains("Target Language: fr"));
    assert!(panels.contains("Sheets to Translate: UI, Dialogue"));
    assert!(panels.contains("Batch Size: 50"));
    assert_eq!(panels.matches("Translation pipeline completed successfully!").count(), 1);

    let log = common::read_run_log(temp_dir.path())?;
    assert!(log.contains("Target Language: fr"));
    assert!(log.contains(r#"Sheets to Translate: ["UI", "Dialogue"]"#));
    assert!(log.contains("Translated sheet Dialogue"));
    assert!(log.contains("Translation pipeline completed successfully"));

    // Console stream mirrors the file
    assert!(sc.console_log.contents().contains("Translation pipeline completed successfully"));
    Ok(())
}

#[tokio::test]
async fn test_scenario_engineQuotaFailure() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut sc = scenario();
    let factory = MockEngineFactory::new(MockBehavior::Failing("API quota exceeded".to_string()));

    let outcome = sc
        .controller
        .run(Ok(common::test_config(temp_dir.path())), &factory, pending())
        .await;

    assert_eq!(outcome.exit_code(), 1);

    let panels = sc.panels.contents();
    assert!(panels.contains("❌ Fatal error: API quota exceeded"));
    assert!(!panels.contains("completed successfully"));

    let log = common::read_run_log(temp_dir.path())?;
    assert!(log.contains("[ERROR] mtloc::app_controller - Fatal error: API quota exceeded"));
    assert!(!log.contains("completed successfully"));
    Ok(())
}

#[tokio::test]
async fn test_scenario_operatorInterrupt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut sc = scenario();
    let factory = MockEngineFactory::new(MockBehavior::Slow { delay_ms: 10_000 });

    let outcome = sc
        .controller
        .run(Ok(common::test_config(temp_dir.path())), &factory, async {})
        .await;

    assert_eq!(outcome, RunOutcome::Interrupted);
    assert_eq!(outcome.exit_code(), 130);

    let panels = sc.panels.contents();
    assert!(panels.contains("Translation interrupted by user"));
    assert!(!panels.contains("completed successfully"));

    let log = common::read_run_log(temp_dir.path())?;
    assert!(
        log.lines()
            .any(|l| l.contains("[WARNING]") && l.contains("Translation interrupted by user")),
        "{}",
        log
    );
    assert!(!log.contains("Translated sheet"));
    Ok(())
}

#[test]
fn test_scenario_invalidConfigFile_shouldFailBeforeHeader() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;
    let mut sc = scenario();
    let factory = MockEngineFactory::new(MockBehavior::Working);

    let config = Config::load(Some(config_path.as_path()), &ConfigOverrides::default());
    assert!(config.is_err());

    let outcome = tokio_test::block_on(sc.controller.run(config, &factory, pending()));

    assert_eq!(outcome.exit_code(), 1);
    let panels = sc.panels.contents();
    assert!(panels.contains("❌ Fatal error: Configuration error"));
    assert!(!panels.contains("Batch Size"));
    assert_eq!(factory.run_count(), 0);
    Ok(())
}

#[tokio::test]
async fn test_scenario_overridesReachConfigPanel() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "translation": { "target_lang": "fr", "sheets_to_translate": ["UI"] } }"#,
    )?;
    let overrides = ConfigOverrides {
        target_lang: Some("de".to_string()),
        batch_size: Some(25),
        logs_dir: Some(temp_dir.path().join("logs")),
        ..Default::default()
    };
    let mut sc = scenario();
    let factory = MockEngineFactory::new(MockBehavior::Working);

    let config = Config::load(Some(config_path.as_path()), &overrides);
    let outcome = sc.controller.run(config, &factory, pending()).await;

    assert_eq!(outcome.exit_code(), 0);
    let panels = sc.panels.contents();
    assert!(panels.contains("Target Language: de (German)"));
    assert!(panels.contains("Batch Size: 25"));
    assert!(temp_dir.path().join("logs").is_dir());
    Ok(())
}
