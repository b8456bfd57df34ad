/*!
 * End-to-end tests of repository synchronization
 */

use anyhow::Result;
use mdsync::app_config::{FailurePolicy, VersioningMode};
use mdsync::app_controller::Controller;
use crate::common::{self, TestTree};
use crate::common::mock_engine::MockEngine;

/// Test a first run mirroring the tree in every language
#[tokio::test]
async fn test_sync_withFreshDestination_shouldMirrorTreeInEveryLanguage() -> Result<()> {
    common::init_logger();
    let tree = TestTree::new()?;
    tree.write_source("index.md", "# Welcome\n\nFirst page.\n")?;
    tree.write_source("guide/setup.md", "Install it.\n")?;
    tree.write_source("guide/notes.txt", "not tracked")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr", "de"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(report.processed, 2);
    assert_eq!(report.translated, 4);
    assert_eq!(report.failed, 0);
    assert_eq!(tree.read_translation("fr", "index.md"), "# WELCOME\n\nFIRST PAGE.");
    assert_eq!(tree.read_translation("de", "guide/setup.md"), "INSTALL IT.");
    assert!(!tree.destination().join("fr/guide/notes.txt").exists());
    assert!(tree.destination().join("fr/hashes.json").exists());
    assert!(tree.destination().join("de/hashes.json").exists());
    Ok(())
}

/// Test that a second run without source changes never calls the engine
#[tokio::test]
async fn test_sync_withUnchangedSource_shouldNotCallEngine() -> Result<()> {
    for versioning in [VersioningMode::Json, VersioningMode::Sql] {
        let tree = TestTree::new()?;
        tree.write_source("index.md", "# Welcome\n\nFirst page.\n")?;

        let engine = MockEngine::new();
        let config = common::test_config(&["fr"], versioning);
        let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

        controller.sync(tree.source(), tree.destination()).await?;
        let first_output = tree.read_translation("fr", "index.md");
        engine.reset();

        let report = controller.sync(tree.source(), tree.destination()).await?;

        assert_eq!(engine.call_count(), 0, "{} inventory", versioning);
        assert_eq!(report.translated, 0);
        assert_eq!(tree.read_translation("fr", "index.md"), first_output);
    }
    Ok(())
}

/// Test that without an inventory every run translates again
#[tokio::test]
async fn test_sync_withDisabledVersioning_shouldRetranslateEveryRun() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("index.md", "Alpha\n\nBeta\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Disabled);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    controller.sync(tree.source(), tree.destination()).await?;
    controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(engine.call_count(), 2);
    assert_eq!(tree.read_translation("fr", "index.md"), "ALPHA\n\nBETA");
    assert!(!tree.destination().join("fr/hashes.json").exists());
    Ok(())
}

/// Test that an edited block is the only one sent again
#[tokio::test]
async fn test_sync_withEditedBlock_shouldTranslateOnlyThatBlock() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("page.md", "Alpha\n\nBeta\n\nGamma\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Sql);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;

    // Hand-edited translations of untouched blocks must survive
    let translated = tree.destination().join("fr/page.md");
    std::fs::write(&translated, "Alpha traduit\n\nBETA\n\nGamma traduit\n")?;

    tree.write_source("page.md", "Alpha\n\nBeta prime\n\nGamma\n")?;
    engine.reset();
    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(engine.requests(), vec!["<p>Beta prime</p>\n".to_string()]);
    assert_eq!(report.translated, 1);
    assert_eq!(tree.read_translation("fr", "page.md"), "Alpha traduit\n\nBETA PRIME\n\nGamma traduit");
    Ok(())
}

/// Test link rewriting through a whole run
#[tokio::test]
async fn test_sync_withAbsoluteLinks_shouldRewriteIntoLanguageTree() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("index.md", "Read [the guide](/guide/setup) or [this](https://example.com/x).\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr", "de"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(
        tree.read_translation("fr", "index.md"),
        "READ [THE GUIDE](/fr/guide/setup) OR [THIS](https://example.com/x)."
    );
    assert_eq!(
        tree.read_translation("de", "index.md"),
        "READ [THE GUIDE](/de/guide/setup) OR [THIS](https://example.com/x)."
    );
    Ok(())
}

/// Test include and exclude rules
#[tokio::test]
async fn test_sync_withIncludeAndExcludeRules_shouldSelectFiles() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("README.md", "Read me.\n")?;
    tree.write_source("LICENSE", "Licensed.\n")?;
    tree.write_source("drafts/wip.md", "Work in progress.\n")?;

    let mut config = common::test_config(&["fr"], VersioningMode::Json);
    config.include_files = vec!["LICENSE".to_string()];
    config.exclude_files = vec!["drafts".to_string()];
    let controller = Controller::with_config(config)?;

    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(report.processed, 2);
    assert_eq!(tree.read_translation("fr", "LICENSE"), "Licensed.");
    assert!(!tree.destination().join("fr/drafts").exists());
    Ok(())
}

/// Test a destination living inside the source tree
#[tokio::test]
async fn test_sync_withDestinationInsideSource_shouldNotTranslateTranslations() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("index.md", "Hello.\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    let destination = tree.source().join("i18n");

    controller.sync(tree.source(), &destination).await?;
    let report = controller.sync(tree.source(), &destination).await?;

    assert_eq!(report.processed, 1);
    assert!(!destination.join("fr/i18n").exists());
    Ok(())
}

/// Test the skip failure policy
#[tokio::test]
async fn test_sync_withFailingEngineAndSkipPolicy_shouldReportFailures() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "Alpha\n")?;
    tree.write_source("b.md", "Beta\n")?;

    let engine = MockEngine::new();
    engine.set_should_fail(true);
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(report.failed, 2);
    assert_eq!(report.processed, 0);
    assert!(!tree.destination().join("fr/a.md").exists());
    Ok(())
}

/// Test the abort failure policy
#[tokio::test]
async fn test_sync_withFailingEngineAndAbortPolicy_shouldStop() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "Alpha\n")?;
    tree.write_source("b.md", "Beta\n")?;

    let engine = MockEngine::new();
    engine.set_should_fail(true);
    let mut config = common::test_config(&["fr"], VersioningMode::Json);
    config.failure_policy = FailurePolicy::Abort;
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    let result = controller.sync(tree.source(), tree.destination()).await;

    assert!(result.is_err());
    assert_eq!(engine.call_count(), 1);
    Ok(())
}

/// Test a stale inventory record
#[tokio::test]
async fn test_sync_withStaleInventory_shouldSkipFile() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("page.md", "Alpha\n\nBeta\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;

    // A translated file edited by hand with an extra block no longer lines up
    common::create_test_file(&tree.destination(), "fr/page.md", "ALPHA\n\nEXTRA\n\nBETA\n")?;
    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(report.failed, 1);
    assert_eq!(tree.read_translation("fr", "page.md"), "ALPHA\n\nEXTRA\n\nBETA");
    Ok(())
}

/// Test that deletions and moves in the source reach the translation without engine calls
#[tokio::test]
async fn test_sync_withDeletedAndReorderedBlocks_shouldFollowSourceOrder() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "Alpha\n\nBeta\n\nGamma\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;

    tree.write_source("a.md", "Gamma\n\nAlpha\n")?;
    engine.reset();
    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(engine.call_count(), 0);
    assert_eq!(report.translated, 1);
    assert_eq!(tree.read_translation("fr", "a.md"), "GAMMA\n\nALPHA");

    // The inventory follows the new layout
    let report = controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(report.failed, 0);
    assert_eq!(report.translated, 0);
    assert_eq!(engine.call_count(), 0);
    Ok(())
}

/// Test that a translated file removed by hand is produced again
#[tokio::test]
async fn test_sync_withDeletedTranslation_shouldRecreateIt() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "Alpha\n\nBeta\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Sql);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;

    std::fs::remove_file(tree.destination().join("fr/a.md"))?;
    let report = controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(tree.read_translation("fr", "a.md"), "ALPHA\n\nBETA");
    Ok(())
}

/// Test that an engine adding paragraphs does not break later runs
#[tokio::test]
async fn test_sync_withSplittingEngine_shouldKeepInventoryAligned() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "# Title\n\nAlpha\n")?;

    let engine = MockEngine::new();
    engine.set_split_paragraphs(true);
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    let report = controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(report.failed, 0);
    assert_eq!(tree.read_translation("fr", "a.md"), "# TITLE\n\nALPHA\nEXTRA");

    tree.write_source("a.md", "# Title\n\nAlpha\n\nBeta\n")?;
    let report = controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(tree.read_translation("fr", "a.md"), "# TITLE\n\nALPHA\nEXTRA\n\nBETA\nEXTRA");

    engine.reset();
    let report = controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(report.failed, 0);
    assert_eq!(engine.call_count(), 0);
    Ok(())
}

/// Test that reused translations keep their links as they are
#[tokio::test]
async fn test_sync_withReusedBlock_shouldNotRewriteItsLinksAgain() -> Result<()> {
    let tree = TestTree::new()?;
    tree.write_source("a.md", "See [the guide](/guide)\n\nIntro\n")?;

    let engine = MockEngine::new();
    let config = common::test_config(&["fr"], VersioningMode::Json);
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;
    controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(tree.read_translation("fr", "a.md"), "SEE [THE GUIDE](/fr/guide)\n\nINTRO");

    // A hand-written link in the translation points outside the language tree
    common::create_test_file(&tree.destination(), "fr/a.md", "Voir [le guide](/docs/guide)\n\nINTRO\n")?;
    tree.write_source("a.md", "See [the guide](/guide)\n\nIntro changed\n")?;
    controller.sync(tree.source(), tree.destination()).await?;

    assert_eq!(tree.read_translation("fr", "a.md"), "Voir [le guide](/docs/guide)\n\nINTRO CHANGED");
    Ok(())
}

/// Test the verbose line written for every changed translation
#[tokio::test]
async fn test_sync_withVerbose_shouldLogEachTranslatedFile() -> Result<()> {
    common::init_logger();
    let tree = TestTree::new()?;
    tree.write_source("verbose-line.md", "Alpha\n")?;

    let engine = MockEngine::new();
    let mut config = common::test_config(&["fr", "de"], VersioningMode::Json);
    config.verbose = true;
    let controller = Controller::with_bridge(config, common::mock_bridge(&engine))?;

    controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(common::logged_count("fr translated: verbose-line.md"), 1);
    assert_eq!(common::logged_count("de translated: verbose-line.md"), 1);

    // Nothing changed, nothing logged
    controller.sync(tree.source(), tree.destination()).await?;
    assert_eq!(common::logged_count("fr translated: verbose-line.md"), 1);
    assert_eq!(common::logged_count("de translated: verbose-line.md"), 1);
    Ok(())
}
