/*!
 * Tests for the merge engine with a mock translation engine
 */

use mdsync::blocks::{fingerprint, BlockSequence};
use mdsync::translation::{LinkRewriter, MergeEngine};
use crate::common;
use crate::common::mock_engine::MockEngine;

fn links() -> LinkRewriter {
    LinkRewriter::new("/", vec!["fr".to_string(), "de".to_string()])
}

/// Test the A, B, C to A, B', C scenario
#[tokio::test]
async fn test_update_withOneEditedBlock_shouldTranslateOnlyThatBlock() {
    common::init_logger();
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let first = BlockSequence::split("Alpha\n\nBeta\n\nGamma");
    let mut target = BlockSequence::new();
    assert!(merge.update(&mut target, &first, "fr", Some("en")).await.unwrap());
    assert_eq!(target.render(), "ALPHA\n\nBETA\n\nGAMMA");
    assert_eq!(engine.call_count(), 1);

    engine.reset();
    let second = BlockSequence::split("Alpha\n\nBeta prime\n\nGamma");
    assert!(merge.update(&mut target, &second, "fr", Some("en")).await.unwrap());

    assert_eq!(target.render(), "ALPHA\n\nBETA PRIME\n\nGAMMA");
    assert_eq!(target.hashes(), second.hashes());
    assert_eq!(engine.requests(), vec!["<p>Beta prime</p>\n".to_string()]);
}

/// Test that an unchanged source never reaches the engine
#[tokio::test]
async fn test_update_withUnchangedSource_shouldNotCallEngine() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let source = BlockSequence::split("Alpha\n\nBeta");
    let mut target = BlockSequence::new();
    merge.update(&mut target, &source, "fr", None).await.unwrap();
    engine.reset();

    assert!(!merge.update(&mut target, &source, "fr", None).await.unwrap());
    assert_eq!(engine.call_count(), 0);
    assert_eq!(target.render(), "ALPHA\n\nBETA");
}

/// Test that deleted blocks disappear without any engine call
#[tokio::test]
async fn test_update_withDeletedBlock_shouldDropItWithoutTranslating() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let mut target = BlockSequence::new();
    merge.update(&mut target, &BlockSequence::split("Alpha\n\nBeta\n\nGamma"), "fr", None).await.unwrap();
    engine.reset();

    let source = BlockSequence::split("Alpha\n\nGamma");
    assert!(merge.update(&mut target, &source, "fr", None).await.unwrap());
    assert_eq!(engine.call_count(), 0);
    assert_eq!(target.render(), "ALPHA\n\nGAMMA");
}

/// Test that an inserted block is translated alone and lands at its position
#[tokio::test]
async fn test_update_withInsertedBlock_shouldKeepOrder() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let mut target = BlockSequence::new();
    merge.update(&mut target, &BlockSequence::split("Alpha\n\nGamma"), "fr", None).await.unwrap();
    engine.reset();

    let source = BlockSequence::split("Alpha\n\nBeta\n\nGamma");
    merge.update(&mut target, &source, "fr", None).await.unwrap();

    assert_eq!(engine.requests(), vec!["<p>Beta</p>\n".to_string()]);
    assert_eq!(target.render(), "ALPHA\n\nBETA\n\nGAMMA");
}

/// Test that duplicated blocks are translated once
#[tokio::test]
async fn test_update_withDuplicateBlocks_shouldTranslateOnce() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let source = BlockSequence::split("Same\n\nOther\n\nSame");
    let mut target = BlockSequence::new();
    merge.update(&mut target, &source, "fr", None).await.unwrap();

    assert_eq!(engine.requests(), vec!["<p>Same</p>\n<p>Other</p>\n".to_string()]);
    assert_eq!(target.render(), "SAME\n\nOTHER\n\nSAME");
}

/// Test the fallback when the engine merges blocks
#[tokio::test]
async fn test_update_withMergingEngine_shouldFallBackToBlockByBlock() {
    common::init_logger();
    let engine = MockEngine::new();
    engine.set_merge_paragraphs(true);
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let source = BlockSequence::split("Alpha\n\nBeta");
    let mut target = BlockSequence::new();
    merge.update(&mut target, &source, "fr", None).await.unwrap();

    assert_eq!(engine.call_count(), 3);
    assert_eq!(target.hashes(), [fingerprint("Alpha"), fingerprint("Beta")].as_slice());
    assert_eq!(target.render(), "ALPHA\n\nBETA");
}

/// Test that per-block mode sends one request per new block
#[tokio::test]
async fn test_update_withPerBlockMode_shouldCallEnginePerBlock() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, true);

    let source = BlockSequence::split("# Title\n\nAlpha\n\nBeta");
    let mut target = BlockSequence::new();
    merge.update(&mut target, &source, "de", None).await.unwrap();

    assert_eq!(engine.call_count(), 3);
    assert_eq!(engine.languages(), vec!["de", "de", "de"]);
    assert_eq!(target.render(), "# TITLE\n\nALPHA\n\nBETA");
}

/// Test that fresh translations get their links rewritten
#[tokio::test]
async fn test_update_withAbsoluteLink_shouldPointIntoLanguageTree() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let source = BlockSequence::split("See [text](/x/y) and [here](/fr/already)");
    let mut target = BlockSequence::new();
    merge.update(&mut target, &source, "fr", None).await.unwrap();

    assert_eq!(target.render(), "SEE [TEXT](/fr/x/y) AND [HERE](/fr/already)");
}

/// Test that engine errors propagate and leave the target untouched
#[tokio::test]
async fn test_update_withFailingEngine_shouldReturnErrorAndKeepTarget() {
    let engine = MockEngine::new();
    let bridge = common::mock_bridge(&engine);
    let links = links();
    let merge = MergeEngine::new(&bridge, &links, false);

    let mut target = BlockSequence::new();
    merge.update(&mut target, &BlockSequence::split("Alpha"), "fr", None).await.unwrap();

    engine.set_should_fail(true);
    let result = merge.update(&mut target, &BlockSequence::split("Alpha\n\nBeta"), "fr", None).await;

    assert!(result.is_err());
    assert_eq!(target.render(), "ALPHA");
}
