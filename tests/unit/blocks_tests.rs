/*!
 * Tests for block sequences, diffing and identity remapping
 */

use mdsync::blocks::{fingerprint, BlockSequence, Diff};
use mdsync::errors::BlockError;

fn changed(diff: Diff) -> BlockSequence {
    match diff {
        Diff::Changed(fragment) => fragment,
        Diff::Unchanged => panic!("expected a changed diff"),
    }
}

/// Test the title and paragraph document
#[test]
fn test_split_withTitleAndParagraph_shouldGiveTwoBlocks() {
    let sequence = BlockSequence::split("# Title\n\nParagraph");

    assert_eq!(sequence.len(), 2);
    assert_eq!(sequence.hashes(), [fingerprint("# Title"), fingerprint("Paragraph")].as_slice());
    assert_eq!(sequence.render(), "# Title\n\nParagraph");
}

/// Test that splitting twice gives the same identities
#[test]
fn test_split_withSameText_shouldBeDeterministic() {
    let text = "# Guide\n\nSome text.\n\n```rust\nfn main() {}\n```\n\n> quoted";
    assert_eq!(BlockSequence::split(text), BlockSequence::split(text));
}

/// Test that identical blocks collapse onto one identity
#[test]
fn test_split_withDuplicateBlocks_shouldShareIdentity() {
    let sequence = BlockSequence::split("Same\n\nOther\n\nSame");

    assert_eq!(sequence.len(), 3);
    assert_eq!(sequence.unique_len(), 2);
    assert_eq!(sequence.hashes()[0], sequence.hashes()[2]);
    assert_eq!(sequence.render(), "Same\n\nOther\n\nSame");
}

/// Test that a sequence minus itself is unchanged
#[test]
fn test_subtract_withItself_shouldBeUnchanged() {
    let sequence = BlockSequence::split("A\n\nB\n\nC");
    assert_eq!(sequence.subtract(&sequence), Diff::Unchanged);
}

/// Test that editing one block only reports that block
#[test]
fn test_subtract_withOneEditedBlock_shouldReportOnlyThatBlock() {
    let old = BlockSequence::split("A\n\nB\n\nC");
    let new = BlockSequence::split("A\n\nB edited\n\nC");

    let fragment = changed(new.subtract(&old));
    assert_eq!(fragment.hashes(), [fingerprint("B edited")].as_slice());
    assert_eq!(fragment.get(&fingerprint("B edited")), Some("B edited"));
}

/// Test that an inserted block is the only new block
#[test]
fn test_subtract_withInsertedBlock_shouldReportInsertion() {
    let old = BlockSequence::split("A\n\nC");
    let new = BlockSequence::split("A\n\nB\n\nC");

    assert_eq!(changed(new.subtract(&old)).render(), "B");
}

/// Test that deleting a block gives nothing to translate
#[test]
fn test_subtract_withDeletedBlock_shouldBeUnchanged() {
    let old = BlockSequence::split("A\n\nB\n\nC");
    let new = BlockSequence::split("A\n\nC");

    assert_eq!(new.subtract(&old), Diff::Unchanged);
}

/// Test that the diff keeps document order
#[test]
fn test_subtract_withSeveralNewBlocks_shouldKeepDocumentOrder() {
    let old = BlockSequence::split("Kept");
    let new = BlockSequence::split("Zulu\n\nKept\n\nAlpha\n\nMike\n\nZulu");

    let fragment = changed(new.subtract(&old));
    assert_eq!(fragment.render(), "Zulu\n\nAlpha\n\nMike");
}

/// Test that pick only overlays known identities
#[test]
fn test_pick_withPartialSource_shouldOverlayKnownIdentities() {
    let mut baseline = BlockSequence::split("A\n\nB\n\nA");
    let mut translated = BlockSequence::split("a traduit");
    translated.remap(&[fingerprint("A")]).unwrap();

    assert_eq!(baseline.pick(&translated), 1);
    assert_eq!(baseline.render(), "a traduit\n\nB\n\na traduit");
}

/// Test remap with the wrong number of identities
#[test]
fn test_remap_withWrongLength_shouldFail() {
    let mut sequence = BlockSequence::split("A\n\nB");
    let result = sequence.remap(&["x".to_string()]);

    assert_eq!(result, Err(BlockError::IdentityCountMismatch { expected: 2, actual: 1 }));
    assert_eq!(sequence.render(), "A\n\nB");
}

/// Test that the merge priority is fresh translation, old translation, source
#[test]
fn test_pick_chain_withOldAndFreshTranslations_shouldFollowPriority() {
    let source = BlockSequence::split("A\n\nB2\n\nC\n\nD");

    let mut old_translation = BlockSequence::split("a-fr\n\nb-fr\n\nc-fr");
    old_translation.remap(&[fingerprint("A"), fingerprint("B"), fingerprint("C")]).unwrap();

    let mut fresh = BlockSequence::split("b2-fr");
    fresh.remap(&[fingerprint("B2")]).unwrap();

    let mut baseline = source.clone();
    baseline.pick(&old_translation);
    baseline.pick(&fresh);

    assert_eq!(baseline.render(), "a-fr\n\nb2-fr\n\nc-fr\n\nD");
    assert_eq!(baseline.hashes(), source.hashes());
}
