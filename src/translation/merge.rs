use std::collections::HashSet;

use log::{debug, warn};

use crate::blocks::{BlockSequence, Diff};
use crate::errors::TranslationError;

use super::bridge::MarkupBridge;
use super::links::LinkRewriter;

/// Merges a new source version into an existing translation
///
/// Only blocks whose identity is unknown to the translation are sent to the
/// engine; every other block reuses its previous translation.
#[derive(Debug)]
pub struct MergeEngine<'a> {
    bridge: &'a MarkupBridge,
    links: &'a LinkRewriter,
    per_block: bool,
}

impl<'a> MergeEngine<'a> {
    pub fn new(bridge: &'a MarkupBridge, links: &'a LinkRewriter, per_block: bool) -> Self {
        Self { bridge, links, per_block }
    }

    /// Bring `target` in line with `source_new`, translating what changed
    ///
    /// Returns `true` when the rendered target changed. Deleted and moved
    /// blocks are applied even when nothing needs translating.
    pub async fn update(
        &self,
        target: &mut BlockSequence,
        source_new: &BlockSequence,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<bool, TranslationError> {
        let translated = match source_new.subtract(target) {
            Diff::Unchanged => {
                debug!("No new block for {}", lang_to);
                BlockSequence::new()
            }
            Diff::Changed(diff) => {
                debug!("{} new block(s) to translate to {}", diff.len(), lang_to);
                let mut translated = self.translate_diff(&diff, lang_to, lang_from).await?;
                self.links.rewrite_sequence(&mut translated, lang_to);
                translated
            }
        };

        let before = target.render();
        let mut baseline = source_new.clone();
        baseline.pick(target);
        baseline.pick(&translated);

        let untranslated = untranslated_count(&baseline, target, &translated);
        if untranslated > 0 {
            warn!("{} block(s) left in the source language for {}", untranslated, lang_to);
        }

        *target = baseline;
        Ok(target.render() != before)
    }

    async fn translate_diff(
        &self,
        diff: &BlockSequence,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<BlockSequence, TranslationError> {
        if self.per_block {
            return self.translate_each(diff, lang_to, lang_from).await;
        }
        match self.translate_whole(diff, lang_to, lang_from).await? {
            Some(translated) => Ok(translated),
            None => {
                warn!(
                    "Block count changed during translation to {}, retrying block by block",
                    lang_to
                );
                self.translate_each(diff, lang_to, lang_from).await
            }
        }
    }

    /// One engine call for the whole diff, `None` when blocks got merged or split
    async fn translate_whole(
        &self,
        diff: &BlockSequence,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<Option<BlockSequence>, TranslationError> {
        let mut translated = self.bridge.translate_sequence(diff, lang_to, lang_from).await?;
        if translated.len() != diff.len() {
            debug!("Expected {} translated block(s), got {}", diff.len(), translated.len());
            return Ok(None);
        }

        translated.remap(diff.hashes())?;
        Ok(Some(translated))
    }

    /// One engine call per block
    ///
    /// An output that does not fold back into a single top-level node is
    /// dropped, leaving that block in the source language.
    async fn translate_each(
        &self,
        diff: &BlockSequence,
        lang_to: &str,
        lang_from: Option<&str>,
    ) -> Result<BlockSequence, TranslationError> {
        let mut translated = BlockSequence::new();
        let mut identities = Vec::with_capacity(diff.len());
        for (hash, content) in diff.iter() {
            let markdown = self.bridge.translate_markdown(content, lang_to, lang_from).await?;
            match single_node(&markdown) {
                Some(node) => {
                    translated.add(&node);
                    identities.push(hash.clone());
                }
                None => warn!("Translation of block {} to {} does not fit a single block", hash, lang_to),
            }
        }
        translated.remap(&identities)?;
        Ok(translated)
    }
}

/// Fold Markdown into one top-level node, joining split nodes with a line break
fn single_node(markdown: &str) -> Option<String> {
    let nodes = BlockSequence::split(markdown);
    match nodes.len() {
        0 => None,
        1 => Some(nodes.render()),
        _ => {
            let joined = nodes.iter().map(|(_, content)| content).collect::<Vec<_>>().join("\n");
            let folded = BlockSequence::split(&joined);
            (folded.len() == 1).then(|| folded.render())
        }
    }
}

/// Identities of `merged` covered neither by the old nor the fresh translation
fn untranslated_count(merged: &BlockSequence, old: &BlockSequence, fresh: &BlockSequence) -> usize {
    merged
        .hashes()
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|hash| !old.contains(hash) && !fresh.contains(hash))
        .count()
}
