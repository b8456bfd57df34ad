/*!
 * Content-addressed block sequences.
 *
 * A `BlockSequence` keeps the document order of block identities next to a
 * map from identity to canonical content. Identities are MD5 fingerprints of
 * the canonical content, so byte-identical blocks collapse onto one entry
 * while keeping every position in the order list.
 */

use std::collections::{HashMap, HashSet};

use crate::errors::BlockError;
use crate::markdown;

/// Lowercase hex fingerprint of a block's canonical content
pub type BlockHash = String;

/// Separator placed between blocks when rendering
pub const BLOCK_SEPARATOR: &str = "\n\n";

/// Compute the fingerprint of canonical block content
pub fn fingerprint(content: &str) -> BlockHash {
    format!("{:x}", md5::compute(content.as_bytes()))
}

/// Result of subtracting one sequence from another
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diff {
    /// No block of the left side is missing from the right side
    Unchanged,
    /// Blocks new relative to the reference, in document order
    Changed(BlockSequence),
}

/// Ordered, content-addressed container of text blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSequence {
    order: Vec<BlockHash>,
    blocks: HashMap<BlockHash, String>,
}

impl BlockSequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self::default()
    }

    /// Split Markdown text into a fresh sequence of top-level blocks
    pub fn split(text: &str) -> Self {
        let mut sequence = Self::new();
        for block in markdown::split_top_level(text) {
            sequence.push_canonical(block);
        }
        sequence
    }

    /// Append a block at the end of the sequence and return its identity
    pub fn add(&mut self, content: &str) -> BlockHash {
        self.push_canonical(markdown::canonicalize(content))
    }

    fn push_canonical(&mut self, content: String) -> BlockHash {
        let hash = fingerprint(&content);
        self.order.push(hash.clone());
        self.blocks.insert(hash.clone(), content);
        hash
    }

    /// Join block contents in document order with a blank line
    pub fn render(&self) -> String {
        self.order
            .iter()
            .filter_map(|hash| self.blocks.get(hash).map(String::as_str))
            .collect::<Vec<_>>()
            .join(BLOCK_SEPARATOR)
    }

    /// Blocks of `self` whose identity does not appear in `other`
    ///
    /// The fragment keeps the document order of `self`; an identity repeated
    /// in `self` appears once.
    pub fn subtract(&self, other: &BlockSequence) -> Diff {
        let known: HashSet<&BlockHash> = other.order.iter().collect();
        let mut seen: HashSet<&BlockHash> = HashSet::new();
        let mut fragment = BlockSequence::new();

        for hash in &self.order {
            if known.contains(hash) || !seen.insert(hash) {
                continue;
            }
            if let Some(content) = self.blocks.get(hash) {
                fragment.order.push(hash.clone());
                fragment.blocks.insert(hash.clone(), content.clone());
            }
        }

        if fragment.is_empty() {
            Diff::Unchanged
        } else {
            Diff::Changed(fragment)
        }
    }

    /// Overlay the content of `source` for every identity already present
    ///
    /// Returns the number of identities whose content was taken from `source`.
    pub fn pick(&mut self, source: &BlockSequence) -> usize {
        let mut picked = 0;
        for (hash, content) in self.blocks.iter_mut() {
            if let Some(replacement) = source.blocks.get(hash) {
                if content != replacement {
                    content.clone_from(replacement);
                }
                picked += 1;
            }
        }
        picked
    }

    /// Positionally replace every identity with the one supplied at the same index
    pub fn remap(&mut self, identities: &[BlockHash]) -> Result<(), BlockError> {
        if identities.len() != self.order.len() {
            return Err(BlockError::IdentityCountMismatch {
                expected: self.order.len(),
                actual: identities.len(),
            });
        }

        let mut blocks = HashMap::with_capacity(identities.len());
        for (old_hash, new_hash) in self.order.iter().zip(identities) {
            if let Some(content) = self.blocks.get(old_hash) {
                blocks.insert(new_hash.clone(), content.clone());
            }
        }

        self.order = identities.to_vec();
        self.blocks = blocks;
        Ok(())
    }

    /// Content stored for an identity
    pub fn get(&self, hash: &str) -> Option<&str> {
        self.blocks.get(hash).map(String::as_str)
    }

    /// Replace the content stored for an identity already in the sequence
    ///
    /// The identity is kept: every position referencing it renders the new content.
    pub fn set(&mut self, hash: &str, content: String) -> bool {
        match self.blocks.get_mut(hash) {
            Some(existing) => {
                *existing = content;
                true
            }
            None => false,
        }
    }

    /// Identities in document order, duplicates included
    pub fn hashes(&self) -> &[BlockHash] {
        &self.order
    }

    /// Whether an identity appears in the order list
    pub fn contains(&self, hash: &str) -> bool {
        self.blocks.contains_key(hash)
    }

    /// Number of positions in the document
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Number of distinct identities
    pub fn unique_len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterate over (identity, content) pairs in document order
    pub fn iter(&self) -> impl Iterator<Item = (&BlockHash, &str)> {
        self.order
            .iter()
            .filter_map(move |hash| self.blocks.get(hash).map(|content| (hash, content.as_str())))
    }
}

impl std::fmt::Display for BlockSequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.render())
    }
}
