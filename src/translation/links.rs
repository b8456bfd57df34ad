use std::ops::Range;

use crate::app_config::Config;
use crate::blocks::BlockSequence;
use crate::language_utils;
use crate::markdown::InlineNode;

/// Rewrites absolute links of translated blocks into the language tree
#[derive(Debug, Clone)]
pub struct LinkRewriter {
    enabled: bool,
    root: String,
    exclude_prefixes: Vec<String>,
    canonical_marker: Option<String>,
    languages: Vec<String>,
}

impl LinkRewriter {
    pub fn new(root: impl Into<String>, languages: Vec<String>) -> Self {
        Self {
            enabled: true,
            root: root.into(),
            exclude_prefixes: Vec::new(),
            canonical_marker: None,
            languages,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            enabled: config.links.enabled,
            root: config.links.root.clone(),
            exclude_prefixes: config.links.exclude_prefixes.clone(),
            canonical_marker: config.links.canonical_marker.clone(),
            languages: config.destination_languages.clone(),
        }
    }

    pub fn with_exclude_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.exclude_prefixes = prefixes;
        self
    }

    pub fn with_canonical_marker(mut self, marker: impl Into<String>) -> Self {
        self.canonical_marker = Some(marker.into());
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn root(&self) -> &str {
        self.root.trim_end_matches('/')
    }

    /// New target of a link, or `None` when it must stay as is
    pub fn rewrite_target(&self, target: &str, lang: &str) -> Option<String> {
        if !self.enabled || !target.starts_with('/') {
            return None;
        }

        if self.exclude_prefixes.iter().any(|prefix| target.starts_with(prefix.as_str())) {
            return None;
        }

        let language_root = format!("{}/{}/", self.root(), lang);
        if target.starts_with(&language_root) {
            return None;
        }

        if self.canonical_marker.as_deref() == Some(target) {
            return None;
        }

        let first_segment = target.trim_start_matches('/').split(['/', '#', '?']).next().unwrap_or("");
        if language_utils::is_language_segment(first_segment, &self.languages) {
            return None;
        }

        Some(format!("{}/{}/{}", self.root(), lang, target.trim_start_matches('/')))
    }

    /// Rewrite every eligible inline link of a block
    pub fn rewrite_block(&self, block: &str, lang: &str) -> String {
        if !self.enabled {
            return block.to_string();
        }

        let tree = InlineNode::parse(block);
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        tree.visit_links(&mut |target, span| {
            if let Some(replacement) = self.rewrite_target(target, lang) {
                if let Some(range) = destination_range(block, span, target) {
                    edits.push((range, replacement));
                }
            }
        });

        edits.sort_by_key(|(range, _)| range.start);
        let mut rewritten = block.to_string();
        for (range, replacement) in edits.into_iter().rev() {
            rewritten.replace_range(range, &replacement);
        }
        rewritten
    }

    /// Rewrite the links of every block of a sequence, returns the number of changed blocks
    pub fn rewrite_sequence(&self, sequence: &mut BlockSequence, lang: &str) -> usize {
        let updates: Vec<(String, String)> = sequence
            .iter()
            .filter_map(|(hash, content)| {
                let rewritten = self.rewrite_block(content, lang);
                (rewritten != content).then(|| (hash.clone(), rewritten))
            })
            .collect();

        let changed = updates.len();
        for (hash, content) in updates {
            sequence.set(&hash, content);
        }
        changed
    }
}

/// Byte range of an inline link destination inside its block
///
/// Reference links and destinations written differently from the parsed
/// target (escapes, entities) yield `None`.
fn destination_range(block: &str, span: &Range<usize>, target: &str) -> Option<Range<usize>> {
    let text = block.get(span.clone())?;
    if !text.ends_with(')') {
        return None;
    }

    let open = text.rfind("](")? + 2;
    let rest = &text[open..];
    let skipped = rest.len() - rest.trim_start_matches([' ', '\t', '\n', '<']).len();
    let start = span.start + open + skipped;

    block.get(start..)?.starts_with(target).then(|| start..start + target.len())
}
