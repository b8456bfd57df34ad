/*!
 * Top-level block splitting.
 *
 * The canonical form of a block is its source span with line endings
 * normalized and surrounding whitespace trimmed. Text found between two
 * top-level nodes (link reference definitions are not reported as nodes by
 * the parser) is kept as a block of its own.
 */

use std::ops::Range;

use pulldown_cmark::{Event, Options, Parser as CmarkParser};

/// Parser options shared by splitting, inline parsing and HTML rendering
pub fn parser_options() -> Options {
    Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES
}

/// Split Markdown text into the canonical text of its top-level blocks
pub fn split_top_level(text: &str) -> Vec<String> {
    let source = normalize_line_endings(text);
    let mut blocks = Vec::new();
    let mut cursor = 0;

    for range in top_level_ranges(&source) {
        if range.start > cursor {
            push_canonical(&mut blocks, &source[cursor..range.start]);
        }
        push_canonical(&mut blocks, &source[range.clone()]);
        cursor = cursor.max(range.end);
    }

    if cursor < source.len() {
        push_canonical(&mut blocks, &source[cursor..]);
    }

    blocks
}

/// Canonical rendering of a single node's source text
pub fn canonicalize(text: &str) -> String {
    normalize_line_endings(text).trim().to_string()
}

fn push_canonical(blocks: &mut Vec<String>, text: &str) {
    let canonical = text.trim();
    if !canonical.is_empty() {
        blocks.push(canonical.to_string());
    }
}

fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Byte ranges of the top-level nodes of a document
fn top_level_ranges(source: &str) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut depth = 0usize;

    for (event, range) in CmarkParser::new_ext(source, parser_options()).into_offset_iter() {
        match event {
            Event::Start(_) => {
                if depth == 0 {
                    ranges.push(range);
                }
                depth += 1;
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            // Leaf nodes at the top level (thematic breaks)
            _ if depth == 0 => ranges.push(range),
            _ => {}
        }
    }

    ranges
}
