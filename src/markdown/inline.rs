/*!
 * Minimal inline structure of a block.
 *
 * Only the shapes needed to walk links are kept: text leaves, links (with
 * their destination and source span) and generic containers.
 */

use std::ops::Range;

use pulldown_cmark::{Event, Parser as CmarkParser, Tag};

use super::parser::parser_options;

/// A node of a block's inline tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineNode {
    /// Literal text (including code spans)
    Text(String),
    /// Link with its destination and the byte span of the whole link
    Link {
        target: String,
        span: Range<usize>,
        children: Vec<InlineNode>,
    },
    /// Any other structure (emphasis, list items, headings...)
    Container(Vec<InlineNode>),
}

impl InlineNode {
    /// Parse a block into its inline tree, rooted at a container
    pub fn parse(block: &str) -> Self {
        // Each frame holds the node under construction and its children
        let mut stack: Vec<(Option<(String, Range<usize>)>, Vec<InlineNode>)> = vec![(None, Vec::new())];

        for (event, range) in CmarkParser::new_ext(block, parser_options()).into_offset_iter() {
            match event {
                Event::Start(Tag::Link { dest_url, .. }) => {
                    stack.push((Some((dest_url.to_string(), range)), Vec::new()));
                }
                Event::Start(_) => stack.push((None, Vec::new())),
                Event::End(_) => {
                    if stack.len() < 2 {
                        continue;
                    }
                    if let Some((link, children)) = stack.pop() {
                        let node = match link {
                            Some((target, span)) => InlineNode::Link { target, span, children },
                            None => InlineNode::Container(children),
                        };
                        if let Some((_, parent)) = stack.last_mut() {
                            parent.push(node);
                        }
                    }
                }
                Event::Text(text) | Event::Code(text) => {
                    if let Some((_, children)) = stack.last_mut() {
                        children.push(InlineNode::Text(text.to_string()));
                    }
                }
                _ => {}
            }
        }

        // Unbalanced input never happens with pulldown-cmark, fold anything left over
        while stack.len() > 1 {
            if let Some((_, children)) = stack.pop() {
                if let Some((_, parent)) = stack.last_mut() {
                    parent.push(InlineNode::Container(children));
                }
            }
        }

        InlineNode::Container(stack.pop().map(|(_, children)| children).unwrap_or_default())
    }

    /// Visit every link of the tree, depth first
    pub fn visit_links<'a>(&'a self, visitor: &mut impl FnMut(&'a str, &'a Range<usize>)) {
        match self {
            InlineNode::Text(_) => {}
            InlineNode::Link { target, span, children } => {
                visitor(target, span);
                for child in children {
                    child.visit_links(visitor);
                }
            }
            InlineNode::Container(children) => {
                for child in children {
                    child.visit_links(visitor);
                }
            }
        }
    }
}
