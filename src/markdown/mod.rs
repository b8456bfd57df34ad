/*!
 * Markdown structure handling.
 *
 * Thin boundary over pulldown-cmark:
 * - `parser`: top-level block splitting and canonical rendering
 * - `inline`: inline tree used to walk links
 * - `html`: HTML rendering with optional code protection
 */

pub mod html;
pub mod inline;
pub mod parser;

pub use self::html::to_html;
pub use self::inline::InlineNode;
pub use self::parser::{canonicalize, split_top_level};
