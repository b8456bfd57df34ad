/*!
 * Translation of block sequences.
 *
 * - `converter`: HTML back to Markdown
 * - `html_rules`: raw HTML and table handling of the built-in converter
 * - `bridge`: Markdown to HTML, engine call, HTML to Markdown
 * - `links`: absolute link rewriting for language trees
 * - `merge`: incremental update of a translation from a new source version
 */

pub use self::bridge::{to_markup, MarkupBridge};
pub use self::converter::{BuiltinConverter, CommandConverter, MarkupConverter};
pub use self::links::LinkRewriter;
pub use self::merge::MergeEngine;

pub mod bridge;
pub mod converter;
mod html_rules;
pub mod links;
pub mod merge;
