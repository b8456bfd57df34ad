/*!
 * Markdown to HTML rendering.
 *
 * Code spans and code blocks can be marked with `translate="no"` so the
 * translation service leaves them untouched.
 */

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Parser as CmarkParser, Tag, TagEnd};
use pulldown_cmark_escape::{escape_html, escape_html_body_text};

use super::parser::parser_options;

/// Render Markdown to HTML, protecting code content when `protect_code` is set
pub fn to_html(markdown: &str, protect_code: bool) -> String {
    let parser = CmarkParser::new_ext(markdown, parser_options());
    let mut output = String::with_capacity(markdown.len() * 3 / 2);

    if !protect_code {
        html::push_html(&mut output, parser);
        return output;
    }

    let mut events: Vec<Event<'_>> = Vec::new();
    let mut code_block: Option<(String, String)> = None;

    for event in parser {
        match event {
            Event::Code(code) => {
                events.push(Event::InlineHtml(CowStr::from(format!(
                    "<code translate=\"no\">{}</code>",
                    escape_body(&code)
                ))));
            }
            Event::Start(Tag::CodeBlock(kind)) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info.split_whitespace().next().unwrap_or("").to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                code_block = Some((language, String::new()));
            }
            Event::End(TagEnd::CodeBlock) => {
                if let Some((language, content)) = code_block.take() {
                    events.push(Event::Html(CowStr::from(protected_code_block(&language, &content))));
                }
            }
            Event::Text(text) if code_block.is_some() => {
                if let Some((_, content)) = code_block.as_mut() {
                    content.push_str(&text);
                }
            }
            other => events.push(other),
        }
    }

    html::push_html(&mut output, events.into_iter());
    output
}

fn protected_code_block(language: &str, content: &str) -> String {
    let class = if language.is_empty() {
        String::new()
    } else {
        format!(" class=\"language-{}\"", escape_attribute(language))
    };
    format!("<pre><code translate=\"no\"{}>{}</code></pre>\n", class, escape_body(content))
}

// Writing to a String never fails
fn escape_body(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let _ = escape_html_body_text(&mut output, text);
    output
}

fn escape_attribute(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let _ = escape_html(&mut output, text);
    output
}
