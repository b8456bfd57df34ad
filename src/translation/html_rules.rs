/*!
 * Element rules for the built-in HTML to Markdown converter.
 *
 * Raw markup containers are written back as their outer HTML so embedded
 * widgets survive the round trip. Tables become GFM pipe tables, with each
 * cell converted on its own.
 */

use html5ever::serialize::{serialize, SerializeOpts, TraversalScope};
use htmd::Element;
use markup5ever_rcdom::{Handle, NodeData, SerializableHandle};

use super::converter::{BuiltinConverter, MarkupConverter};

/// Elements kept verbatim in the Markdown output
pub const RAW_TAGS: [&str; 2] = ["div", "iframe"];

/// Write an element back as HTML, surrounded by blank lines
pub fn keep_outer_html(element: Element) -> Option<String> {
    let html = outer_html(element.node, TraversalScope::IncludeNode)?;
    Some(format!("\n\n{}\n\n", html.trim()))
}

/// Render a table element as a GFM pipe table
pub fn table_to_gfm(element: Element) -> Option<String> {
    let rows: Vec<Vec<Cell>> = table_rows(element.node)
        .iter()
        .map(row_cells)
        .filter(|cells| !cells.is_empty())
        .collect();

    let Some(header) = rows.first() else {
        return keep_outer_html(element);
    };
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(format_row(header.iter().map(|cell| cell.text.as_str()), width));
    lines.push(format_row(
        (0..width).map(|i| header.get(i).map_or("---", |cell| cell.alignment.marker())),
        width,
    ));
    for row in &rows[1..] {
        lines.push(format_row(row.iter().map(|cell| cell.text.as_str()), width));
    }

    Some(format!("\n\n{}\n\n", lines.join("\n")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl Alignment {
    fn from_style(style: &str) -> Self {
        let style = style.to_ascii_lowercase();
        if !style.contains("text-align") {
            Self::None
        } else if style.contains("center") {
            Self::Center
        } else if style.contains("right") {
            Self::Right
        } else if style.contains("left") {
            Self::Left
        } else {
            Self::None
        }
    }

    fn marker(&self) -> &'static str {
        match self {
            Self::None => "---",
            Self::Left => ":---",
            Self::Center => ":---:",
            Self::Right => "---:",
        }
    }
}

#[derive(Debug)]
struct Cell {
    text: String,
    alignment: Alignment,
}

fn outer_html(node: &Handle, scope: TraversalScope) -> Option<String> {
    let mut buffer = Vec::new();
    let opts = SerializeOpts { traversal_scope: scope, ..Default::default() };
    serialize(&mut buffer, &SerializableHandle::from(node.clone()), opts).ok()?;
    String::from_utf8(buffer).ok()
}

fn tag_name(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Element { name, .. } => Some(String::from(&*name.local)),
        _ => None,
    }
}

fn attribute(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| String::from(&*attr.value)),
        _ => None,
    }
}

/// `tr` elements of a table in document order, nested tables excluded
fn table_rows(table: &Handle) -> Vec<Handle> {
    let mut rows = Vec::new();
    let mut pending: Vec<Handle> = table.children.borrow().iter().rev().cloned().collect();

    while let Some(node) = pending.pop() {
        match tag_name(&node).as_deref() {
            Some("tr") => rows.push(node),
            Some("table") => {}
            _ => pending.extend(node.children.borrow().iter().rev().cloned()),
        }
    }

    rows
}

fn row_cells(row: &Handle) -> Vec<Cell> {
    row.children
        .borrow()
        .iter()
        .filter(|child| matches!(tag_name(child).as_deref(), Some("th" | "td")))
        .map(|cell| Cell {
            text: cell_text(cell),
            alignment: attribute(cell, "style").map_or(Alignment::None, |style| Alignment::from_style(&style)),
        })
        .collect()
}

// Inline Markdown on a single line, pipes escaped
fn cell_text(cell: &Handle) -> String {
    let inner = outer_html(cell, TraversalScope::ChildrenOnly(None)).unwrap_or_default();
    let markdown = BuiltinConverter::new().convert(&inner).unwrap_or_default();
    markdown
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|")
}

fn format_row<'a>(cells: impl Iterator<Item = &'a str>, width: usize) -> String {
    let mut cells: Vec<&str> = cells.collect();
    cells.resize(width, "");
    format!("| {} |", cells.join(" | "))
}
