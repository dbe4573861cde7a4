//! Markdown rendering: serialise an element stream into canonical markup.
//!
//! Both element vocabularies render through [`ToMarkup`], so the block
//! assembler only ever sees one markup dialect:
//!
//! | Element   | Markup |
//! |-----------|--------|
//! | heading   | `## text` (at most three `#`) |
//! | table     | GFM pipe table, `\|` escaped, one line per row |
//! | paragraph | text, or runs with `**` `*` `~~` `[..](..)` markers |
//! | list item | `  `×indent + `- ` or `1. ` + cleaned text |
//! | divider   | `---` |
//! | image     | `[image: description]` |
//!
//! Every element except a list item is followed by a blank line, so
//! consecutive list items stay one contiguous list.

use crate::block::MAX_HEADING_LEVEL;
use crate::element::{DocElement, ListStyle, StructuralElement};
use crate::pipeline::vocab::clean_list_text;
use crate::source::SourceRun;

/// An element that knows how to write itself as canonical markup lines.
pub trait ToMarkup {
    /// Append this element's lines (including any trailing blank line).
    fn write_markup(&self, lines: &mut Vec<String>);
}

/// Render an element stream to markup, lines joined with `\n`.
pub fn render_markdown<E: ToMarkup>(elements: &[E]) -> String {
    let mut lines = Vec::with_capacity(elements.len() * 2);
    for element in elements {
        element.write_markup(&mut lines);
    }
    lines.join("\n")
}

/// Render one sheet, optionally opening with a `# <sheet name>` heading.
pub fn render_sheet(name: &str, elements: &[StructuralElement], include_title: bool) -> String {
    let mut lines = Vec::with_capacity(elements.len() * 2 + 2);
    if include_title {
        lines.push(heading_line(1, name));
        lines.push(String::new());
    }
    for element in elements {
        element.write_markup(&mut lines);
    }
    lines.join("\n")
}

impl ToMarkup for StructuralElement {
    fn write_markup(&self, lines: &mut Vec<String>) {
        match self {
            StructuralElement::Heading { text, level } => {
                lines.push(heading_line(*level, text));
            }
            StructuralElement::Table { headers, rows } => {
                if headers.is_empty() {
                    return;
                }
                lines.push(format_table(headers, rows));
            }
            StructuralElement::Paragraph { text } => lines.push(text.clone()),
            StructuralElement::Divider => lines.push("---".to_string()),
        }
        lines.push(String::new());
    }
}

impl ToMarkup for DocElement {
    fn write_markup(&self, lines: &mut Vec<String>) {
        match self {
            DocElement::Heading { text, level } => lines.push(heading_line(*level, text)),
            DocElement::Paragraph { text, runs } => {
                if runs.is_empty() {
                    lines.push(text.clone());
                } else {
                    lines.push(rich_text_to_markdown(runs));
                }
            }
            DocElement::Table { headers, rows } => {
                if headers.is_empty() {
                    return;
                }
                lines.push(format_table(headers, rows));
            }
            DocElement::List {
                text,
                style,
                indent,
            } => {
                let marker = match style {
                    ListStyle::Numbered => "1. ",
                    ListStyle::Bulleted => "- ",
                };
                lines.push(format!(
                    "{}{}{}",
                    "  ".repeat(*indent as usize),
                    marker,
                    clean_list_text(text)
                ));
                // no blank line: the next item continues the same list
                return;
            }
            DocElement::Image { description } => lines.push(format!("[image: {description}]")),
            DocElement::Divider => lines.push("---".to_string()),
        }
        lines.push(String::new());
    }
}

fn heading_line(level: u8, text: &str) -> String {
    let level = level.clamp(1, MAX_HEADING_LEVEL) as usize;
    format!("{} {}", "#".repeat(level), text)
}

/// Wrap each run in its markers. Markers compose in a fixed order: bold,
/// then italic, then strikethrough, then the link wrapper outermost.
pub fn rich_text_to_markdown(runs: &[SourceRun]) -> String {
    runs.iter()
        .map(|run| {
            let mut text = run.text.clone();
            if run.bold {
                text = format!("**{text}**");
            }
            if run.italic {
                text = format!("*{text}*");
            }
            if run.strikethrough {
                text = format!("~~{text}~~");
            }
            if let Some(url) = &run.link {
                text = format!("[{text}]({url})");
            }
            text
        })
        .collect()
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ").replace('\r', "")
}

/// Render a GFM pipe table. Data rows are padded or truncated to the header
/// width.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let width = headers.len();
    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(pipe_row(headers.iter().map(String::as_str)));
    out.push(pipe_row(std::iter::repeat_n("---", width)));
    for row in rows {
        let padded = row
            .iter()
            .map(String::as_str)
            .chain(std::iter::repeat(""))
            .take(width);
        out.push(pipe_row(padded));
    }
    out.join("\n")
}

fn pipe_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
    let cells: Vec<String> = cells.map(escape_cell).collect();
    format!("| {} |", cells.join(" | "))
}
