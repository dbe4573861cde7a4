//! Element extraction from a word-processor body.
//!
//! Each body item is classified on its own: tables are de-duplicated by merge
//! identity, paragraphs run through [`PARAGRAPH_RULES`] (style-named headings,
//! titles, lists, then plain paragraphs). Unknown style names simply fall
//! through to a plain paragraph.

use crate::block::MAX_HEADING_LEVEL;
use crate::element::{DocElement, ListStyle};
use crate::pipeline::vocab;
use crate::source::{BodyItem, Numbering, SourceRun, TableCellItem};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, trace};

/// ASCII or fullwidth digits: `見出し２` is as common as `見出し 2`.
static RE_FIRST_INTEGER: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9０-９]+").unwrap());

/// The paragraph attributes every rule looks at.
struct ParagraphView<'a> {
    style: &'a str,
    /// Concatenated run text, trimmed.
    text: &'a str,
    runs: &'a [SourceRun],
    numbering: Option<Numbering>,
}

type ParagraphRule = fn(&ParagraphView<'_>) -> Option<DocElement>;

/// Paragraph rules in priority order; first match wins.
const PARAGRAPH_RULES: &[(&str, ParagraphRule)] = &[
    ("heading", heading_style_rule),
    ("title", title_style_rule),
    ("list", list_rule),
    ("paragraph", plain_rule),
];

/// Extract typed elements from body items, in document order.
pub fn extract_elements(body: &[BodyItem]) -> Vec<DocElement> {
    let elements: Vec<DocElement> = body.iter().filter_map(extract_item).collect();
    debug!("{} body items → {} elements", body.len(), elements.len());
    elements
}

fn extract_item(item: &BodyItem) -> Option<DocElement> {
    match item {
        BodyItem::Table { rows } => extract_table(rows),
        BodyItem::Paragraph {
            style,
            runs,
            numbering,
        } => extract_paragraph(style, runs, *numbering),
        BodyItem::Image { description } => Some(DocElement::Image {
            description: description.trim().to_string(),
        }),
        BodyItem::Rule => Some(DocElement::Divider),
    }
}

// ── Tables ───────────────────────────────────────────────────────────────

fn extract_table(rows: &[Vec<TableCellItem>]) -> Option<DocElement> {
    let mut rows = rows.iter().map(|row| dedup_merged_cells(row));
    let headers = rows.next()?;
    if headers.is_empty() {
        debug!("dropping table without header cells");
        return None;
    }
    Some(DocElement::Table {
        headers,
        rows: rows.collect(),
    })
}

/// Keep one cell per underlying storage cell. Positions spanned by the same
/// merged cell share a `storage_id`; cells without one are always kept, and
/// equal text alone never collapses two cells.
fn dedup_merged_cells(row: &[TableCellItem]) -> Vec<String> {
    let mut seen = HashSet::new();
    row.iter()
        .filter(|cell| cell.storage_id.is_none_or(|id| seen.insert(id)))
        .map(|cell| cell.text.trim().to_string())
        .collect()
}

// ── Paragraphs ───────────────────────────────────────────────────────────

fn extract_paragraph(
    style: &str,
    runs: &[SourceRun],
    numbering: Option<Numbering>,
) -> Option<DocElement> {
    let full: String = runs.iter().map(|r| r.text.as_str()).collect();
    let text = full.trim();
    if text.is_empty() {
        return None;
    }

    let view = ParagraphView {
        style,
        text,
        runs,
        numbering,
    };
    PARAGRAPH_RULES.iter().find_map(|(name, rule)| {
        let element = rule(&view)?;
        trace!("paragraph style '{}' → {}", style, name);
        Some(element)
    })
}

fn heading_level_from_style(style: &str) -> u8 {
    let Some(digits) = RE_FIRST_INTEGER.find(style) else {
        return 1;
    };
    // saturate: `Heading 99999999999` is deep, not unnumbered
    let n = digits
        .as_str()
        .chars()
        .filter_map(digit_value)
        .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
    n.clamp(1, u32::from(MAX_HEADING_LEVEL)) as u8
}

fn digit_value(c: char) -> Option<u32> {
    match c {
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => c.to_digit(10),
    }
}

fn heading_style_rule(p: &ParagraphView<'_>) -> Option<DocElement> {
    vocab::is_heading_style(p.style).then(|| DocElement::Heading {
        text: p.text.to_string(),
        level: heading_level_from_style(p.style),
    })
}

fn title_style_rule(p: &ParagraphView<'_>) -> Option<DocElement> {
    let level = if vocab::is_title_style(p.style) {
        1
    } else if vocab::is_subtitle_style(p.style) {
        2
    } else {
        return None;
    };
    Some(DocElement::Heading {
        text: p.text.to_string(),
        level,
    })
}

fn list_rule(p: &ParagraphView<'_>) -> Option<DocElement> {
    if p.numbering.is_none() && !vocab::starts_with_bullet(p.text) {
        return None;
    }
    let style = if vocab::is_numbered_style(p.style) || vocab::looks_numbered(p.text) {
        ListStyle::Numbered
    } else {
        ListStyle::Bulleted
    };
    Some(DocElement::List {
        text: p.text.to_string(),
        style,
        indent: p.numbering.map(|n| n.level).unwrap_or(0),
    })
}

fn plain_rule(p: &ParagraphView<'_>) -> Option<DocElement> {
    Some(DocElement::Paragraph {
        text: p.text.to_string(),
        runs: p
            .runs
            .iter()
            .filter(|r| !r.text.is_empty())
            .cloned()
            .collect(),
    })
}
