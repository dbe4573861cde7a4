//! Block assembly: canonical markup → ordered [`ContentBlock`]s.
//!
//! The assembler walks the markup with a line cursor. Runs of `|` lines are
//! consumed together as one table; every other line is classified on its own
//! by [`LINE_RULES`]. All text goes through the inline tokenizer except table
//! cells, which stay plain.
//!
//! The target API rejects any text payload longer than `max_len` characters.
//! Paragraphs are split into consecutive blocks so that nothing is lost;
//! headings and list items cannot be split meaningfully and are truncated.

use crate::block::{ContentBlock, InlineRun, TableCell, MAX_HEADING_LEVEL};
use crate::element::ListStyle;
use crate::pipeline::inline::parse_inline;
use crate::pipeline::vocab;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

static RE_NUMBERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\s").unwrap());

/// A header delimiter row holds only pipes, dashes, colons and whitespace.
static RE_TABLE_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\|[\s|:\-]+\|$").unwrap());

type LineRule = fn(&str, usize) -> Option<Vec<ContentBlock>>;

/// Single-line rules in priority order; first match wins. The paragraph rule
/// accepts any non-blank line.
const LINE_RULES: &[(&str, LineRule)] = &[
    ("heading", heading_rule),
    ("bulleted", dash_item_rule),
    ("numbered", numbered_item_rule),
    ("divider", divider_rule),
    ("glyph bullet", glyph_item_rule),
    ("circled digit", circled_item_rule),
    ("paragraph", paragraph_rule),
];

/// Assemble blocks from markup, honouring a per-block limit of `max_len`
/// characters.
pub fn assemble_blocks(markup: &str, max_len: usize) -> Vec<ContentBlock> {
    let max_len = max_len.max(1);
    let lines: Vec<&str> = markup.split('\n').collect();
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let line = lines[cursor].trim();
        if line.is_empty() {
            cursor += 1;
            continue;
        }

        if line.starts_with('|') {
            let start = cursor;
            while cursor < lines.len() && lines[cursor].trim().starts_with('|') {
                cursor += 1;
            }
            blocks.extend(build_table(&lines[start..cursor], max_len));
            continue;
        }

        if let Some(produced) = LINE_RULES.iter().find_map(|(_, rule)| rule(line, max_len)) {
            blocks.extend(produced);
        }
        cursor += 1;
    }

    debug!("{} markup lines → {} blocks", lines.len(), blocks.len());
    blocks
}

// ── Line rules ───────────────────────────────────────────────────────────

fn heading_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    let caps = RE_HEADING.captures(line)?;
    let level = (caps[1].len() as u8).min(MAX_HEADING_LEVEL);
    Some(vec![ContentBlock::Heading {
        level,
        runs: truncate_runs(parse_inline(&caps[2]), max_len, "heading"),
    }])
}

fn dash_item_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    let rest = line.strip_prefix("- ")?;
    Some(vec![list_item(
        ListStyle::Bulleted,
        &vocab::clean_list_text(rest),
        max_len,
    )])
}

fn numbered_item_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    let prefix = RE_NUMBERED_ITEM.find(line)?;
    Some(vec![list_item(
        ListStyle::Numbered,
        line[prefix.end()..].trim(),
        max_len,
    )])
}

fn divider_rule(line: &str, _max_len: usize) -> Option<Vec<ContentBlock>> {
    (line == "---").then(|| vec![ContentBlock::Divider])
}

fn glyph_item_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    vocab::starts_with_bullet(line).then(|| {
        vec![list_item(
            ListStyle::Bulleted,
            &vocab::clean_list_text(line),
            max_len,
        )]
    })
}

fn circled_item_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    vocab::starts_with_circled_digit(line).then(|| {
        vec![list_item(
            ListStyle::Bulleted,
            vocab::strip_circled_digit(line).trim(),
            max_len,
        )]
    })
}

fn paragraph_rule(line: &str, max_len: usize) -> Option<Vec<ContentBlock>> {
    let chunks = split_runs(parse_inline(line), max_len);
    if chunks.len() > 1 {
        debug!(
            "paragraph of {} chars split into {} blocks",
            line.chars().count(),
            chunks.len()
        );
    }
    Some(
        chunks
            .into_iter()
            .map(|runs| ContentBlock::Paragraph { runs })
            .collect(),
    )
}

fn list_item(style: ListStyle, text: &str, max_len: usize) -> ContentBlock {
    ContentBlock::ListItem {
        style,
        runs: truncate_runs(parse_inline(text), max_len, "list item"),
    }
}

// ── Tables ───────────────────────────────────────────────────────────────

fn build_table(lines: &[&str], max_len: usize) -> Option<ContentBlock> {
    let lines: Vec<&str> = lines.iter().map(|l| l.trim()).collect();
    let delimiter = delimiter_row(&lines);
    let rows: Vec<Vec<String>> = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| Some(*i) != delimiter)
        .map(|(_, l)| split_table_row(l))
        .collect();

    let column_count = rows.first()?.len();
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .chain(std::iter::repeat(String::new()))
                .take(column_count)
                .map(|cell| plain_cell(&cell, max_len))
                .collect()
        })
        .collect();

    Some(ContentBlock::Table {
        column_count,
        has_header_row: true,
        rows,
    })
}

/// Index of the header delimiter row: the second line of the group, or the
/// first when the group opens with one. Any other dash-only line is a data
/// row whose cells read `-`.
fn delimiter_row(lines: &[&str]) -> Option<usize> {
    let is_delimiter = |l: &str| RE_TABLE_SEPARATOR.is_match(l) && l.contains('-');
    if lines.get(1).is_some_and(|l| is_delimiter(*l)) {
        Some(1)
    } else if lines.first().is_some_and(|l| is_delimiter(*l)) {
        Some(0)
    } else {
        None
    }
}

/// Split one table line into trimmed cells. One outer pipe is stripped from
/// each side and `\|` is read as a literal pipe inside a cell.
fn split_table_row(line: &str) -> Vec<String> {
    let inner = line.strip_prefix('|').unwrap_or(line);
    let inner = match inner.strip_suffix('|') {
        Some(s) if !s.ends_with('\\') => s,
        _ => inner,
    };

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    cells.push(current);
    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

fn plain_cell(text: &str, max_len: usize) -> TableCell {
    vec![InlineRun::plain(text.chars().take(max_len).collect::<String>())]
}

// ── Size limit ───────────────────────────────────────────────────────────

/// Split `runs` into consecutive chunks of at most `max_len` characters.
///
/// Two pointers walk the input: one over runs, one over the characters left
/// in the current run. A run that does not fit the space left in a chunk is
/// cut at a character boundary; both pieces keep the run's flags and link.
/// Concatenating every chunk reproduces the input text exactly.
pub fn split_runs(runs: Vec<InlineRun>, max_len: usize) -> Vec<Vec<InlineRun>> {
    let max_len = max_len.max(1);
    let total: usize = runs.iter().map(InlineRun::char_len).sum();
    if total <= max_len {
        return vec![runs];
    }

    let mut chunks = Vec::with_capacity(total.div_ceil(max_len));
    let mut current: Vec<InlineRun> = Vec::new();
    let mut current_len = 0;

    for run in &runs {
        let mut rest = run.content.as_str();
        while !rest.is_empty() {
            if current_len == max_len {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let (piece, tail) = split_at_char(rest, max_len - current_len);
            current_len += piece.chars().count();
            current.push(run.with_content(piece));
            rest = tail;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn split_at_char(s: &str, n: usize) -> (&str, &str) {
    let idx = s.char_indices().nth(n).map(|(i, _)| i).unwrap_or(s.len());
    s.split_at(idx)
}

fn truncate_runs(runs: Vec<InlineRun>, max_len: usize, kind: &str) -> Vec<InlineRun> {
    let total: usize = runs.iter().map(InlineRun::char_len).sum();
    if total <= max_len {
        return runs;
    }
    warn!("{} text of {} chars truncated to {}", kind, total, max_len);
    split_runs(runs, max_len)
        .into_iter()
        .next()
        .unwrap_or_default()
}
