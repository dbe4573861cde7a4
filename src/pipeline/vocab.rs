//! Locale vocabularies for style-name and list-marker recognition.
//!
//! Documents arrive authored in English or Japanese. Every recognised word
//! and glyph lives in one of the tables below and is checked by membership,
//! so supporting another locale means adding entries here.

use once_cell::sync::Lazy;
use regex::Regex;

/// Paragraph style prefixes that denote a heading (`Heading 2`, `見出し 2`).
pub const HEADING_STYLE_PREFIXES: &[&str] = &["Heading", "見出し"];

/// Paragraph style names that denote a document title (heading level 1).
pub const TITLE_STYLE_NAMES: &[&str] = &["Title", "タイトル"];

/// Paragraph style names that denote a subtitle (heading level 2).
pub const SUBTITLE_STYLE_NAMES: &[&str] = &["Subtitle", "サブタイトル"];

/// Substrings of a list style name that signal numbering.
pub const NUMBERED_STYLE_MARKERS: &[&str] = &["Number", "番号"];

/// Glyphs that open a bulleted line in hand-typed lists.
pub const BULLET_GLYPHS: &[char] = &['・', '●', '○', '■', '□', '◆', '※', '→'];

/// Circled digits used as list markers.
pub const CIRCLED_DIGITS: &[char] = &['①', '②', '③', '④', '⑤', '⑥', '⑦', '⑧', '⑨', '⑩'];

fn glyph_class(glyphs: &[char]) -> String {
    glyphs.iter().collect()
}

static RE_BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[{}]\s*", glyph_class(BULLET_GLYPHS))).expect("bullet class is valid")
});

static RE_NUMBER_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.）)]\s*").unwrap());

static RE_PAREN_NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[（(]\d+[）)]\s*").unwrap());

static RE_CIRCLED_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^[{}]\s*", glyph_class(CIRCLED_DIGITS)))
        .expect("circled digit class is valid")
});

/// Text that starts like a numbered list item: `1. `, `2) `, `3） `.
static RE_NUMBERED_TEXT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+[.）)]\s").unwrap());

pub fn is_heading_style(style: &str) -> bool {
    HEADING_STYLE_PREFIXES.iter().any(|p| style.starts_with(p))
}

pub fn is_title_style(style: &str) -> bool {
    TITLE_STYLE_NAMES.contains(&style)
}

pub fn is_subtitle_style(style: &str) -> bool {
    SUBTITLE_STYLE_NAMES.contains(&style)
}

pub fn is_numbered_style(style: &str) -> bool {
    NUMBERED_STYLE_MARKERS.iter().any(|m| style.contains(m))
}

pub fn starts_with_bullet(text: &str) -> bool {
    text.chars().next().is_some_and(|c| BULLET_GLYPHS.contains(&c))
}

pub fn starts_with_circled_digit(text: &str) -> bool {
    text.chars().next().is_some_and(|c| CIRCLED_DIGITS.contains(&c))
}

pub fn looks_numbered(text: &str) -> bool {
    RE_NUMBERED_TEXT.is_match(text)
}

/// Strip leading list markers a human typed into the text itself: a bullet
/// glyph, then a `1.`/`1)`/`1）` number, then a `(1)`/`（1）` number, then a
/// circled digit. Each marker is removed at most once, in that order.
pub fn clean_list_text(text: &str) -> String {
    let text = RE_BULLET_PREFIX.replace(text, "");
    let text = RE_NUMBER_PREFIX.replace(&text, "");
    let text = RE_PAREN_NUMBER_PREFIX.replace(&text, "");
    let text = RE_CIRCLED_PREFIX.replace(&text, "");
    text.trim().to_string()
}

/// Strip a single leading circled digit and the whitespace after it.
pub fn strip_circled_digit(text: &str) -> String {
    RE_CIRCLED_PREFIX.replace(text, "").into_owned()
}
