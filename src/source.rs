//! Source document model: what the spreadsheet and word-processor readers
//! hand to the conversion pipeline.
//!
//! Decoding `.xlsx` / `.docx` containers happens outside this crate. The
//! readers resolve every style attribute the heuristics need (bold, merge
//! membership, fill, font size, paragraph style names, numbering, merge
//! identity) and serialise the result as a [`SourceDocument`]. Every attribute
//! that a reader may not know deserialises to its default, so a missing font
//! or fill is "not bold, no background, no size" rather than an error.

use serde::{Deserialize, Serialize};

// ── Spreadsheet side ─────────────────────────────────────────────────────

/// One cell of a sheet, with the style attributes used for structure
/// inference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Display text; empty string when the cell holds no value.
    #[serde(default)]
    pub value: String,
    /// 1-based row coordinate.
    #[serde(default)]
    pub row: u32,
    /// 1-based column coordinate.
    #[serde(default)]
    pub col: u32,
    #[serde(default)]
    pub bold: bool,
    /// Whether the cell lies inside a merged range.
    #[serde(default)]
    pub merged: bool,
    /// Fill colour (e.g. `"FFFFFF00"`); `None` for no fill.
    #[serde(default)]
    pub background: Option<String>,
    /// Font size in points.
    #[serde(default)]
    pub font_size: Option<f32>,
}

impl Cell {
    /// A plain, unstyled cell.
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Font size with "no size" read as 0pt.
    pub fn size_or_zero(&self) -> f32 {
        self.font_size.unwrap_or(0.0)
    }
}

/// One sheet: a name and its rows of cells.
///
/// Rows may be ragged; cells absent from a short row are treated as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub name: String,
    #[serde(default)]
    pub rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

// ── Word-processor side ──────────────────────────────────────────────────

/// A formatted run of text inside a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRun {
    pub text: String,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub strikethrough: bool,
    /// Resolved hyperlink target when the run sits inside a hyperlink.
    #[serde(default)]
    pub link: Option<String>,
}

impl SourceRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// List-numbering properties attached to a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Numbering {
    /// Nesting level, 0 for the outermost list.
    #[serde(default)]
    pub level: u32,
}

/// A table cell position with its merge identity.
///
/// Every grid position covered by one merged cell carries the same
/// `storage_id`. Positions without an id are always distinct cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableCellItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub storage_id: Option<u64>,
}

/// A body-level item of a word-processor document, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BodyItem {
    Paragraph {
        /// Paragraph style name as shown in the authoring application.
        #[serde(default)]
        style: String,
        #[serde(default)]
        runs: Vec<SourceRun>,
        #[serde(default)]
        numbering: Option<Numbering>,
    },
    Table {
        #[serde(default)]
        rows: Vec<Vec<TableCellItem>>,
    },
    Image {
        #[serde(default)]
        description: String,
    },
    /// Horizontal rule or explicit section break.
    Rule,
}

impl BodyItem {
    /// Paragraph with the given style and a single plain run.
    pub fn paragraph(style: impl Into<String>, text: impl Into<String>) -> Self {
        BodyItem::Paragraph {
            style: style.into(),
            runs: vec![SourceRun::plain(text)],
            numbering: None,
        }
    }
}

// ── Document envelope ────────────────────────────────────────────────────

/// A complete source document as produced by one of the readers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceDocument {
    /// A spreadsheet; each sheet becomes its own page.
    Workbook {
        title: String,
        #[serde(default)]
        sheets: Vec<Grid>,
    },
    /// A word-processor document; becomes a single page.
    WordDocument {
        title: String,
        #[serde(default)]
        body: Vec<BodyItem>,
    },
}

impl SourceDocument {
    pub fn title(&self) -> &str {
        match self {
            SourceDocument::Workbook { title, .. } | SourceDocument::WordDocument { title, .. } => {
                title
            }
        }
    }

    /// Replace the document title.
    pub fn with_title(mut self, new_title: impl Into<String>) -> Self {
        match &mut self {
            SourceDocument::Workbook { title, .. } | SourceDocument::WordDocument { title, .. } => {
                *title = new_title.into();
            }
        }
        self
    }
}
