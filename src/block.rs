//! Final output vocabulary: inline runs and content blocks.
//!
//! A [`ContentBlock`] is what the upload collaborator maps onto the target
//! document API. Every block honours the per-block text limit
//! ([`MAX_TEXT_LEN`] by default): the runs of one block never concatenate to
//! more characters than the limit.

use crate::element::ListStyle;
use serde::{Deserialize, Serialize};

/// Per-block text limit imposed by the target document API, in characters.
pub const MAX_TEXT_LEN: usize = 2000;

/// Maximum heading depth the target API supports.
pub const MAX_HEADING_LEVEL: u8 = 3;

/// A span of text sharing one formatting state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineRun {
    pub content: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub strikethrough: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl InlineRun {
    pub fn plain(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    pub fn bold(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            italic: true,
            ..Self::default()
        }
    }

    pub fn strikethrough(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            strikethrough: true,
            ..Self::default()
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            link: Some(url.into()),
            ..Self::default()
        }
    }

    /// Length in characters (not bytes), the unit of the API limit.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// True when the run carries no formatting and no link.
    pub fn is_plain(&self) -> bool {
        !self.bold && !self.italic && !self.strikethrough && self.link.is_none()
    }

    /// Same formatting, different text.
    pub fn with_content(&self, content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..self.clone()
        }
    }
}

/// Concatenated content of a run sequence.
pub fn runs_text(runs: &[InlineRun]) -> String {
    runs.iter().map(|r| r.content.as_str()).collect()
}

/// One table cell: plain runs only.
pub type TableCell = Vec<InlineRun>;

/// A typed unit of content ready for upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Heading {
        level: u8,
        runs: Vec<InlineRun>,
    },
    ListItem {
        style: ListStyle,
        runs: Vec<InlineRun>,
    },
    Paragraph {
        runs: Vec<InlineRun>,
    },
    /// Rows are an attribute of the table, not child blocks. Every row holds
    /// exactly `column_count` cells.
    Table {
        column_count: usize,
        has_header_row: bool,
        rows: Vec<Vec<TableCell>>,
    },
    Divider,
}

impl ContentBlock {
    /// Short variant name, used in logs and stats.
    pub fn kind(&self) -> &'static str {
        match self {
            ContentBlock::Heading { .. } => "heading",
            ContentBlock::ListItem { .. } => "list_item",
            ContentBlock::Paragraph { .. } => "paragraph",
            ContentBlock::Table { .. } => "table",
            ContentBlock::Divider => "divider",
        }
    }

    /// Inline runs of text-bearing blocks; `None` for tables and dividers.
    pub fn runs(&self) -> Option<&[InlineRun]> {
        match self {
            ContentBlock::Heading { runs, .. }
            | ContentBlock::ListItem { runs, .. }
            | ContentBlock::Paragraph { runs } => Some(runs),
            ContentBlock::Table { .. } | ContentBlock::Divider => None,
        }
    }

    /// Concatenated text of a text-bearing block, empty otherwise.
    pub fn text(&self) -> String {
        self.runs().map(runs_text).unwrap_or_default()
    }
}
