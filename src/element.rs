//! Typed elements: the intermediate vocabulary between the two extractors
//! and the Markdown renderer.

use crate::source::SourceRun;
use serde::{Deserialize, Serialize};

/// List flavour shared by [`DocElement::List`] and
/// [`crate::block::ContentBlock::ListItem`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListStyle {
    #[default]
    Bulleted,
    Numbered,
}

/// Element inferred from a spreadsheet grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StructuralElement {
    Heading { text: String, level: u8 },
    Table { headers: Vec<String>, rows: Vec<Vec<String>> },
    Paragraph { text: String },
    Divider,
}

/// Element extracted from a word-processor body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DocElement {
    Heading {
        text: String,
        level: u8,
    },
    /// Plain paragraph; `runs` keeps the source formatting verbatim and is
    /// empty only when no run carried text.
    Paragraph {
        text: String,
        runs: Vec<SourceRun>,
    },
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    List {
        text: String,
        style: ListStyle,
        indent: u32,
    },
    Image {
        description: String,
    },
    Divider,
}
