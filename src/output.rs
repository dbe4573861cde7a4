//! Output types returned by the conversion entry points.
//!
//! Everything here derives `Serialize`/`Deserialize` so results can be
//! written with [`crate::convert::convert_to_file`] or piped as JSON from the
//! CLI and read back by an uploader in another process.

use crate::block::ContentBlock;
use crate::error::DocumentError;
use serde::{Deserialize, Serialize};

/// One target page: a sheet of a workbook, or a whole word document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageOutput {
    /// Page title, e.g. `"budget - Q1"` for sheet `Q1` of `budget.xlsx`.
    pub title: String,
    /// Normalised canonical markup the blocks were assembled from.
    pub markup: String,
    /// Blocks in upload order.
    pub blocks: Vec<ContentBlock>,
}

/// Counters for one converted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionStats {
    pub page_count: usize,
    /// Elements produced by the analyzer or extractor, before rendering.
    pub element_count: usize,
    pub block_count: usize,
    /// Upload requests needed for every page at the configured batch size.
    pub upload_requests: usize,
    pub duration_ms: u64,
}

/// The complete result of converting one source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Document title (the source file stem).
    pub title: String,
    pub pages: Vec<PageOutput>,
    pub stats: ConversionStats,
}

impl ConversionOutput {
    /// All blocks of all pages, in page order.
    pub fn blocks(&self) -> impl Iterator<Item = &ContentBlock> {
        self.pages.iter().flat_map(|p| p.blocks.iter())
    }

    /// Markup of all pages joined by a blank line.
    pub fn markup(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.markup.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Outcome of one document in a batch: exactly one of `output` and `error`
/// is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// Source path as given by the caller.
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<ConversionOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<DocumentError>,
}

impl DocumentResult {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Counters for a whole batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total_documents: usize,
    pub converted: usize,
    pub failed: usize,
    pub block_count: usize,
    pub duration_ms: u64,
}

/// Results of [`crate::convert::convert_batch`], in input order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOutput {
    pub documents: Vec<DocumentResult>,
    pub stats: BatchStats,
}
