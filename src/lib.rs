//! # doc2blocks
//!
//! Convert spreadsheet and word-processor documents into typed content
//! blocks for a hierarchical document API with strict per-request limits.
//!
//! Spreadsheets carry structure informally (a bold merged cell is a title, an
//! empty row ends a section) and word documents carry it in style names. Both
//! are turned into one canonical markup dialect first, then the markup is
//! assembled into blocks that respect the API's 2000-character text limit and
//! are uploaded in batches of at most 100.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source JSON
//!  │
//!  ├─ 1. Input     load + validate a SourceDocument
//!  ├─ 2. Analyze   sheet grid → headings / tables / paragraphs / dividers
//!  │    Extract    document body → headings / lists / tables / paragraphs
//!  ├─ 3. Render    elements → canonical markup
//!  ├─ 4. Normalise line endings, leading BOM, blank-line runs
//!  ├─ 5. Assemble  markup → ContentBlocks (inline runs, splitting)
//!  └─ 6. Upload    native JSON, first batch with page creation, then appends
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use doc2blocks::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::default();
//!     let output = convert("minutes.json", &config).await?;
//!     for page in &output.pages {
//!         println!("{}: {} blocks", page.title, page.blocks.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doc2blocks` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! doc2blocks = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod block;
pub mod config;
pub mod convert;
pub mod element;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod stream;
pub mod upload;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use block::{ContentBlock, InlineRun, MAX_TEXT_LEN};
pub use config::{ConversionConfig, ConversionConfigBuilder};
pub use convert::{
    convert, convert_batch, convert_body, convert_document, convert_markup, convert_sheet,
    convert_sync, convert_to_file,
};
pub use element::{DocElement, ListStyle, StructuralElement};
pub use error::{Doc2BlocksError, DocumentError};
pub use output::{BatchOutput, BatchStats, ConversionOutput, ConversionStats, DocumentResult, PageOutput};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use source::{BodyItem, Cell, Grid, SourceDocument, SourceRun};
pub use stream::{convert_stream, DocumentStream};
pub use upload::{create_container, native_block, upload_document, upload_page, BlockUploader};
