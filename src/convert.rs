//! Conversion entry points.
//!
//! The per-document core ([`convert_document`] and the functions it is built
//! from) is synchronous and pure: no I/O, no shared state. The async entry
//! points add file loading ([`convert`]), atomic output ([`convert_to_file`])
//! and bounded concurrency over many documents ([`convert_batch`]). Use
//! [`crate::stream::convert_stream`] instead of [`convert_batch`] to receive
//! documents as they finish.

use crate::block::ContentBlock;
use crate::config::ConversionConfig;
use crate::error::{Doc2BlocksError, DocumentError};
use crate::output::{
    BatchOutput, BatchStats, ConversionOutput, ConversionStats, DocumentResult, PageOutput,
};
use crate::pipeline::{analyze, assemble, extract, input, postprocess, render};
use crate::source::{BodyItem, Grid, SourceDocument};
use crate::upload;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Normalise canonical markup and assemble it into blocks.
pub fn convert_markup(markup: &str, max_text_len: usize) -> Vec<ContentBlock> {
    let markup = postprocess::normalise_markup(markup);
    assemble::assemble_blocks(&markup, max_text_len)
}

/// Convert one sheet into its own page titled `"<doc_title> - <sheet name>"`.
pub fn convert_sheet(doc_title: &str, grid: &Grid, config: &ConversionConfig) -> PageOutput {
    sheet_page(doc_title, grid, config).0
}

/// Convert a word-processor body into one page titled `title`.
pub fn convert_body(title: &str, body: &[BodyItem], config: &ConversionConfig) -> PageOutput {
    body_page(title, body, config).0
}

/// Convert a whole source document. Workbooks yield one page per sheet,
/// word documents a single page.
pub fn convert_document(doc: &SourceDocument, config: &ConversionConfig) -> ConversionOutput {
    let start = Instant::now();

    let counted: Vec<(PageOutput, usize)> = match doc {
        SourceDocument::Workbook { title, sheets } => sheets
            .iter()
            .map(|grid| sheet_page(title, grid, config))
            .collect(),
        SourceDocument::WordDocument { title, body } => vec![body_page(title, body, config)],
    };

    let element_count = counted.iter().map(|(_, n)| n).sum();
    let pages: Vec<PageOutput> = counted.into_iter().map(|(page, _)| page).collect();
    let block_count = pages.iter().map(|p| p.blocks.len()).sum();
    let upload_requests = pages
        .iter()
        .map(|p| upload::request_count(p.blocks.len(), config.upload_batch_size))
        .sum();

    let stats = ConversionStats {
        page_count: pages.len(),
        element_count,
        block_count,
        upload_requests,
        duration_ms: start.elapsed().as_millis() as u64,
    };
    debug!(
        "'{}': {} pages, {} elements → {} blocks",
        doc.title(),
        stats.page_count,
        stats.element_count,
        stats.block_count
    );

    ConversionOutput {
        title: doc.title().to_string(),
        pages,
        stats,
    }
}

fn sheet_page(doc_title: &str, grid: &Grid, config: &ConversionConfig) -> (PageOutput, usize) {
    let elements = analyze::analyze_grid(grid);
    let markup = render::render_sheet(&grid.name, &elements, config.include_sheet_title);
    let title = format!("{} - {}", doc_title, grid.name);
    (build_page(title, &markup, config), elements.len())
}

fn body_page(title: &str, body: &[BodyItem], config: &ConversionConfig) -> (PageOutput, usize) {
    let elements = extract::extract_elements(body);
    let markup = render::render_markdown(&elements);
    (build_page(title.to_string(), &markup, config), elements.len())
}

fn build_page(title: String, markup: &str, config: &ConversionConfig) -> PageOutput {
    let markup = postprocess::normalise_markup(markup);
    let blocks = assemble::assemble_blocks(&markup, config.max_text_len);
    PageOutput {
        title,
        markup,
        blocks,
    }
}

/// Load a source document file and convert it.
///
/// An empty title in the file is replaced by the file stem.
///
/// # Errors
/// Returns `Err(Doc2BlocksError)` when the file is missing, unreadable or
/// not a valid source document. Conversion itself never fails.
pub async fn convert(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Doc2BlocksError> {
    let path = path.as_ref();
    info!("Starting conversion: {}", path.display());

    let mut doc = input::load_source(path).await?;
    if doc.title().trim().is_empty() {
        doc = doc.with_title(input::source_name(path));
    }

    let output = convert_document(&doc, config);
    info!(
        "Converted '{}': {} pages, {} blocks in {}ms",
        output.title, output.stats.page_count, output.stats.block_count, output.stats.duration_ms
    );
    Ok(output)
}

/// Convert a source file and write the [`ConversionOutput`] as JSON.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn convert_to_file(
    input_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionStats, Doc2BlocksError> {
    let output = convert(input_path, config).await?;
    let json = serde_json::to_vec_pretty(&output)
        .map_err(|e| Doc2BlocksError::Internal(format!("serialising output: {e}")))?;
    write_atomic(output_path.as_ref(), &json).await?;
    Ok(output.stats)
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
pub async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), Doc2BlocksError> {
    let write_failed = |e| Doc2BlocksError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_failed)?;
    }

    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, bytes).await.map_err(write_failed)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(write_failed)?;
    Ok(())
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    path: impl AsRef<Path>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Doc2BlocksError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Doc2BlocksError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(convert(path, config))
}

/// Convert many source files, at most `config.concurrency` at a time.
///
/// Never fails as a whole: a document that cannot be loaded is reported in
/// its own [`DocumentResult`] and the rest of the batch carries on. Results
/// are returned in input order.
pub async fn convert_batch<P: AsRef<Path>>(inputs: &[P], config: &ConversionConfig) -> BatchOutput {
    let start = Instant::now();
    let total = inputs.len();
    info!("Starting batch of {} documents", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut indexed: Vec<(usize, DocumentResult)> =
        stream::iter(inputs.iter().enumerate().map(|(i, p)| {
            let path = p.as_ref().to_path_buf();
            async move { (i, convert_tracked(i + 1, total, &path, config).await) }
        }))
        .buffer_unordered(config.concurrency.max(1))
        .collect()
        .await;
    indexed.sort_by_key(|(i, _)| *i);
    let documents: Vec<DocumentResult> = indexed.into_iter().map(|(_, r)| r).collect();

    let converted = documents.iter().filter(|d| d.is_ok()).count();
    let stats = BatchStats {
        total_documents: total,
        converted,
        failed: total - converted,
        block_count: documents
            .iter()
            .filter_map(|d| d.output.as_ref())
            .map(|o| o.stats.block_count)
            .sum(),
        duration_ms: start.elapsed().as_millis() as u64,
    };

    info!(
        "Batch complete: {}/{} documents, {} blocks, {}ms",
        stats.converted, stats.total_documents, stats.block_count, stats.duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, converted);
    }

    BatchOutput { documents, stats }
}

/// Convert one document of a batch, firing progress events and downgrading
/// any failure to a [`DocumentError`].
pub(crate) async fn convert_tracked(
    index: usize,
    total: usize,
    path: &Path,
    config: &ConversionConfig,
) -> DocumentResult {
    let name = input::source_name(path);
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(index, total, &name);
    }

    match convert(path, config).await {
        Ok(output) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_complete(index, total, &name, output.stats.block_count);
            }
            DocumentResult {
                source: path.display().to_string(),
                output: Some(output),
                error: None,
            }
        }
        Err(e) => {
            warn!("Skipping {}: {}", path.display(), e);
            let error = DocumentError::from_fatal(&name, &e);
            if let Some(ref cb) = config.progress_callback {
                cb.on_document_error(index, total, &name, &error.to_string());
            }
            DocumentResult {
                source: path.display().to_string(),
                output: None,
                error: Some(error),
            }
        }
    }
}
