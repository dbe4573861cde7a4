//! Progress-callback trait for per-document conversion events.
//!
//! Inject an [`Arc<dyn ConversionProgressCallback>`] via
//! [`crate::config::ConversionConfigBuilder::progress_callback`] to receive
//! events as a batch is processed. The library never decides how progress is
//! shown: the CLI drives a terminal progress bar, other hosts can forward the
//! events anywhere.
//!
//! # Example
//!
//! ```rust
//! use doc2blocks::{ConversionProgressCallback, ConversionConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     blocks: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _index: usize, _total: usize, source: &str, block_count: usize) {
//!         self.blocks.fetch_add(block_count, Ordering::SeqCst);
//!         eprintln!("{source}: {block_count} blocks");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { blocks: AtomicUsize::new(0) });
//!
//! let config = ConversionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ConversionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by the batch entry points as they process each document.
///
/// Documents are converted concurrently, so `on_document_start`,
/// `on_document_complete` and `on_document_error` may be called from
/// different tasks at once. All methods have default no-op implementations.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before any document is loaded.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called when a document starts loading.
    ///
    /// # Arguments
    /// * `index`  — 1-indexed position of the document in the batch
    /// * `total`  — number of documents in the batch
    /// * `source` — source name (file stem)
    fn on_document_start(&self, index: usize, total: usize, source: &str) {
        let _ = (index, total, source);
    }

    /// Called when a document converted successfully.
    ///
    /// * `block_count` — blocks produced across all of the document's pages
    fn on_document_complete(&self, index: usize, total: usize, source: &str, block_count: usize) {
        let _ = (index, total, source, block_count);
    }

    /// Called when a document failed to load or convert.
    fn on_document_error(&self, index: usize, total: usize, source: &str, error: &str) {
        let _ = (index, total, source, error);
    }

    /// Called once after every document has been attempted.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ConversionConfig`].
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;
