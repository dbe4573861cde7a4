//! Error types for the doc2blocks library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Doc2BlocksError`] — **Fatal**: the operation cannot proceed at all
//!   (source file missing or unreadable, invalid configuration, the upload
//!   service rejected a batch). Returned as `Err(Doc2BlocksError)` from the
//!   top-level entry points.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document of a batch failed
//!   but every other document is fine. Stored inside
//!   [`crate::output::DocumentResult`] so one bad file never aborts the run.
//!
//! The conversion pipeline itself is total: malformed tables, unknown style
//! names and oversized text are resolved in place and never surface here.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the doc2blocks library.
#[derive(Debug, Error)]
pub enum Doc2BlocksError {
    // ── Source errors ─────────────────────────────────────────────────────
    /// Source file was not found at the given path.
    #[error("Source document not found: '{path}'\nCheck the path exists and is readable.")]
    SourceNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but could not be read.
    #[error("Failed to read source document '{path}': {source}")]
    SourceUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but does not hold a valid source document.
    #[error("Invalid source document '{path}': {detail}")]
    InvalidSource { path: PathBuf, detail: String },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// The document service refused a page creation or block append.
    #[error("Upload rejected for page '{title}' (batch {batch}): {detail}")]
    UploadRejected {
        title: String,
        batch: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document in a batch.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The source could not be located or read.
    #[error("{source_name}: source unreadable: {detail}")]
    SourceUnreadable { source_name: String, detail: String },

    /// The source was read but could not be interpreted.
    #[error("{source_name}: invalid source document: {detail}")]
    InvalidSource { source_name: String, detail: String },
}

impl DocumentError {
    /// Downgrade a fatal error to a per-document failure.
    pub fn from_fatal(source_name: impl Into<String>, err: &Doc2BlocksError) -> Self {
        let source_name = source_name.into();
        let detail = err.to_string();
        match err {
            Doc2BlocksError::InvalidSource { .. } | Doc2BlocksError::InvalidConfig(_) => {
                DocumentError::InvalidSource {
                    source_name,
                    detail,
                }
            }
            _ => DocumentError::SourceUnreadable {
                source_name,
                detail,
            },
        }
    }
}
