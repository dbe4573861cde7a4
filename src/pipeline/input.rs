//! Input loading: read a source document file and validate its contents.
//!
//! Source files are the JSON form of [`SourceDocument`]. The binary
//! spreadsheet and word-processor formats are decoded by an external reader
//! that writes this form; here we only check that the file is there, that we
//! may read it, and that it deserialises.

use crate::error::Doc2BlocksError;
use crate::source::SourceDocument;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Load and parse a source document from `path`.
pub async fn load_source(path: impl AsRef<Path>) -> Result<SourceDocument, Doc2BlocksError> {
    let path = path.as_ref().to_path_buf();

    let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
        ErrorKind::NotFound => Doc2BlocksError::SourceNotFound { path: path.clone() },
        ErrorKind::PermissionDenied => Doc2BlocksError::PermissionDenied { path: path.clone() },
        _ => Doc2BlocksError::SourceUnreadable {
            path: path.clone(),
            source: e,
        },
    })?;

    let doc = parse_source(&bytes, &path)?;
    debug!("Loaded source '{}' from {}", doc.title(), path.display());
    Ok(doc)
}

/// Parse source JSON already in memory. `path` is only used for error
/// messages.
pub fn parse_source(bytes: &[u8], path: &Path) -> Result<SourceDocument, Doc2BlocksError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(invalid(path, "file is empty"));
    }
    serde_json::from_slice(bytes).map_err(|e| invalid(path, e.to_string()))
}

fn invalid(path: &Path, detail: impl Into<String>) -> Doc2BlocksError {
    Doc2BlocksError::InvalidSource {
        path: PathBuf::from(path),
        detail: detail.into(),
    }
}

/// Name a source for logs and per-document errors: the file stem, or the
/// whole path if there is none.
pub fn source_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
