//! Configuration types for document-to-block conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. One struct for every knob means a
//! config can be cloned into each concurrent document task and logged as a
//! whole.

use crate::block::MAX_TEXT_LEN;
use crate::error::Doc2BlocksError;
use crate::progress::ProgressCallback;
use std::fmt;

/// Largest number of blocks the document API accepts in one request.
pub const MAX_UPLOAD_BATCH_SIZE: usize = 100;

/// Configuration for a document-to-block conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use doc2blocks::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .max_text_len(1000)
///     .concurrency(8)
///     .build()
///     .unwrap();
/// assert_eq!(config.upload_batch_size, 100);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Maximum characters in one text payload. Default: 2000.
    ///
    /// Paragraphs longer than this are split into consecutive blocks;
    /// headings, list items and table cells are truncated to it.
    pub max_text_len: usize,

    /// Blocks per upload request. Range: 1–100. Default: 100.
    ///
    /// The first batch is sent with page creation, the rest as appends.
    pub upload_batch_size: usize,

    /// Open every sheet's markup with a `# <sheet name>` heading. Default: true.
    pub include_sheet_title: bool,

    /// Number of documents converted concurrently in batch mode. Default: 4.
    pub concurrency: usize,

    /// Optional progress callback for batch events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            max_text_len: MAX_TEXT_LEN,
            upload_batch_size: MAX_UPLOAD_BATCH_SIZE,
            include_sheet_title: true,
            concurrency: 4,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("max_text_len", &self.max_text_len)
            .field("upload_batch_size", &self.upload_batch_size)
            .field("include_sheet_title", &self.include_sheet_title)
            .field("concurrency", &self.concurrency)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl fmt::Debug for ConversionConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl ConversionConfigBuilder {
    pub fn max_text_len(mut self, n: usize) -> Self {
        self.config.max_text_len = n;
        self
    }

    pub fn upload_batch_size(mut self, n: usize) -> Self {
        self.config.upload_batch_size = n;
        self
    }

    pub fn include_sheet_title(mut self, v: bool) -> Self {
        self.config.include_sheet_title = v;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Doc2BlocksError> {
        let c = &self.config;
        if c.max_text_len == 0 {
            return Err(Doc2BlocksError::InvalidConfig(
                "max_text_len must be ≥ 1".into(),
            ));
        }
        if c.upload_batch_size == 0 || c.upload_batch_size > MAX_UPLOAD_BATCH_SIZE {
            return Err(Doc2BlocksError::InvalidConfig(format!(
                "upload_batch_size must be 1–{}, got {}",
                MAX_UPLOAD_BATCH_SIZE, c.upload_batch_size
            )));
        }
        if c.concurrency == 0 {
            return Err(Doc2BlocksError::InvalidConfig(
                "concurrency must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
