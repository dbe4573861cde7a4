//! Streaming conversion API: emit documents as they complete.
//!
//! Unlike [`crate::convert::convert_batch`], which returns only after every
//! document finishes, [`convert_stream`] yields each [`DocumentResult`] as
//! soon as it is ready, so a caller can start uploading the first document
//! while the rest are still being read. Documents arrive in completion order;
//! match on `source` if order matters.

use crate::config::ConversionConfig;
use crate::convert::convert_tracked;
use crate::output::DocumentResult;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::pin::Pin;
use tokio_stream::Stream;
use tracing::info;

/// A boxed stream of per-document results.
pub type DocumentStream = Pin<Box<dyn Stream<Item = DocumentResult> + Send>>;

/// Convert many source files, streaming each result as it is ready.
///
/// At most `config.concurrency` documents are in flight. Failures are
/// reported as results with `error` set; the stream never ends early.
/// `on_batch_start` fires here, `on_batch_complete` does not: the stream has
/// no natural completion point for the callback.
pub fn convert_stream<I, P>(inputs: I, config: &ConversionConfig) -> DocumentStream
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let paths: Vec<PathBuf> = inputs
        .into_iter()
        .map(|p| p.as_ref().to_path_buf())
        .collect();
    let total = paths.len();
    info!("Starting streaming conversion of {} documents", total);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let concurrency = config.concurrency.max(1);
    let config = config.clone();
    let s = stream::iter(paths.into_iter().enumerate())
        .map(move |(i, path)| {
            let cfg = config.clone();
            async move { convert_tracked(i + 1, total, &path, &cfg).await }
        })
        .buffer_unordered(concurrency);

    Box::pin(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stream_yields_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        tokio::fs::write(
            &good,
            r#"{"kind":"word_document","title":"good","body":[{"type":"rule"}]}"#,
        )
        .await
        .unwrap();
        let missing = dir.path().join("missing.json");

        let results: Vec<DocumentResult> =
            convert_stream([&good, &missing], &ConversionConfig::default())
                .collect()
                .await;

        assert_eq!(results.len(), 2);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        let failed = results.iter().find(|r| !r.is_ok()).unwrap();
        assert!(failed.source.ends_with("missing.json"));
    }
}
