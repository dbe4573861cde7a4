//! Upload seam: hand assembled blocks to a hierarchical document API.
//!
//! The crate does not talk to any service itself. A host implements
//! [`BlockUploader`] over its API client; [`upload_page`] does the rest:
//! it converts every block to the API's native JSON shape with
//! [`native_block`], sends the first batch together with page creation and
//! appends the remainder in batches of at most `batch_size` blocks.
//! [`create_container`] makes the empty parent page that groups them.

use crate::block::{ContentBlock, InlineRun};
use crate::config::MAX_UPLOAD_BATCH_SIZE;
use crate::element::ListStyle;
use crate::error::Doc2BlocksError;
use crate::output::{ConversionOutput, PageOutput};
use serde_json::{json, Map, Value};
use std::fmt;
use tracing::{debug, info};

/// Blocks per request when the caller has no reason to choose otherwise.
pub const DEFAULT_BATCH_SIZE: usize = MAX_UPLOAD_BATCH_SIZE;

/// A client of the target document API.
///
/// Both methods receive blocks already in native JSON form.
#[allow(async_fn_in_trait)]
pub trait BlockUploader {
    type Error: fmt::Display;

    /// Create a page under `parent_id` (or the client's default parent)
    /// holding `children`, returning the new page's id.
    async fn create_page(
        &self,
        parent_id: Option<&str>,
        title: &str,
        children: Vec<Value>,
    ) -> Result<String, Self::Error>;

    /// Append `children` to the end of an existing page.
    async fn append_blocks(&self, page_id: &str, children: Vec<Value>) -> Result<(), Self::Error>;
}

/// Number of requests needed to upload `block_count` blocks: page creation
/// always happens, even for an empty page.
pub fn request_count(block_count: usize, batch_size: usize) -> usize {
    block_count.div_ceil(batch_size.max(1)).max(1)
}

/// Upload one page and return its id.
///
/// # Errors
/// [`Doc2BlocksError::UploadRejected`] naming the 1-indexed request that
/// failed. Batches already sent stay on the page.
pub async fn upload_page<U: BlockUploader>(
    uploader: &U,
    parent_id: Option<&str>,
    page: &PageOutput,
    batch_size: usize,
) -> Result<String, Doc2BlocksError> {
    let batch_size = batch_size.clamp(1, MAX_UPLOAD_BATCH_SIZE);
    let native: Vec<Value> = page.blocks.iter().map(native_block).collect();
    let mut batches = native.chunks(batch_size);
    let rejected = |batch: usize, e: U::Error| Doc2BlocksError::UploadRejected {
        title: page.title.clone(),
        batch,
        detail: e.to_string(),
    };

    info!(
        "Creating page '{}' ({} blocks, {} requests)",
        page.title,
        native.len(),
        request_count(native.len(), batch_size)
    );
    let first = batches.next().map(<[Value]>::to_vec).unwrap_or_default();
    let page_id = uploader
        .create_page(parent_id, &page.title, first)
        .await
        .map_err(|e| rejected(1, e))?;

    for (i, batch) in batches.enumerate() {
        let number = i + 2;
        debug!("Appending batch {} ({} blocks) to '{}'", number, batch.len(), page.title);
        uploader
            .append_blocks(&page_id, batch.to_vec())
            .await
            .map_err(|e| rejected(number, e))?;
    }

    Ok(page_id)
}

/// Create an empty page meant to hold other pages (one per source document
/// or per workbook) and return its id.
///
/// # Errors
/// [`Doc2BlocksError::UploadRejected`] with batch 1.
pub async fn create_container<U: BlockUploader>(
    uploader: &U,
    parent_id: Option<&str>,
    title: &str,
) -> Result<String, Doc2BlocksError> {
    info!("Creating container page '{}'", title);
    uploader
        .create_page(parent_id, title, Vec::new())
        .await
        .map_err(|e| Doc2BlocksError::UploadRejected {
            title: title.to_string(),
            batch: 1,
            detail: e.to_string(),
        })
}

/// Upload every page of a converted document, in order, returning page ids.
pub async fn upload_document<U: BlockUploader>(
    uploader: &U,
    parent_id: Option<&str>,
    output: &ConversionOutput,
    batch_size: usize,
) -> Result<Vec<String>, Doc2BlocksError> {
    let mut ids = Vec::with_capacity(output.pages.len());
    for page in &output.pages {
        ids.push(upload_page(uploader, parent_id, page, batch_size).await?);
    }
    Ok(ids)
}

// ── Native JSON shape ────────────────────────────────────────────────────

/// Convert a block to the document API's JSON representation.
pub fn native_block(block: &ContentBlock) -> Value {
    match block {
        ContentBlock::Heading { level, runs } => {
            text_block(&format!("heading_{}", (*level).clamp(1, 3)), runs)
        }
        ContentBlock::ListItem { style, runs } => {
            let kind = match style {
                ListStyle::Bulleted => "bulleted_list_item",
                ListStyle::Numbered => "numbered_list_item",
            };
            text_block(kind, runs)
        }
        ContentBlock::Paragraph { runs } => text_block("paragraph", runs),
        ContentBlock::Table {
            column_count,
            has_header_row,
            rows,
        } => {
            let children: Vec<Value> = rows
                .iter()
                .map(|row| {
                    let cells: Vec<Value> = row.iter().map(|cell| rich_text(cell)).collect();
                    json!({
                        "object": "block",
                        "type": "table_row",
                        "table_row": { "cells": cells },
                    })
                })
                .collect();
            json!({
                "object": "block",
                "type": "table",
                "table": {
                    "table_width": column_count,
                    "has_column_header": has_header_row,
                    "has_row_header": false,
                    "children": children,
                },
            })
        }
        ContentBlock::Divider => json!({ "object": "block", "type": "divider", "divider": {} }),
    }
}

fn text_block(kind: &str, runs: &[InlineRun]) -> Value {
    let mut block = Map::new();
    block.insert("object".into(), json!("block"));
    block.insert("type".into(), json!(kind));
    block.insert(kind.to_string(), json!({ "rich_text": rich_text(runs) }));
    Value::Object(block)
}

/// Rich-text array for a run list. Annotations are emitted only for runs
/// that carry a flag.
pub fn rich_text(runs: &[InlineRun]) -> Value {
    Value::Array(runs.iter().map(rich_text_item).collect())
}

fn rich_text_item(run: &InlineRun) -> Value {
    let mut text = Map::new();
    text.insert("content".into(), json!(run.content));
    if let Some(url) = &run.link {
        text.insert("link".into(), json!({ "url": url }));
    }

    let mut item = Map::new();
    item.insert("type".into(), json!("text"));
    item.insert("text".into(), Value::Object(text));

    let mut annotations = Map::new();
    for (flag, set) in [
        ("bold", run.bold),
        ("italic", run.italic),
        ("strikethrough", run.strikethrough),
    ] {
        if set {
            annotations.insert(flag.into(), json!(true));
        }
    }
    if !annotations.is_empty() {
        item.insert("annotations".into(), Value::Object(annotations));
    }
    Value::Object(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every request; fails on the configured request number.
    #[derive(Default)]
    struct RecordingUploader {
        calls: Mutex<Vec<(String, usize)>>,
        fail_on: Option<usize>,
    }

    impl RecordingUploader {
        fn record(&self, call: String, n: usize) -> Result<(), String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((call, n));
            if self.fail_on == Some(calls.len()) {
                return Err("rate limited".into());
            }
            Ok(())
        }
    }

    impl BlockUploader for RecordingUploader {
        type Error = String;

        async fn create_page(
            &self,
            _parent_id: Option<&str>,
            title: &str,
            children: Vec<Value>,
        ) -> Result<String, String> {
            self.record(format!("create {title}"), children.len())?;
            Ok(format!("id-{title}"))
        }

        async fn append_blocks(&self, page_id: &str, children: Vec<Value>) -> Result<(), String> {
            self.record(format!("append {page_id}"), children.len())
        }
    }

    fn page_with(n: usize) -> PageOutput {
        PageOutput {
            title: "p".into(),
            markup: String::new(),
            blocks: vec![ContentBlock::Divider; n],
        }
    }

    #[test]
    fn first_batch_goes_with_page_creation() {
        let uploader = RecordingUploader::default();
        let id = tokio_test::block_on(upload_page(&uploader, None, &page_with(250), 100)).unwrap();
        assert_eq!(id, "id-p");
        assert_eq!(
            *uploader.calls.lock().unwrap(),
            vec![
                ("create p".to_string(), 100),
                ("append id-p".to_string(), 100),
                ("append id-p".to_string(), 50),
            ]
        );
    }

    #[test]
    fn empty_page_is_still_created() {
        let uploader = RecordingUploader::default();
        tokio_test::block_on(upload_page(&uploader, Some("parent"), &page_with(0), 100)).unwrap();
        assert_eq!(
            *uploader.calls.lock().unwrap(),
            vec![("create p".to_string(), 0)]
        );
    }

    #[test]
    fn oversized_batch_size_is_capped() {
        let uploader = RecordingUploader::default();
        tokio_test::block_on(upload_page(&uploader, None, &page_with(150), 500)).unwrap();
        let sizes: Vec<usize> = uploader.calls.lock().unwrap().iter().map(|c| c.1).collect();
        assert_eq!(sizes, vec![100, 50]);
    }

    #[test]
    fn rejection_names_the_failing_batch() {
        let uploader = RecordingUploader {
            fail_on: Some(2),
            ..Default::default()
        };
        let err = tokio_test::block_on(upload_page(&uploader, None, &page_with(120), 100))
            .unwrap_err();
        match err {
            Doc2BlocksError::UploadRejected { title, batch, detail } => {
                assert_eq!(title, "p");
                assert_eq!(batch, 2);
                assert_eq!(detail, "rate limited");
            }
            other => panic!("expected UploadRejected, got {other:?}"),
        }
    }

    #[test]
    fn container_is_an_empty_page_that_holds_documents() {
        let uploader = RecordingUploader::default();
        let container =
            tokio_test::block_on(create_container(&uploader, Some("root"), "委員会")).unwrap();
        assert_eq!(container, "id-委員会");
        let parent = Some(container.as_str());
        tokio_test::block_on(upload_page(&uploader, parent, &page_with(3), 100)).unwrap();
        assert_eq!(
            *uploader.calls.lock().unwrap(),
            vec![("create 委員会".to_string(), 0), ("create p".to_string(), 3)]
        );
    }

    #[test]
    fn rejected_container_reports_its_title() {
        let uploader = RecordingUploader {
            fail_on: Some(1),
            ..Default::default()
        };
        let err = tokio_test::block_on(create_container(&uploader, None, "Minutes")).unwrap_err();
        assert!(matches!(
            err,
            Doc2BlocksError::UploadRejected { ref title, batch: 1, .. } if title == "Minutes"
        ));
    }

    #[test]
    fn request_count_includes_creation() {
        assert_eq!(request_count(0, 100), 1);
        assert_eq!(request_count(100, 100), 1);
        assert_eq!(request_count(101, 100), 2);
    }

    #[test]
    fn heading_native_shape() {
        let block = ContentBlock::Heading {
            level: 2,
            runs: vec![InlineRun::bold("Key"), InlineRun::link("docs", "https://d.test")],
        };
        assert_eq!(
            native_block(&block),
            json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": [
                    { "type": "text", "text": { "content": "Key" }, "annotations": { "bold": true } },
                    { "type": "text", "text": { "content": "docs", "link": { "url": "https://d.test" } } },
                ]},
            })
        );
    }

    #[test]
    fn numbered_list_native_type() {
        let block = ContentBlock::ListItem {
            style: ListStyle::Numbered,
            runs: vec![InlineRun::plain("x")],
        };
        assert_eq!(native_block(&block)["type"], "numbered_list_item");
    }

    #[test]
    fn table_native_shape() {
        let block = ContentBlock::Table {
            column_count: 2,
            has_header_row: true,
            rows: vec![
                vec![vec![InlineRun::plain("A")], vec![InlineRun::plain("B")]],
                vec![vec![InlineRun::plain("1")], vec![InlineRun::plain("2")]],
            ],
        };
        let v = native_block(&block);
        assert_eq!(v["table"]["table_width"], 2);
        assert_eq!(v["table"]["has_column_header"], true);
        assert_eq!(v["table"]["has_row_header"], false);
        let rows = v["table"]["children"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1]["table_row"]["cells"][0][0]["text"]["content"], "1");
    }

    #[test]
    fn divider_native_shape() {
        assert_eq!(
            native_block(&ContentBlock::Divider),
            json!({ "object": "block", "type": "divider", "divider": {} })
        );
    }
}
