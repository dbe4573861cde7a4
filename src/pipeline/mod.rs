//! Pipeline stages for document-to-block conversion.
//!
//! Each submodule implements exactly one transformation step, so every stage
//! can be tested on its own with hand-built inputs.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─▶ analyze ─┐
//! input ─────┤            ├─▶ render ──▶ postprocess ──▶ assemble
//! (JSON)     └─▶ extract ─┘   (markup)    (normalise)    (+ inline)
//! ```
//!
//! 1. [`input`]   — read and validate a source document file
//! 2. [`analyze`] — spreadsheet grid → structural elements (style heuristics)
//! 3. [`extract`] — word-processor body → document elements (style names)
//! 4. [`render`]  — either element stream → canonical markup
//! 5. [`postprocess`] — deterministic cleanup of the markup text
//! 6. [`assemble`] — markup → content blocks under the size limit, using
//!    [`inline`] to tokenize bold/italic/strikethrough/link spans
//!
//! [`vocab`] holds the locale vocabularies (style names, bullet glyphs)
//! shared by the extractor, renderer and assembler.

pub mod analyze;
pub mod assemble;
pub mod extract;
pub mod inline;
pub mod input;
pub mod postprocess;
pub mod render;
pub mod vocab;
