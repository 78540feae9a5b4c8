#![warn(missing_docs)]
//! Richtext Core - Headless Styled Document Model
//!
//! # Overview
//!
//! `richtext-core` is the document model behind a rich text area: an ordered sequence of
//! styled paragraphs with flat-offset addressing, structural edits and change records.
//! It does not render anything. A view layer reads paragraphs and style spans and
//! subscribes to change events to update incrementally.
//!
//! The style type `S` is generic and only needs `Clone + PartialEq`.
//!
//! # Core Features
//!
//! - **Run-length styles**: [`StyleSpans`] keep adjacent equal styles merged
//! - **Shared paragraphs**: sub-sequences and concatenation copy paragraphs by reference
//! - **Fast navigation**: rope-backed [`LineIndex`], O(log n) offset <-> position lookups
//! - **Change records**: plain and rich [`TextChange`]s with invert and merge for undo
//! - **State Tracking**: version number, subscriptions and an update-in-progress indicator
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditableStyledDocument + change records    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  StyledDocument (read view)                 │  ← Queries
//! ├─────────────────────────────────────────────┤
//! │  TwoLevelNavigator over LineIndex (Rope)    │  ← Offset <-> Position
//! ├─────────────────────────────────────────────┤
//! │  Paragraph + StyleSpans                     │  ← Styled text
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use richtext_core::{Bias, EditableStyledDocument, Position};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Style {
//!     Plain,
//!     Bold,
//! }
//!
//! let mut doc = EditableStyledDocument::with_text("abc\ndef", Style::Plain);
//!
//! // Style the whole document, then delete the paragraph separator.
//! doc.set_style(0, 7, Style::Bold).unwrap();
//! let change = doc.replace_text(3, 4, "").unwrap();
//!
//! assert_eq!(doc.text(), "abcdef");
//! assert_eq!(doc.paragraph_count(), 1);
//! assert_eq!(doc.style_spans(0, 6).unwrap().span_count(), 1);
//!
//! // Undo by replaying the inverse change.
//! doc.apply_plain_change(&change.invert()).unwrap();
//! assert_eq!(doc.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
//! ```
//!
//! # Module Description
//!
//! - [`style_spans`] - Run-length encoded styles
//! - [`paragraph`] - Styled line of text
//! - [`navigator`] - Flat offset <-> (paragraph, column) conversion
//! - [`line_index`] - Rope based line index
//! - [`document`] - Read-only styled document
//! - [`editable`] - Mutable document, subscriptions and versioning
//! - [`change`] - Plain and rich change records
//! - [`update`] - Update-in-progress indicator
//! - [`error`] - Error types
//!
//! # Unicode Support
//!
//! - UTF-8 internal encoding
//! - Offsets, columns and lengths count Unicode scalar values (`char`s)
//! - Only `'\n'` separates paragraphs; `'\r'` is ordinary text

pub mod change;
pub mod document;
pub mod editable;
pub mod error;
pub mod line_index;
pub mod navigator;
pub mod paragraph;
pub mod style_spans;
mod text;
pub mod update;

pub use change::{ChangeContent, ParagraphChange, PlainTextChange, RichTextChange, TextChange};
pub use document::StyledDocument;
pub use editable::{
    EditableStyledDocument, ParagraphChangeCallback, PlainChangeCallback, RichChangeCallback,
};
pub use error::{DocumentError, Result};
pub use line_index::LineIndex;
pub use navigator::{Bias, Position, SegmentMetrics, TwoLevelNavigator};
pub use paragraph::Paragraph;
pub use style_spans::{StyleSpan, StyleSpans, StyleSpansBuilder};
pub use update::{UpdateGuard, UpdateIndicator};
