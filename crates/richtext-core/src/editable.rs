//! Editable styled document
//!
//! [`EditableStyledDocument`] owns a [`StyledDocument`] and is the only way to change it.
//! It provides:
//!
//! - **Text edits**: [`replace_text`](EditableStyledDocument::replace_text) (plain insertions
//!   take the initial style) and [`replace`](EditableStyledDocument::replace) (insertions keep
//!   their own styles).
//! - **Style edits**: the `set_style*` / `clear_style*` family and the bulk
//!   [`set_style_spans`](EditableStyledDocument::set_style_spans).
//! - **Change notifications**: every committed edit is delivered synchronously, in commit
//!   order, to the registered subscribers and also returned to the caller.
//! - **Version tracking**: the version increments once per committed edit.
//!
//! Every mutator validates its arguments first. An `Err` leaves the document, the version and
//! the subscribers untouched.
//!
//! # Example
//!
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use richtext_core::EditableStyledDocument;
//!
//! let mut doc = EditableStyledDocument::with_text("abc\ndef", "plain");
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! doc.subscribe_plain(move |change| {
//!     sink.lock().unwrap().push(change.inserted().clone());
//! });
//!
//! doc.set_style(0, 7, "bold").unwrap();
//! let change = doc.replace_text(3, 4, "").unwrap();
//!
//! assert_eq!(doc.text(), "abcdef");
//! assert_eq!(change.removed(), "\n");
//! assert_eq!(doc.style_spans(0, 6).unwrap().span_count(), 1);
//! assert_eq!(*seen.lock().unwrap(), vec![String::new()]);
//! assert_eq!(doc.version(), 2);
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::change::{ParagraphChange, PlainTextChange, RichTextChange, TextChange};
use crate::document::StyledDocument;
use crate::error::{DocumentError, Result};
use crate::navigator::{Bias, Position};
use crate::paragraph::Paragraph;
use crate::style_spans::{SpanCursor, StyleSpans};
use crate::update::UpdateIndicator;

/// Plain-text change callback.
pub type PlainChangeCallback = Box<dyn FnMut(&PlainTextChange) + Send>;

/// Rich-text change callback.
pub type RichChangeCallback<S> = Box<dyn FnMut(&RichTextChange<S>) + Send>;

/// Paragraph-list change callback.
pub type ParagraphChangeCallback = Box<dyn FnMut(&ParagraphChange) + Send>;

/// A mutable styled document with change notifications.
///
/// Read queries are available through `Deref` to [`StyledDocument`].
pub struct EditableStyledDocument<S> {
    document: StyledDocument<S>,
    /// Incremented once per committed edit.
    version: u64,
    being_updated: UpdateIndicator,
    plain_callbacks: Vec<PlainChangeCallback>,
    rich_callbacks: Vec<RichChangeCallback<S>>,
    paragraph_callbacks: Vec<ParagraphChangeCallback>,
}

impl<S: Clone + PartialEq> EditableStyledDocument<S> {
    /// Create an empty document (a single empty paragraph).
    pub fn new(initial_style: S) -> Self {
        Self::from_document(StyledDocument::empty(initial_style))
    }

    /// Create a document holding `text`, all of it in `initial_style`.
    pub fn with_text(text: &str, initial_style: S) -> Self {
        Self::from_document(StyledDocument::from_text(text, initial_style))
    }

    /// Start editing an existing document.
    pub fn from_document(document: StyledDocument<S>) -> Self {
        Self {
            document,
            version: 0,
            being_updated: UpdateIndicator::new(),
            plain_callbacks: Vec::new(),
            rich_callbacks: Vec::new(),
            paragraph_callbacks: Vec::new(),
        }
    }

    /// An immutable copy of the current content. Paragraphs are shared, not copied.
    pub fn snapshot(&self) -> StyledDocument<S> {
        self.document.clone()
    }

    /// Replace `start..end` with plain `text`.
    ///
    /// `'\n'` in `text` starts new paragraphs. Inserted characters take the document's
    /// initial style.
    pub fn replace_text(&mut self, start: usize, end: usize, text: &str) -> Result<PlainTextChange> {
        let _span = tracing::debug_span!("replace_text", start, end).entered();

        let inserted = StyledDocument::from_text(text, self.document.initial_style.clone());
        let rich = self.commit_replace(start, end, inserted)?;
        Ok(rich.to_plain())
    }

    /// Replace `start..end` with `replacement`, keeping its per-character styles.
    pub fn replace(
        &mut self,
        start: usize,
        end: usize,
        replacement: &StyledDocument<S>,
    ) -> Result<RichTextChange<S>> {
        let _span = tracing::debug_span!("replace", start, end).entered();
        self.commit_replace(start, end, replacement.clone())
    }

    /// Insert plain `text` at `offset`.
    pub fn insert_text(&mut self, offset: usize, text: &str) -> Result<PlainTextChange> {
        self.replace_text(offset, offset, text)
    }

    /// Delete `start..end`.
    pub fn delete_text(&mut self, start: usize, end: usize) -> Result<PlainTextChange> {
        self.replace_text(start, end, "")
    }

    /// Replay a plain change recorded against the current content.
    ///
    /// Replaying `change.invert()` right after `change` undoes it.
    pub fn apply_plain_change(&mut self, change: &PlainTextChange) -> Result<PlainTextChange> {
        self.replace_text(change.position(), change.removed_end(), change.inserted())
    }

    /// Replay a rich change recorded against the current content, styles included.
    pub fn apply_rich_change(&mut self, change: &RichTextChange<S>) -> Result<RichTextChange<S>> {
        self.replace(change.position(), change.removed_end(), change.inserted())
    }

    /// Set the style of `from..to`.
    pub fn set_style(&mut self, from: usize, to: usize, style: S) -> Result<RichTextChange<S>> {
        DocumentError::check_range(from, to, self.document.len())?;
        self.set_style_spans(from, &StyleSpans::single(style, to - from))
    }

    /// Set the style of a whole paragraph.
    pub fn set_paragraph_style(&mut self, paragraph: usize, style: S) -> Result<RichTextChange<S>> {
        let length = self.document.paragraph(paragraph)?.len();
        self.set_paragraph_style_spans(paragraph, 0, &StyleSpans::single(style, length))
    }

    /// Set the style of columns `from..to` of `paragraph`.
    pub fn set_paragraph_range_style(
        &mut self,
        paragraph: usize,
        from: usize,
        to: usize,
        style: S,
    ) -> Result<RichTextChange<S>> {
        let length = self.document.paragraph(paragraph)?.len();
        DocumentError::check_range(from, to, length)?;
        self.set_paragraph_style_spans(paragraph, from, &StyleSpans::single(style, to - from))
    }

    /// Lay `spans` over the document starting at `from`.
    ///
    /// Consumes exactly `spans.len()` characters. A span position that falls on a paragraph
    /// separator is consumed without effect: separators read the end-of-line style of the
    /// paragraph they terminate. The result equals applying each span with
    /// [`set_style`](Self::set_style) in turn.
    pub fn set_style_spans(&mut self, from: usize, spans: &StyleSpans<S>) -> Result<RichTextChange<S>> {
        let _span = tracing::debug_span!("set_style_spans", from, length = spans.len()).entered();

        let to = from + spans.len();
        DocumentError::check_range(from, to, self.document.len())?;

        let start_pos = self.document.offset_to_position(from, Bias::Forward)?;
        let end_pos = self
            .document
            .offset_by(start_pos, spans.len() as isize, Bias::Backward)?;

        // Build every restyled paragraph before touching the document.
        let mut restyled = Vec::new();
        let mut cursor = SpanCursor::new(spans);
        for i in start_pos.major..=end_pos.major {
            let par = &self.document.paragraphs[i];
            let col_from = if i == start_pos.major { start_pos.minor } else { 0 };
            let col_to = if i == end_pos.major {
                end_pos.minor
            } else {
                par.len() + 1
            };
            let text_len = col_to.min(par.len()).saturating_sub(col_from);
            if text_len > 0 {
                let chunk = cursor.take(text_len);
                restyled.push((i, Arc::new(par.restyle_spans(col_from, &chunk)?)));
            }
            // Separator position.
            cursor.skip(col_to - col_from - text_len);
        }

        let removed = self.document.sub_sequence(from, to)?;

        let _guard = self.being_updated.on();
        for (i, par) in restyled {
            self.document.paragraphs[i] = par;
        }
        let inserted = self.document.sub_sequence(from, to)?;
        let change = TextChange::new(from, removed, inserted);

        self.version += 1;
        tracing::debug!(
            from,
            to,
            paragraphs = end_pos.major.saturating_sub(start_pos.major) + 1,
            version = self.version,
            "restyled range"
        );
        self.notify_rich(&change);
        Ok(change)
    }

    /// Lay `spans` over `paragraph` starting at column `from`.
    ///
    /// The spans must fit inside the paragraph's text.
    pub fn set_paragraph_style_spans(
        &mut self,
        paragraph: usize,
        from: usize,
        spans: &StyleSpans<S>,
    ) -> Result<RichTextChange<S>> {
        let length = self.document.paragraph(paragraph)?.len();
        let to = from + spans.len();
        if to > length {
            return Err(DocumentError::ColumnOutOfRange {
                paragraph,
                column: to,
                length,
            });
        }
        let offset = self
            .document
            .position_to_offset(Position::new(paragraph, from));
        self.set_style_spans(offset, spans)
    }

    /// Reset `from..to` to the initial style.
    pub fn clear_style(&mut self, from: usize, to: usize) -> Result<RichTextChange<S>> {
        let style = self.document.initial_style.clone();
        self.set_style(from, to, style)
    }

    /// Reset a whole paragraph to the initial style.
    pub fn clear_paragraph_style(&mut self, paragraph: usize) -> Result<RichTextChange<S>> {
        let style = self.document.initial_style.clone();
        self.set_paragraph_style(paragraph, style)
    }

    /// Reset columns `from..to` of `paragraph` to the initial style.
    pub fn clear_paragraph_range_style(
        &mut self,
        paragraph: usize,
        from: usize,
        to: usize,
    ) -> Result<RichTextChange<S>> {
        let style = self.document.initial_style.clone();
        self.set_paragraph_range_style(paragraph, from, to, style)
    }

    /// Splice `inserted` over `start..end`, then notify paragraph, plain and rich subscribers.
    fn commit_replace(
        &mut self,
        start: usize,
        end: usize,
        inserted: StyledDocument<S>,
    ) -> Result<RichTextChange<S>> {
        DocumentError::check_range(start, end, self.document.len())?;

        let removed = self.document.sub_sequence(start, end)?;
        let start_pos = self.document.offset_to_position(start, Bias::Forward)?;
        let end_pos = self.document.offset_to_position(end, Bias::Forward)?;
        let (p1, c1) = (start_pos.major, start_pos.minor);
        let (p2, c2) = (end_pos.major, end_pos.minor);

        let first = &self.document.paragraphs[p1];
        let last = &self.document.paragraphs[p2];
        let prefix = kept_part(first, 0, c1)?;
        let suffix = kept_part(last, c2, last.len())?;
        let replacement = splice_paragraphs(&prefix, inserted.paragraphs(), &suffix);
        let inserted_text = inserted.text();

        let _guard = self.being_updated.on();
        let paragraph_change = ParagraphChange {
            index: p1,
            removed: p2 - p1 + 1,
            added: replacement.len(),
        };
        self.document.paragraphs.splice(p1..=p2, replacement);
        self.document.index.replace(start, end, &inserted_text);
        debug_assert_eq!(
            self.document.paragraphs.len(),
            self.document.index.line_count()
        );

        let change = TextChange::new(start, removed, inserted);
        self.version += 1;
        tracing::debug!(
            start,
            end,
            inserted = change.inserted().len(),
            paragraph = p1,
            removed_paragraphs = paragraph_change.removed,
            added_paragraphs = paragraph_change.added,
            version = self.version,
            "replaced range"
        );

        self.notify_paragraphs(&paragraph_change);
        if !self.plain_callbacks.is_empty() {
            self.notify_plain(&change.to_plain());
        }
        self.notify_rich(&change);
        Ok(change)
    }
}

impl<S> EditableStyledDocument<S> {
    /// The current content.
    pub fn document(&self) -> &StyledDocument<S> {
        &self.document
    }

    /// Get current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Check if the document has changed since `version`.
    pub fn has_changed_since(&self, version: u64) -> bool {
        self.version > version
    }

    /// The "update in progress" indicator. On while a mutator applies an edit and notifies
    /// subscribers.
    pub fn being_updated(&self) -> &UpdateIndicator {
        &self.being_updated
    }

    /// Returns `true` while an edit is being applied.
    pub fn is_being_updated(&self) -> bool {
        self.being_updated.is_on()
    }

    /// Subscribe to plain-text changes (text edits only).
    pub fn subscribe_plain<F>(&mut self, callback: F)
    where
        F: FnMut(&PlainTextChange) + Send + 'static,
    {
        self.plain_callbacks.push(Box::new(callback));
    }

    /// Subscribe to rich-text changes (text and style edits).
    pub fn subscribe_rich<F>(&mut self, callback: F)
    where
        F: FnMut(&RichTextChange<S>) + Send + 'static,
    {
        self.rich_callbacks.push(Box::new(callback));
    }

    /// Subscribe to splices of the paragraph list.
    pub fn subscribe_paragraphs<F>(&mut self, callback: F)
    where
        F: FnMut(&ParagraphChange) + Send + 'static,
    {
        self.paragraph_callbacks.push(Box::new(callback));
    }

    /// Drop every subscriber.
    pub fn clear_subscribers(&mut self) {
        self.plain_callbacks.clear();
        self.rich_callbacks.clear();
        self.paragraph_callbacks.clear();
    }

    fn notify_plain(&mut self, change: &PlainTextChange) {
        tracing::trace!(subscribers = self.plain_callbacks.len(), "plain change");
        for callback in &mut self.plain_callbacks {
            callback(change);
        }
    }

    fn notify_rich(&mut self, change: &RichTextChange<S>) {
        tracing::trace!(subscribers = self.rich_callbacks.len(), "rich change");
        for callback in &mut self.rich_callbacks {
            callback(change);
        }
    }

    fn notify_paragraphs(&mut self, change: &ParagraphChange) {
        tracing::trace!(subscribers = self.paragraph_callbacks.len(), ?change, "paragraph change");
        for callback in &mut self.paragraph_callbacks {
            callback(change);
        }
    }
}

/// The part of an edited line that survives a splice.
///
/// Cutting a line with text down to nothing leaves an unstyled empty line, so its newline
/// reads as the initial style like any other typed line break.
fn kept_part<S: Clone + PartialEq>(
    paragraph: &Paragraph<S>,
    from: usize,
    to: usize,
) -> Result<Paragraph<S>> {
    if from == to && !paragraph.is_empty() {
        return Ok(Paragraph::empty());
    }
    paragraph.sub_paragraph(from, to)
}

/// `prefix + inserted[0]`, `inserted[1..n-1]`, `inserted[n-1] + suffix`.
fn splice_paragraphs<S: Clone + PartialEq>(
    prefix: &Paragraph<S>,
    inserted: &[Arc<Paragraph<S>>],
    suffix: &Paragraph<S>,
) -> Vec<Arc<Paragraph<S>>> {
    let n = inserted.len();
    let mut paragraphs = Vec::with_capacity(n);
    if n == 1 {
        paragraphs.push(Arc::new(prefix.concat(&inserted[0]).concat(suffix)));
    } else {
        paragraphs.push(Arc::new(prefix.concat(&inserted[0])));
        paragraphs.extend(inserted[1..n - 1].iter().cloned());
        paragraphs.push(Arc::new(inserted[n - 1].concat(suffix)));
    }
    paragraphs
}

impl<S> Deref for EditableStyledDocument<S> {
    type Target = StyledDocument<S>;

    fn deref(&self) -> &Self::Target {
        &self.document
    }
}

impl<S: Clone + PartialEq> From<StyledDocument<S>> for EditableStyledDocument<S> {
    fn from(document: StyledDocument<S>) -> Self {
        Self::from_document(document)
    }
}

impl<S: fmt::Debug> fmt::Debug for EditableStyledDocument<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditableStyledDocument")
            .field("document", &self.document)
            .field("version", &self.version)
            .field("being_updated", &self.being_updated)
            .field("plain_callbacks", &self.plain_callbacks.len())
            .field("rich_callbacks", &self.rich_callbacks.len())
            .field("paragraph_callbacks", &self.paragraph_callbacks.len())
            .finish()
    }
}
