//! Read-only styled document.
//!
//! A [`StyledDocument`] is an ordered, never-empty sequence of [`Paragraph`]s conceptually
//! joined by single `'\n'` separators. Paragraphs are shared behind [`Arc`], so
//! [`sub_sequence`](StyledDocument::sub_sequence) and [`concat`](StyledDocument::concat)
//! copy interior paragraphs by reference.
//!
//! # Example
//!
//! ```rust
//! use richtext_core::{Bias, Position, StyledDocument};
//!
//! let doc = StyledDocument::from_text("abc\ndef", "plain");
//! assert_eq!(doc.len(), 7);
//! assert_eq!(doc.paragraph_count(), 2);
//! assert_eq!(doc.text_range(2, 5).unwrap(), "c\nd");
//! assert_eq!(doc.offset_to_position(4, Bias::Backward).unwrap(), Position::new(0, 4));
//! ```

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::error::{DocumentError, Result};
use crate::line_index::LineIndex;
use crate::navigator::{Bias, Position, TwoLevelNavigator};
use crate::paragraph::Paragraph;
use crate::style_spans::{StyleSpans, StyleSpansBuilder};
use crate::text;

/// An immutable sequence of styled paragraphs.
#[derive(Debug, Clone)]
pub struct StyledDocument<S> {
    pub(crate) paragraphs: Vec<Arc<Paragraph<S>>>,
    pub(crate) index: LineIndex,
    /// Style of characters that have none of their own (empty lines, plain insertions).
    pub(crate) initial_style: S,
}

impl<S> StyledDocument<S> {
    /// Number of characters, counting one per paragraph separator.
    pub fn len(&self) -> usize {
        self.index.char_count()
    }

    /// Returns `true` if the document holds a single empty paragraph.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of paragraphs (always at least 1).
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// All paragraphs, in order.
    pub fn paragraphs(&self) -> &[Arc<Paragraph<S>>] {
        &self.paragraphs
    }

    /// Paragraph `index`.
    pub fn paragraph(&self, index: usize) -> Result<&Paragraph<S>> {
        self.paragraphs
            .get(index)
            .map(|p| p.as_ref())
            .ok_or(DocumentError::ParagraphOutOfRange {
                index,
                count: self.paragraphs.len(),
            })
    }

    /// Text of paragraph `index`.
    pub fn paragraph_text(&self, index: usize) -> Result<&str> {
        self.paragraph(index).map(Paragraph::text)
    }

    /// The style used where no character supplies one.
    pub fn initial_style(&self) -> &S {
        &self.initial_style
    }

    /// The paragraph index backing offset lookups.
    pub fn line_index(&self) -> &LineIndex {
        &self.index
    }

    /// Navigator over this document's paragraphs.
    pub fn navigator(&self) -> TwoLevelNavigator<'_, LineIndex> {
        TwoLevelNavigator::new(&self.index)
    }

    /// Resolve a flat offset to `(paragraph, column)`.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Result<Position> {
        self.navigator().offset_to_position(offset, bias)
    }

    /// Clamped `(paragraph, column)` position.
    pub fn position(&self, row: usize, col: usize) -> Position {
        self.navigator().position(row, col)
    }

    /// Flat offset of a position.
    pub fn position_to_offset(&self, position: Position) -> usize {
        self.navigator().position_to_offset(position)
    }

    /// Move `position` by `delta` characters.
    pub fn offset_by(&self, position: Position, delta: isize, bias: Bias) -> Result<Position> {
        self.navigator().offset_by(position, delta, bias)
    }

    /// The whole text.
    pub fn text(&self) -> String {
        self.index.get_text()
    }

    /// Text of `start..end`, paragraphs joined by `'\n'`.
    pub fn text_range(&self, start: usize, end: usize) -> Result<String> {
        DocumentError::check_range(start, end, self.len())?;
        Ok(self.index.text_slice(start, end).to_string())
    }

    /// Character at `offset`; paragraph separators read as `'\n'`.
    pub fn char_at(&self, offset: usize) -> Result<char> {
        self.index
            .char_at(offset)
            .ok_or(DocumentError::InvalidRange {
                start: offset,
                end: offset + 1,
                length: self.len(),
            })
    }

    /// Style of the character at `offset`.
    ///
    /// A separator, or the end of the document, reads as the end-of-line style of its
    /// paragraph.
    pub fn style_at(&self, offset: usize) -> Result<&S> {
        let pos = self.offset_to_position(offset, Bias::Forward)?;
        self.paragraph_style_at(pos.major, pos.minor)
    }

    /// Style at `column` of paragraph `paragraph`; columns past the end read as end-of-line.
    pub fn paragraph_style_at(&self, paragraph: usize, column: usize) -> Result<&S> {
        let par = self.paragraph(paragraph)?;
        Ok(par.style_at(column).unwrap_or(&self.initial_style))
    }

    /// Column range within `paragraph` covered by the flat selection `start..end`.
    ///
    /// Empty when the selection does not touch the paragraph.
    pub fn paragraph_selection(
        &self,
        paragraph: usize,
        start: usize,
        end: usize,
    ) -> Result<Range<usize>> {
        DocumentError::check_range(start, end, self.len())?;
        let par = self.paragraph(paragraph)?;

        let start_pos = self.offset_to_position(start, Bias::Forward)?;
        let end_pos = self.offset_by(start_pos, (end - start) as isize, Bias::Backward)?;
        if paragraph < start_pos.major || paragraph > end_pos.major {
            return Ok(0..0);
        }

        let from = if paragraph == start_pos.major {
            start_pos.minor
        } else {
            0
        };
        let to = if paragraph == end_pos.major {
            end_pos.minor.min(par.len())
        } else {
            par.len()
        };
        Ok(from.min(to)..to)
    }
}

impl<S: Clone + PartialEq> StyledDocument<S> {
    /// Build a document from plain text, every character in `style`.
    pub fn from_text(text: &str, style: S) -> Self {
        let paragraphs = text::split_paragraphs(text)
            .map(|line| {
                let length = text::char_len(line);
                Arc::new(Paragraph::from_parts(
                    line.to_string(),
                    StyleSpans::single(style.clone(), length),
                ))
            })
            .collect();
        Self {
            paragraphs,
            index: LineIndex::from_text(text),
            initial_style: style,
        }
    }

    /// A document with a single empty paragraph.
    pub fn empty(initial_style: S) -> Self {
        Self {
            paragraphs: vec![Arc::new(Paragraph::empty())],
            index: LineIndex::new(),
            initial_style,
        }
    }

    /// Build a document from paragraphs. Fails with [`DocumentError::EmptyDocument`] if
    /// `paragraphs` yields nothing.
    pub fn from_paragraphs<I>(paragraphs: I, initial_style: S) -> Result<Self>
    where
        I: IntoIterator<Item = Paragraph<S>>,
    {
        let paragraphs: Vec<Arc<Paragraph<S>>> = paragraphs.into_iter().map(Arc::new).collect();
        if paragraphs.is_empty() {
            return Err(DocumentError::EmptyDocument);
        }
        Ok(Self::from_shared(paragraphs, initial_style))
    }

    pub(crate) fn from_shared(paragraphs: Vec<Arc<Paragraph<S>>>, initial_style: S) -> Self {
        let index = LineIndex::from_lines(paragraphs.iter().map(|p| p.text()));
        Self::from_parts(paragraphs, index, initial_style)
    }

    pub(crate) fn from_parts(
        paragraphs: Vec<Arc<Paragraph<S>>>,
        index: LineIndex,
        initial_style: S,
    ) -> Self {
        debug_assert!(!paragraphs.is_empty());
        debug_assert_eq!(paragraphs.len(), index.line_count());
        Self {
            paragraphs,
            index,
            initial_style,
        }
    }

    /// Style spans of `start..end`.
    ///
    /// Each separator contributes one character in the end-of-line style of the paragraph
    /// it terminates.
    pub fn style_spans(&self, start: usize, end: usize) -> Result<StyleSpans<S>> {
        DocumentError::check_range(start, end, self.len())?;

        let start_pos = self.offset_to_position(start, Bias::Forward)?;
        let end_pos = self.offset_by(start_pos, (end - start) as isize, Bias::Backward)?;

        let mut builder = StyleSpansBuilder::new();
        for i in start_pos.major..=end_pos.major {
            let par = &self.paragraphs[i];
            let from = if i == start_pos.major { start_pos.minor } else { 0 };
            let to = if i == end_pos.major {
                end_pos.minor
            } else {
                par.len() + 1
            };
            if to > par.len() {
                builder.push_spans(&par.style_ranges_with_newline(from, &self.initial_style));
            } else {
                builder.push_spans(&par.style_ranges(from, to));
            }
        }
        Ok(builder.build())
    }

    /// Style spans of columns `from..to` of paragraph `paragraph`, clamped to the line.
    pub fn paragraph_style_spans(
        &self,
        paragraph: usize,
        from: usize,
        to: usize,
    ) -> Result<StyleSpans<S>> {
        Ok(self.paragraph(paragraph)?.style_ranges(from, to))
    }

    /// A new document holding `start..end`.
    ///
    /// The first and last affected paragraphs are trimmed, interior paragraphs are shared.
    pub fn sub_sequence(&self, start: usize, end: usize) -> Result<Self> {
        DocumentError::check_range(start, end, self.len())?;

        let start_pos = self.offset_to_position(start, Bias::Forward)?;
        // Forward so a separator at the end of the range is kept.
        let end_pos = self.offset_to_position(end, Bias::Forward)?;
        let (p1, c1) = (start_pos.major, start_pos.minor);
        let (p2, c2) = (end_pos.major, end_pos.minor);

        let mut paragraphs = Vec::with_capacity(p2 - p1 + 1);
        if p1 == p2 {
            paragraphs.push(Arc::new(self.paragraphs[p1].sub_paragraph(c1, c2)?));
        } else {
            let first = &self.paragraphs[p1];
            paragraphs.push(Arc::new(first.sub_paragraph(c1, first.len())?));
            paragraphs.extend(self.paragraphs[p1 + 1..p2].iter().cloned());
            paragraphs.push(Arc::new(self.paragraphs[p2].sub_paragraph(0, c2)?));
        }

        Ok(Self::from_parts(
            paragraphs,
            self.index.slice(start, end),
            self.initial_style.clone(),
        ))
    }

    /// Append `other`. The last paragraph of `self` and the first of `other` merge into one.
    pub fn concat(&self, other: &StyledDocument<S>) -> Self {
        let n1 = self.paragraphs.len();
        let mut paragraphs = Vec::with_capacity(n1 + other.paragraphs.len() - 1);
        paragraphs.extend(self.paragraphs[..n1 - 1].iter().cloned());
        paragraphs.push(Arc::new(
            self.paragraphs[n1 - 1].concat(&other.paragraphs[0]),
        ));
        paragraphs.extend(other.paragraphs[1..].iter().cloned());

        let mut index = self.index.clone();
        index.append(&other.index);
        Self::from_parts(paragraphs, index, self.initial_style.clone())
    }

    /// Per-character styles of the whole document, separators included.
    pub fn styles(&self) -> StyleSpans<S> {
        let mut builder = StyleSpansBuilder::with_capacity(self.paragraphs.len());
        let last = self.paragraphs.len() - 1;
        for (i, par) in self.paragraphs.iter().enumerate() {
            if i == last {
                builder.push_spans(par.style_spans());
            } else {
                builder.push_spans(&par.style_ranges_with_newline(0, &self.initial_style));
            }
        }
        builder.build()
    }
}

/// Documents compare by paragraphs and initial style.
impl<S: PartialEq> PartialEq for StyledDocument<S> {
    fn eq(&self, other: &Self) -> bool {
        self.initial_style == other.initial_style && self.paragraphs == other.paragraphs
    }
}

impl<S: Eq> Eq for StyledDocument<S> {}

impl<S> fmt::Display for StyledDocument<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.index.text_slice(0, self.len()).chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
