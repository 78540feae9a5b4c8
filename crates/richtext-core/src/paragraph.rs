//! A single styled line of text.

use std::fmt;

use crate::error::{DocumentError, Result};
use crate::style_spans::{StyleSpans, StyleSpansBuilder};
use crate::text;

/// One line of text (no `'\n'`) together with style spans covering exactly its length.
///
/// Paragraphs are immutable: every operation returns a new paragraph.
///
/// ```rust
/// use richtext_core::Paragraph;
///
/// let par = Paragraph::plain("hello world", 0u8).unwrap();
/// let (left, right) = par.split(5).unwrap();
/// assert_eq!(left.text(), "hello");
/// assert_eq!(right.text(), " world");
/// assert_eq!(left.concat(&right), par);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "ParagraphRepr<S>",
        into = "ParagraphRepr<S>",
        bound(
            serialize = "S: serde::Serialize + Clone",
            deserialize = "S: serde::Deserialize<'de> + Clone + PartialEq"
        )
    )
)]
pub struct Paragraph<S> {
    text: String,
    /// Length in characters.
    length: usize,
    /// Fast path flag: column == byte index.
    is_ascii: bool,
    styles: StyleSpans<S>,
    /// Style an empty line reports for its end of line. Always `None` once the line has text.
    empty_style: Option<S>,
}

impl<S> Paragraph<S> {
    /// Build a paragraph from text and matching style spans.
    ///
    /// Fails with [`DocumentError::LineBreakInParagraph`] if `text` contains `'\n'`, and with
    /// [`DocumentError::StyleLengthMismatch`] if the spans do not cover the text exactly.
    pub fn new(text: impl Into<String>, styles: StyleSpans<S>) -> Result<Self> {
        let text = text.into();
        if text.contains('\n') {
            return Err(DocumentError::LineBreakInParagraph);
        }
        let length = text::char_len(&text);
        if length != styles.len() {
            return Err(DocumentError::StyleLengthMismatch {
                text: length,
                spans: styles.len(),
            });
        }
        Ok(Self::from_parts(text, styles))
    }

    /// An empty paragraph. Its end of line reads as the owning document's initial style.
    pub fn empty() -> Self {
        Self {
            text: String::new(),
            length: 0,
            is_ascii: true,
            styles: StyleSpans::empty(),
            empty_style: None,
        }
    }

    /// An empty paragraph whose end of line carries `style`.
    pub fn empty_styled(style: S) -> Self {
        Self {
            empty_style: Some(style),
            ..Self::empty()
        }
    }

    pub(crate) fn from_parts(text: String, styles: StyleSpans<S>) -> Self {
        let length = text::char_len(&text);
        debug_assert!(!text.contains('\n'), "paragraph text contains a line break");
        debug_assert_eq!(length, styles.len(), "style spans do not cover the paragraph");
        Self {
            is_ascii: text.is_ascii(),
            text,
            length,
            styles,
            empty_style: None,
        }
    }

    /// The paragraph text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` for an empty line.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The style spans covering this paragraph.
    pub fn style_spans(&self) -> &StyleSpans<S> {
        &self.styles
    }

    /// Character at column `index`.
    pub fn char_at(&self, index: usize) -> Result<char> {
        if index >= self.length {
            return Err(DocumentError::InvalidRange {
                start: index,
                end: index + 1,
                length: self.length,
            });
        }
        let byte = self.byte_offset(index);
        self.text[byte..]
            .chars()
            .next()
            .ok_or(DocumentError::InvalidRange {
                start: index,
                end: index + 1,
                length: self.length,
            })
    }

    /// Text of columns `from..to`. `from == to == len()` is allowed.
    pub fn substring(&self, from: usize, to: usize) -> Result<&str> {
        DocumentError::check_range(from, to, self.length)?;
        Ok(self.slice(from, to))
    }

    /// Style of the character at `column`.
    ///
    /// Columns at or past the end read as the end-of-line style, i.e. the style of the last
    /// character. An empty paragraph reports the style it was created with; `None` means the
    /// owning document's initial style applies.
    pub fn style_at(&self, column: usize) -> Option<&S> {
        if self.length == 0 {
            return self.empty_style.as_ref();
        }
        self.styles.style_at(column.min(self.length - 1))
    }

    /// Style of the position just past the last character.
    pub fn end_of_line_style(&self) -> Option<&S> {
        self.style_at(self.length)
    }

    fn byte_offset(&self, column: usize) -> usize {
        if self.is_ascii {
            column.min(self.text.len())
        } else {
            text::char_to_byte(&self.text, column)
        }
    }

    fn slice(&self, from: usize, to: usize) -> &str {
        if self.is_ascii {
            &self.text[from..to]
        } else {
            text::char_slice(&self.text, from, to)
        }
    }
}

impl<S: Clone + PartialEq> Paragraph<S> {
    /// A paragraph whose whole text carries `style`.
    pub fn plain(text: impl Into<String>, style: S) -> Result<Self> {
        let text = text.into();
        let length = text::char_len(&text);
        Self::new(text, StyleSpans::single(style, length))
    }

    /// Style spans of columns `from..to`, both clamped to `0..=len()`.
    pub fn style_ranges(&self, from: usize, to: usize) -> StyleSpans<S> {
        let to = to.min(self.length);
        let from = from.min(to);
        self.styles.sub_spans(from, to).unwrap_or_default()
    }

    /// The styled sub-paragraph `from..to`.
    ///
    /// An empty cut keeps the style at `from`, so a line trimmed down to its newline still
    /// reports the end-of-line style it had.
    pub fn sub_paragraph(&self, from: usize, to: usize) -> Result<Self> {
        DocumentError::check_range(from, to, self.length)?;
        if from == 0 && to == self.length {
            return Ok(self.clone());
        }
        if from == to {
            return Ok(self
                .style_at(from)
                .map_or_else(Self::empty, |style| Self::empty_styled(style.clone())));
        }
        Ok(Self::from_parts(
            self.slice(from, to).to_string(),
            self.styles.sub_spans(from, to)?,
        ))
    }

    /// Join two lines into one; the runs meeting at the seam merge if equal.
    ///
    /// Joining two empty lines keeps the end-of-line style of `other` when it has one.
    pub fn concat(&self, other: &Paragraph<S>) -> Self {
        if other.is_empty() {
            if self.is_empty() && other.empty_style.is_some() {
                return other.clone();
            }
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut text = String::with_capacity(self.text.len() + other.text.len());
        text.push_str(&self.text);
        text.push_str(&other.text);
        Self::from_parts(text, self.styles.concat(&other.styles))
    }

    /// Split at `column` into `(..column, column..)`.
    pub fn split(&self, column: usize) -> Result<(Self, Self)> {
        DocumentError::check_offset(column, self.length)?;
        Ok((
            self.sub_paragraph(0, column)?,
            self.sub_paragraph(column, self.length)?,
        ))
    }

    /// The same text with every character in `style`.
    pub fn restyle(&self, style: S) -> Self {
        self.with_styles(StyleSpans::single(style, self.length))
    }

    /// The same text with columns `from..to` in `style`.
    pub fn restyle_range(&self, from: usize, to: usize, style: S) -> Result<Self> {
        DocumentError::check_range(from, to, self.length)?;
        self.restyle_spans(from, &StyleSpans::single(style, to - from))
    }

    /// The same text with `spans` laid over the columns starting at `from`.
    pub fn restyle_spans(&self, from: usize, spans: &StyleSpans<S>) -> Result<Self> {
        let styles = self.styles.splice(from, spans)?;
        Ok(self.with_styles(styles))
    }

    /// Same text, new spans. An empty line keeps its end-of-line style.
    fn with_styles(&self, styles: StyleSpans<S>) -> Self {
        Self {
            empty_style: self.empty_style.clone(),
            ..Self::from_parts(self.text.clone(), styles)
        }
    }

    /// Style spans of the line including its terminating newline, `from..=len()`.
    ///
    /// The newline carries the end-of-line style (`fallback` for an empty line).
    pub(crate) fn style_ranges_with_newline(&self, from: usize, fallback: &S) -> StyleSpans<S> {
        let mut builder = StyleSpansBuilder::new();
        builder.push_spans(&self.style_ranges(from, self.length));
        let eol = self.end_of_line_style().unwrap_or(fallback);
        builder.push(eol.clone(), 1);
        builder.build()
    }
}

impl<S> Default for Paragraph<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S> fmt::Display for Paragraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(bound(
    serialize = "S: serde::Serialize + Clone",
    deserialize = "S: serde::Deserialize<'de> + Clone + PartialEq"
))]
struct ParagraphRepr<S> {
    text: String,
    styles: StyleSpans<S>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    empty_style: Option<S>,
}

#[cfg(feature = "serde")]
impl<S> TryFrom<ParagraphRepr<S>> for Paragraph<S> {
    type Error = DocumentError;

    fn try_from(repr: ParagraphRepr<S>) -> Result<Self> {
        let mut paragraph = Paragraph::new(repr.text, repr.styles)?;
        if paragraph.is_empty() {
            paragraph.empty_style = repr.empty_style;
        }
        Ok(paragraph)
    }
}

#[cfg(feature = "serde")]
impl<S> From<Paragraph<S>> for ParagraphRepr<S> {
    fn from(paragraph: Paragraph<S>) -> Self {
        Self {
            text: paragraph.text,
            styles: paragraph.styles,
            empty_style: paragraph.empty_style,
        }
    }
}
