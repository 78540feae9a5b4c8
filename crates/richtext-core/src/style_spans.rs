//! Run-length encoded style storage.
//!
//! A [`StyleSpans`] covers a character range with a sequence of `(style, length)`
//! runs. The sequence is kept *maximally merged*: no two adjacent spans carry
//! equal styles, and no span is empty. Every transformation returns a new
//! value; nothing here mutates a built `StyleSpans`.

use crate::error::{DocumentError, Result};

/// A single run of characters sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleSpan<S> {
    style: S,
    length: usize,
}

impl<S> StyleSpan<S> {
    /// Create a span. Fails with [`DocumentError::EmptySpan`] when `length == 0`.
    pub fn new(style: S, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(DocumentError::EmptySpan);
        }
        Ok(Self { style, length })
    }

    /// The style of this run.
    pub fn style(&self) -> &S {
        &self.style
    }

    /// Number of characters in this run (always positive).
    pub fn length(&self) -> usize {
        self.length
    }

    /// Consume the span, returning its style.
    pub fn into_style(self) -> S {
        self.style
    }
}

/// An immutable, maximally merged sequence of [`StyleSpan`]s.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(
        try_from = "Vec<StyleSpan<S>>",
        into = "Vec<StyleSpan<S>>",
        bound(
            serialize = "S: serde::Serialize + Clone",
            deserialize = "S: serde::Deserialize<'de> + Clone + PartialEq"
        )
    )
)]
pub struct StyleSpans<S> {
    spans: Vec<StyleSpan<S>>,
    /// Sum of span lengths.
    length: usize,
}

impl<S> StyleSpans<S> {
    /// Spans covering an empty range.
    pub fn empty() -> Self {
        Self {
            spans: Vec::new(),
            length: 0,
        }
    }

    /// A single run of `length` characters. Empty when `length == 0`.
    pub fn single(style: S, length: usize) -> Self {
        if length == 0 {
            return Self::empty();
        }
        Self {
            spans: vec![StyleSpan { style, length }],
            length,
        }
    }

    /// Total number of characters covered.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if no characters are covered.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Number of runs.
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    /// The `index`-th run.
    pub fn get(&self, index: usize) -> Option<&StyleSpan<S>> {
        self.spans.get(index)
    }

    /// All runs, in order.
    pub fn spans(&self) -> &[StyleSpan<S>] {
        &self.spans
    }

    /// Iterate over the runs.
    pub fn iter(&self) -> std::slice::Iter<'_, StyleSpan<S>> {
        self.spans.iter()
    }

    /// Style of the character at `position`, or `None` past the end.
    pub fn style_at(&self, position: usize) -> Option<&S> {
        let mut start = 0;
        for span in &self.spans {
            if position < start + span.length {
                return Some(&span.style);
            }
            start += span.length;
        }
        None
    }
}

impl<S: Clone + PartialEq> StyleSpans<S> {
    /// The runs covering `from..to`.
    ///
    /// Boundary runs are cut to length; the result covers exactly `to - from`
    /// characters and stays maximally merged.
    pub fn sub_spans(&self, from: usize, to: usize) -> Result<Self> {
        DocumentError::check_range(from, to, self.length)?;

        let mut builder = StyleSpansBuilder::new();
        let mut start = 0;
        for span in &self.spans {
            let end = start + span.length;
            if start >= to {
                break;
            }
            let cut_start = start.max(from);
            let cut_end = end.min(to);
            if cut_start < cut_end {
                builder.push(span.style.clone(), cut_end - cut_start);
            }
            start = end;
        }
        Ok(builder.build())
    }

    /// Append `other`, merging the two runs that meet at the seam if their styles are equal.
    pub fn concat(&self, other: &StyleSpans<S>) -> Self {
        let mut builder = StyleSpansBuilder::with_capacity(self.span_count() + other.span_count());
        builder.push_spans(self);
        builder.push_spans(other);
        builder.build()
    }

    /// Map every style through `f`, re-merging runs whose mapped styles become equal.
    pub fn map<T, F>(&self, mut f: F) -> StyleSpans<T>
    where
        T: Clone + PartialEq,
        F: FnMut(&S) -> T,
    {
        let mut builder = StyleSpansBuilder::with_capacity(self.span_count());
        for span in &self.spans {
            builder.push(f(&span.style), span.length);
        }
        builder.build()
    }

    /// Overwrite `from..from + spans.len()` with `spans`.
    pub fn splice(&self, from: usize, spans: &StyleSpans<S>) -> Result<Self> {
        let to = from + spans.len();
        DocumentError::check_range(from, to, self.length)?;

        let mut builder = StyleSpansBuilder::with_capacity(self.span_count() + spans.span_count());
        builder.push_spans(&self.sub_spans(0, from)?);
        builder.push_spans(spans);
        builder.push_spans(&self.sub_spans(to, self.length)?);
        Ok(builder.build())
    }
}

impl<S> Default for StyleSpans<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a, S> IntoIterator for &'a StyleSpans<S> {
    type Item = &'a StyleSpan<S>;
    type IntoIter = std::slice::Iter<'a, StyleSpan<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.iter()
    }
}

impl<S> IntoIterator for StyleSpans<S> {
    type Item = StyleSpan<S>;
    type IntoIter = std::vec::IntoIter<StyleSpan<S>>;

    fn into_iter(self) -> Self::IntoIter {
        self.spans.into_iter()
    }
}

/// Collects `(style, length)` pairs; zero-length pairs are skipped.
impl<S: PartialEq> FromIterator<(S, usize)> for StyleSpans<S> {
    fn from_iter<I: IntoIterator<Item = (S, usize)>>(iter: I) -> Self {
        let mut builder = StyleSpansBuilder::new();
        for (style, length) in iter {
            builder.push(style, length);
        }
        builder.build()
    }
}

impl<S: PartialEq> TryFrom<Vec<StyleSpan<S>>> for StyleSpans<S> {
    type Error = DocumentError;

    fn try_from(spans: Vec<StyleSpan<S>>) -> Result<Self> {
        let mut builder = StyleSpansBuilder::with_capacity(spans.len());
        for span in spans {
            builder.add(span.style, span.length)?;
        }
        Ok(builder.build())
    }
}

impl<S> From<StyleSpans<S>> for Vec<StyleSpan<S>> {
    fn from(spans: StyleSpans<S>) -> Self {
        spans.spans
    }
}

/// Accumulates runs one at a time, coalescing equal neighbours.
///
/// ```rust
/// use richtext_core::StyleSpansBuilder;
///
/// let mut builder = StyleSpansBuilder::new();
/// builder.add("bold", 3).unwrap().add("bold", 2).unwrap().add("plain", 4).unwrap();
/// let spans = builder.build();
/// assert_eq!(spans.span_count(), 2);
/// assert_eq!(spans.len(), 9);
/// ```
#[derive(Debug, Clone)]
pub struct StyleSpansBuilder<S> {
    spans: Vec<StyleSpan<S>>,
    length: usize,
}

impl<S: PartialEq> StyleSpansBuilder<S> {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty builder with room for `capacity` runs.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            spans: Vec::with_capacity(capacity),
            length: 0,
        }
    }

    /// Append a run. Fails with [`DocumentError::EmptySpan`] when `length == 0`.
    pub fn add(&mut self, style: S, length: usize) -> Result<&mut Self> {
        if length == 0 {
            return Err(DocumentError::EmptySpan);
        }
        self.push(style, length);
        Ok(self)
    }

    /// Number of characters accumulated so far.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Returns `true` if nothing has been added yet.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Finish building.
    pub fn build(self) -> StyleSpans<S> {
        StyleSpans {
            spans: self.spans,
            length: self.length,
        }
    }

    pub(crate) fn push(&mut self, style: S, length: usize) {
        if length == 0 {
            return;
        }
        self.length += length;
        match self.spans.last_mut() {
            Some(last) if last.style == style => last.length += length,
            _ => self.spans.push(StyleSpan { style, length }),
        }
    }
}

impl<S: Clone + PartialEq> StyleSpansBuilder<S> {
    pub(crate) fn push_spans(&mut self, spans: &StyleSpans<S>) {
        for span in spans {
            self.push(span.style.clone(), span.length);
        }
    }
}

impl<S: PartialEq> Default for StyleSpansBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out consecutive slices of a [`StyleSpans`] front to back.
pub(crate) struct SpanCursor<'a, S> {
    spans: &'a [StyleSpan<S>],
    index: usize,
    /// Characters of `spans[index]` already consumed.
    offset: usize,
}

impl<'a, S: Clone + PartialEq> SpanCursor<'a, S> {
    pub(crate) fn new(spans: &'a StyleSpans<S>) -> Self {
        Self {
            spans: &spans.spans,
            index: 0,
            offset: 0,
        }
    }

    /// The next `length` characters, or fewer if the spans run out.
    pub(crate) fn take(&mut self, length: usize) -> StyleSpans<S> {
        let mut builder = StyleSpansBuilder::new();
        self.advance(length, |style, n| builder.push(style.clone(), n));
        builder.build()
    }

    pub(crate) fn skip(&mut self, length: usize) {
        self.advance(length, |_, _| {});
    }

    fn advance(&mut self, mut length: usize, mut emit: impl FnMut(&S, usize)) {
        while length > 0 && self.index < self.spans.len() {
            let span = &self.spans[self.index];
            let n = (span.length - self.offset).min(length);
            emit(&span.style, n);
            length -= n;
            self.offset += n;
            if self.offset == span.length {
                self.index += 1;
                self.offset = 0;
            }
        }
    }
}
