//! Error types for document queries and edits.

use thiserror::Error;

/// Errors produced by [`StyledDocument`](crate::StyledDocument) queries and
/// [`EditableStyledDocument`](crate::EditableStyledDocument) mutations.
///
/// Every fallible operation validates its arguments before touching the
/// paragraph sequence, so an `Err` always leaves the document unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// A flat character offset outside `0..=length`.
    #[error("offset {offset} out of range 0..={length}")]
    OffsetOutOfRange {
        /// The offending offset.
        offset: usize,
        /// Total length in characters at the time of the call.
        length: usize,
    },

    /// A range that violates `start <= end <= length`.
    #[error("invalid range {start}..{end} (length {length})")]
    InvalidRange {
        /// Inclusive start offset.
        start: usize,
        /// Exclusive end offset.
        end: usize,
        /// Total length in characters at the time of the call.
        length: usize,
    },

    /// A paragraph index at or beyond the paragraph count.
    #[error("paragraph {index} out of range (paragraph count {count})")]
    ParagraphOutOfRange {
        /// The offending paragraph index.
        index: usize,
        /// Number of paragraphs in the document.
        count: usize,
    },

    /// A column beyond the end of a paragraph.
    #[error("column {column} out of range in paragraph {paragraph} (length {length})")]
    ColumnOutOfRange {
        /// Paragraph index.
        paragraph: usize,
        /// The offending column.
        column: usize,
        /// Length of the paragraph in characters.
        length: usize,
    },

    /// Paragraph text must not contain `'\n'`.
    #[error("paragraph text contains a line break")]
    LineBreakInParagraph,

    /// Style spans must have a positive length.
    #[error("style span with zero length")]
    EmptySpan,

    /// A document needs at least one paragraph.
    #[error("document has no paragraphs")]
    EmptyDocument,

    /// Style spans and text disagree on the paragraph length.
    #[error("style spans cover {spans} characters but the text has {text}")]
    StyleLengthMismatch {
        /// Text length in characters.
        text: usize,
        /// Sum of the style span lengths.
        spans: usize,
    },
}

impl DocumentError {
    /// Returns `true` for the index-out-of-range family of errors.
    pub fn is_index_out_of_range(&self) -> bool {
        matches!(
            self,
            DocumentError::OffsetOutOfRange { .. }
                | DocumentError::InvalidRange { .. }
                | DocumentError::ParagraphOutOfRange { .. }
                | DocumentError::ColumnOutOfRange { .. }
        )
    }

    pub(crate) fn check_range(start: usize, end: usize, length: usize) -> Result<()> {
        if start <= end && end <= length {
            Ok(())
        } else {
            Err(DocumentError::InvalidRange { start, end, length })
        }
    }

    pub(crate) fn check_offset(offset: usize, length: usize) -> Result<()> {
        if offset <= length {
            Ok(())
        } else {
            Err(DocumentError::OffsetOutOfRange { offset, length })
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DocumentError>;
