//! Structured change records.
//!
//! Every committed mutation of an [`EditableStyledDocument`](crate::EditableStyledDocument)
//! is described by a [`TextChange`]: the flat offset where it happened, the content it
//! removed and the content it inserted. Offsets and lengths are in characters.
//!
//! Two flavours exist:
//! - [`PlainTextChange`] carries plain `String`s; text-only consumers (plain undo, indexing)
//!   replay it with [`replace_text`](crate::EditableStyledDocument::replace_text).
//! - [`RichTextChange`] carries [`StyledDocument`]s; replaying it with
//!   [`replace`](crate::EditableStyledDocument::replace) restores styles too.
//!
//! An undo collaborator applies [`TextChange::invert`] to roll a change back, and may fold
//! consecutive changes into one unit with [`TextChange::merge_with`].

use crate::document::StyledDocument;
use crate::error::{DocumentError, Result};
use crate::text;

/// Content carried by a [`TextChange`].
pub trait ChangeContent: Clone {
    /// Length in characters.
    fn length(&self) -> usize;

    /// `self` followed by `other`.
    fn concat(&self, other: &Self) -> Self;

    /// Characters `from..to`.
    fn sub(&self, from: usize, to: usize) -> Result<Self>;
}

impl ChangeContent for String {
    fn length(&self) -> usize {
        text::char_len(self)
    }

    fn concat(&self, other: &Self) -> Self {
        let mut joined = String::with_capacity(self.len() + other.len());
        joined.push_str(self);
        joined.push_str(other);
        joined
    }

    fn sub(&self, from: usize, to: usize) -> Result<Self> {
        DocumentError::check_range(from, to, self.length())?;
        Ok(text::char_slice(self, from, to).to_string())
    }
}

impl<S: Clone + PartialEq> ChangeContent for StyledDocument<S> {
    fn length(&self) -> usize {
        self.len()
    }

    fn concat(&self, other: &Self) -> Self {
        StyledDocument::concat(self, other)
    }

    fn sub(&self, from: usize, to: usize) -> Result<Self> {
        self.sub_sequence(from, to)
    }
}

/// One completed edit: at `position`, `removed` was replaced by `inserted`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextChange<C> {
    position: usize,
    removed: C,
    inserted: C,
}

/// A change with plain-text content.
pub type PlainTextChange = TextChange<String>;

/// A change with styled content.
pub type RichTextChange<S> = TextChange<StyledDocument<S>>;

impl<C> TextChange<C> {
    /// Create a change record.
    pub fn new(position: usize, removed: C, inserted: C) -> Self {
        Self {
            position,
            removed,
            inserted,
        }
    }

    /// Offset where the change happened.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Content that was removed.
    pub fn removed(&self) -> &C {
        &self.removed
    }

    /// Content that was inserted.
    pub fn inserted(&self) -> &C {
        &self.inserted
    }
}

impl<C: ChangeContent> TextChange<C> {
    /// Exclusive end of the removed range, in the document before the change.
    pub fn removed_end(&self) -> usize {
        self.position + self.removed.length()
    }

    /// Exclusive end of the inserted range, in the document after the change.
    pub fn inserted_end(&self) -> usize {
        self.position + self.inserted.length()
    }

    /// Net change in document length.
    pub fn net_length(&self) -> isize {
        self.inserted.length() as isize - self.removed.length() as isize
    }

    /// The change that undoes this one.
    pub fn invert(&self) -> Self {
        Self::new(self.position, self.inserted.clone(), self.removed.clone())
    }

    /// Fold `latter` (applied right after `self`) into a single equivalent change.
    ///
    /// Merges when `latter` continues at the end of what `self` inserted (typing), or when
    /// the range `latter` removed ends exactly there (deleting backwards over fresh input).
    /// Returns `None` for unrelated changes.
    pub fn merge_with(&self, latter: &Self) -> Option<Self> {
        let inserted_end = self.inserted_end();

        if latter.position == inserted_end {
            return Some(Self::new(
                self.position,
                self.removed.concat(&latter.removed),
                self.inserted.concat(&latter.inserted),
            ));
        }

        if latter.removed_end() == inserted_end {
            if self.position <= latter.position {
                let kept = self.inserted.sub(0, latter.position - self.position).ok()?;
                return Some(Self::new(
                    self.position,
                    self.removed.clone(),
                    kept.concat(&latter.inserted),
                ));
            }
            let extra = latter.removed.sub(0, self.position - latter.position).ok()?;
            return Some(Self::new(
                latter.position,
                extra.concat(&self.removed),
                latter.inserted.clone(),
            ));
        }

        None
    }
}

impl<C: ChangeContent + PartialEq> TextChange<C> {
    /// Returns `true` if applying this change leaves the document unchanged.
    pub fn is_identity(&self) -> bool {
        self.removed == self.inserted
    }
}

impl<S: Clone + PartialEq> TextChange<StyledDocument<S>> {
    /// The plain-text view of this change.
    pub fn to_plain(&self) -> PlainTextChange {
        TextChange::new(self.position, self.removed.text(), self.inserted.text())
    }
}

/// A splice of the paragraph sequence: `removed` paragraphs starting at `index` were
/// replaced by `added` new ones.
///
/// Views rendering one widget per paragraph use this to update incrementally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParagraphChange {
    /// First affected paragraph index.
    pub index: usize,
    /// Number of paragraphs removed.
    pub removed: usize,
    /// Number of paragraphs inserted in their place.
    pub added: usize,
}
