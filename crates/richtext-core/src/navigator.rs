//! Two-level navigation: flat offset <-> (segment, offset-in-segment).
//!
//! A document is a sequence of segments (paragraphs). Every segment except the last
//! contributes one extra character for its implicit newline, so a flat offset that lands
//! exactly between two segments is ambiguous: it is both the end of the previous segment
//! and the start of the next. [`Bias`] picks one.
//!
//! The navigator never caches segment lengths. It asks a [`SegmentMetrics`] on every call,
//! so it stays correct across structural edits of the owner.

use crate::error::{DocumentError, Result};

/// Disambiguation rule for offsets sitting on a segment boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Bias {
    /// Resolve to the start of the next segment.
    #[default]
    Forward,
    /// Resolve to the end of the previous segment.
    Backward,
}

/// A `(major, minor)` pair: segment index and offset within that segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    /// Segment (paragraph) index.
    pub major: usize,
    /// Offset within the segment.
    pub minor: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(major: usize, minor: usize) -> Self {
        Self { major, minor }
    }
}

/// Segment lengths as seen by a [`TwoLevelNavigator`].
///
/// Only [`segment_count`](SegmentMetrics::segment_count) and
/// [`segment_length`](SegmentMetrics::segment_length) are required; the provided methods
/// walk the segments linearly. Implementors with an index (see
/// [`LineIndex`](crate::LineIndex)) override them with logarithmic lookups.
pub trait SegmentMetrics {
    /// Number of segments.
    fn segment_count(&self) -> usize;

    /// Length of segment `index`, including its trailing separator if any.
    fn segment_length(&self, index: usize) -> usize;

    /// Sum of all segment lengths.
    fn total_length(&self) -> usize {
        (0..self.segment_count())
            .map(|i| self.segment_length(i))
            .sum()
    }

    /// Flat offset of the first character of segment `index`.
    fn segment_start(&self, index: usize) -> usize {
        (0..index).map(|i| self.segment_length(i)).sum()
    }

    /// Segment containing `offset` under [`Bias::Forward`].
    ///
    /// `offset == total_length()` resolves to the last segment.
    fn segment_at(&self, offset: usize) -> usize {
        let count = self.segment_count();
        let mut remaining = offset;
        let mut index = 0;
        while index + 1 < count {
            let len = self.segment_length(index);
            if remaining < len {
                break;
            }
            remaining -= len;
            index += 1;
        }
        index
    }
}

impl SegmentMetrics for [usize] {
    fn segment_count(&self) -> usize {
        self.len()
    }

    fn segment_length(&self, index: usize) -> usize {
        self.get(index).copied().unwrap_or(0)
    }
}

/// Converts between flat offsets and [`Position`]s over a [`SegmentMetrics`].
///
/// ```rust
/// use richtext_core::{Bias, Position, TwoLevelNavigator};
///
/// // "abc\n" + "def": lengths include the newline of every segment but the last.
/// let segments = [4usize, 3];
/// let nav = TwoLevelNavigator::new(&segments[..]);
///
/// assert_eq!(nav.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
/// assert_eq!(nav.offset_to_position(4, Bias::Backward).unwrap(), Position::new(0, 4));
/// assert_eq!(nav.offset_to_position(3, Bias::Forward).unwrap(), Position::new(0, 3));
/// ```
#[derive(Debug)]
pub struct TwoLevelNavigator<'a, M: ?Sized> {
    metrics: &'a M,
}

impl<M: ?Sized> Clone for TwoLevelNavigator<'_, M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M: ?Sized> Copy for TwoLevelNavigator<'_, M> {}

impl<'a, M: SegmentMetrics + ?Sized> TwoLevelNavigator<'a, M> {
    /// Create a navigator reading segment lengths from `metrics`.
    pub fn new(metrics: &'a M) -> Self {
        Self { metrics }
    }

    /// Resolve a flat offset to a position.
    ///
    /// Fails if `offset > total_length()`. On a boundary between segments, `Forward` yields
    /// `(next, 0)` and `Backward` yields `(previous, segment_length(previous))`. The very end of
    /// the sequence resolves to the end of the last segment regardless of bias.
    pub fn offset_to_position(&self, offset: usize, bias: Bias) -> Result<Position> {
        let total = self.metrics.total_length();
        DocumentError::check_offset(offset, total)?;

        let major = self.metrics.segment_at(offset);
        let minor = offset - self.metrics.segment_start(major);

        let position = if bias == Bias::Backward && minor == 0 && major > 0 && offset < total {
            let mut previous = major - 1;
            while previous > 0 && self.metrics.segment_length(previous) == 0 {
                previous -= 1;
            }
            Position::new(previous, self.metrics.segment_length(previous))
        } else {
            Position::new(major, minor)
        };

        tracing::trace!(offset, ?bias, ?position, "offset_to_position");
        Ok(position)
    }

    /// Build a position, clamping `row` to the segment range and `col` to the segment length.
    pub fn position(&self, row: usize, col: usize) -> Position {
        let last = self.metrics.segment_count().saturating_sub(1);
        let major = row.min(last);
        let minor = col.min(self.metrics.segment_length(major));
        Position::new(major, minor)
    }

    /// Flat offset of `position` (clamped as in [`position`](Self::position)).
    pub fn position_to_offset(&self, position: Position) -> usize {
        let position = self.position(position.major, position.minor);
        self.metrics.segment_start(position.major) + position.minor
    }

    /// Move `position` by `delta` characters and resolve the result with `bias`.
    pub fn offset_by(&self, position: Position, delta: isize, bias: Bias) -> Result<Position> {
        let base = self.position_to_offset(position);
        match base.checked_add_signed(delta) {
            Some(target) => self.offset_to_position(target, bias),
            None => Err(DocumentError::OffsetOutOfRange {
                offset: base.wrapping_add_signed(delta),
                length: self.metrics.total_length(),
            }),
        }
    }

    /// Total length of all segments.
    pub fn total_length(&self) -> usize {
        self.metrics.total_length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_bias() {
        let segments = [4usize, 3];
        let nav = TwoLevelNavigator::new(&segments[..]);

        assert_eq!(nav.offset_to_position(0, Bias::Forward).unwrap(), Position::new(0, 0));
        assert_eq!(nav.offset_to_position(0, Bias::Backward).unwrap(), Position::new(0, 0));
        assert_eq!(nav.offset_to_position(3, Bias::Backward).unwrap(), Position::new(0, 3));
        assert_eq!(nav.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
        assert_eq!(nav.offset_to_position(4, Bias::Backward).unwrap(), Position::new(0, 4));
    }

    #[test]
    fn test_end_ignores_bias() {
        let segments = [4usize, 0];
        let nav = TwoLevelNavigator::new(&segments[..]);
        assert_eq!(nav.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
        assert_eq!(nav.offset_to_position(4, Bias::Backward).unwrap(), Position::new(1, 0));
    }

    #[test]
    fn test_out_of_range() {
        let segments = [4usize, 3];
        let nav = TwoLevelNavigator::new(&segments[..]);
        assert_eq!(
            nav.offset_to_position(8, Bias::Forward),
            Err(DocumentError::OffsetOutOfRange {
                offset: 8,
                length: 7
            })
        );
        assert!(nav.offset_by(Position::new(0, 1), -2, Bias::Forward).is_err());
    }

    #[test]
    fn test_position_clamps() {
        let segments = [4usize, 3];
        let nav = TwoLevelNavigator::new(&segments[..]);
        assert_eq!(nav.position(5, 10), Position::new(1, 3));
        assert_eq!(nav.position(0, 10), Position::new(0, 4));
        assert_eq!(nav.position(1, 2), Position::new(1, 2));
    }

    #[test]
    fn test_zero_length_segments_backward() {
        let segments = [2usize, 0, 3];
        let nav = TwoLevelNavigator::new(&segments[..]);
        assert_eq!(nav.offset_to_position(2, Bias::Forward).unwrap(), Position::new(2, 0));
        assert_eq!(nav.offset_to_position(2, Bias::Backward).unwrap(), Position::new(0, 2));
    }

    #[test]
    fn test_round_trip_every_offset() {
        let segments = [3usize, 1, 5, 2];
        let nav = TwoLevelNavigator::new(&segments[..]);
        for offset in 0..=nav.total_length() {
            for bias in [Bias::Forward, Bias::Backward] {
                let pos = nav.offset_to_position(offset, bias).unwrap();
                assert_eq!(nav.position_to_offset(pos), offset, "offset {offset} {bias:?}");
            }
        }
    }

    #[test]
    fn test_offset_by() {
        let segments = [4usize, 3];
        let nav = TwoLevelNavigator::new(&segments[..]);
        let start = Position::new(0, 1);
        assert_eq!(nav.offset_by(start, 3, Bias::Backward).unwrap(), Position::new(0, 4));
        assert_eq!(nav.offset_by(start, 3, Bias::Forward).unwrap(), Position::new(1, 0));
        assert_eq!(nav.offset_by(Position::new(1, 2), -6, Bias::Forward).unwrap(), Position::new(0, 0));
    }
}
