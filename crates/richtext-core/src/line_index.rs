//! Logical line index
//!
//! Mirrors the document text in a [`Rope`] so that offset <-> paragraph lookups run in
//! O(log N) instead of walking every paragraph. Ropey is built without its unicode
//! line-break set, so `'\n'` is the only paragraph separator.

use ropey::{Rope, RopeBuilder, RopeSlice};

use crate::navigator::SegmentMetrics;

/// Rope-backed paragraph index. Paragraph `i` is rope line `i`.
#[derive(Debug, Clone)]
pub struct LineIndex {
    rope: Rope,
}

impl LineIndex {
    /// Create an index for an empty document (one empty line).
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Build an index from the full document text.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
        }
    }

    /// Build an index from paragraph texts, joined by `'\n'`.
    pub fn from_lines<'a, I>(lines: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = RopeBuilder::new();
        for (i, line) in lines.into_iter().enumerate() {
            if i > 0 {
                builder.append("\n");
            }
            builder.append(line);
        }
        Self {
            rope: builder.finish(),
        }
    }

    /// Total line count (always at least 1).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total character count, newlines included.
    pub fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    /// Character offset of the start of `line`. Lines past the end map to the document end.
    pub fn line_to_char(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    /// Line containing `char_offset`. Offsets past the end map to the last line.
    pub fn char_to_line(&self, char_offset: usize) -> usize {
        let char_offset = char_offset.min(self.rope.len_chars());
        self.rope.char_to_line(char_offset)
    }

    /// Length of `line` in characters, excluding its newline.
    pub fn line_len(&self, line: usize) -> usize {
        match self.rope.get_line(line) {
            Some(slice) => {
                let len = slice.len_chars();
                if line + 1 < self.rope.len_lines() {
                    len - 1
                } else {
                    len
                }
            }
            None => 0,
        }
    }

    /// Character at `char_offset`, if in range.
    pub fn char_at(&self, char_offset: usize) -> Option<char> {
        self.rope.get_char(char_offset)
    }

    /// Replace `start..end` (character offsets) with `text`.
    pub fn replace(&mut self, start: usize, end: usize, text: &str) {
        let len = self.rope.len_chars();
        let start = start.min(len);
        let end = end.clamp(start, len);
        if start < end {
            self.rope.remove(start..end);
        }
        if !text.is_empty() {
            self.rope.insert(start, text);
        }
    }

    /// Append another index, as when two documents are concatenated.
    pub fn append(&mut self, other: &LineIndex) {
        self.rope.append(other.rope.clone());
    }

    /// Index of the sub-range `start..end`.
    pub fn slice(&self, start: usize, end: usize) -> LineIndex {
        Self {
            rope: self.text_slice(start, end).into(),
        }
    }

    /// Text of `start..end` as a rope slice.
    pub fn text_slice(&self, start: usize, end: usize) -> RopeSlice<'_> {
        let len = self.rope.len_chars();
        let end = end.min(len);
        self.rope.slice(start.min(end)..end)
    }

    /// Get complete text
    pub fn get_text(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentMetrics for LineIndex {
    fn segment_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn segment_length(&self, index: usize) -> usize {
        self.rope
            .get_line(index)
            .map(|line| line.len_chars())
            .unwrap_or(0)
    }

    fn total_length(&self) -> usize {
        self.rope.len_chars()
    }

    fn segment_start(&self, index: usize) -> usize {
        self.line_to_char(index)
    }

    fn segment_at(&self, offset: usize) -> usize {
        self.char_to_line(offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::{Bias, Position, TwoLevelNavigator};

    #[test]
    fn test_new_line_index() {
        let index = LineIndex::new();
        assert_eq!(index.line_count(), 1); // Rope empty document has 1 line
        assert_eq!(index.char_count(), 0);
        assert_eq!(index.segment_length(0), 0);
    }

    #[test]
    fn test_from_lines_matches_from_text() {
        let index = LineIndex::from_lines(["abc", "", "def"]);
        assert_eq!(index.get_text(), "abc\n\ndef");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_len(0), 3);
        assert_eq!(index.line_len(1), 0);
        assert_eq!(index.line_len(2), 3);
        assert_eq!(index.segment_length(0), 4);
        assert_eq!(index.segment_length(2), 3);
    }

    #[test]
    fn test_carriage_return_is_not_a_separator() {
        let index = LineIndex::from_text("a\rb\nc");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.line_len(0), 3);
    }

    #[test]
    fn test_trailing_newline_gives_empty_last_line() {
        let index = LineIndex::from_text("abc\n");
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.char_to_line(4), 1);
        assert_eq!(index.segment_length(1), 0);
    }

    #[test]
    fn test_char_to_line_and_back() {
        let index = LineIndex::from_text("ABC\nDEF\nGHI");
        assert_eq!(index.char_to_line(0), 0);
        assert_eq!(index.char_to_line(3), 0); // the newline belongs to line 0
        assert_eq!(index.char_to_line(4), 1);
        assert_eq!(index.char_to_line(11), 2);
        assert_eq!(index.line_to_char(2), 8);
        assert_eq!(index.line_to_char(9), 11);
    }

    #[test]
    fn test_utf8_cjk() {
        let index = LineIndex::from_text("你好\n世界");
        assert_eq!(index.char_count(), 5);
        assert_eq!(index.char_to_line(3), 1);
        assert_eq!(index.char_at(3), Some('世'));
    }

    #[test]
    fn test_replace_and_slice() {
        let mut index = LineIndex::from_text("Hello World");
        index.replace(6, 6, "Beautiful\n");
        assert_eq!(index.get_text(), "Hello Beautiful\nWorld");
        assert_eq!(index.line_count(), 2);

        index.replace(15, 16, " ");
        assert_eq!(index.get_text(), "Hello Beautiful World");
        assert_eq!(index.slice(6, 15).get_text(), "Beautiful");
    }

    #[test]
    fn test_append() {
        let mut left = LineIndex::from_text("ab\nc");
        left.append(&LineIndex::from_text("d\ne"));
        assert_eq!(left.get_text(), "ab\ncd\ne");
        assert_eq!(left.line_count(), 3);
    }

    #[test]
    fn test_navigator_over_index() {
        let index = LineIndex::from_text("abc\ndef");
        let nav = TwoLevelNavigator::new(&index);
        assert_eq!(nav.offset_to_position(4, Bias::Forward).unwrap(), Position::new(1, 0));
        assert_eq!(nav.offset_to_position(4, Bias::Backward).unwrap(), Position::new(0, 4));
        assert_eq!(nav.offset_to_position(7, Bias::Backward).unwrap(), Position::new(1, 3));
    }

    #[test]
    fn test_large_document() {
        let lines: Vec<String> = (0..10000).map(|i| format!("Line {}", i)).collect();
        let index = LineIndex::from_lines(lines.iter().map(String::as_str));
        assert_eq!(index.line_count(), 10000);
        assert_eq!(index.line_len(5000), "Line 5000".len());
    }
}
