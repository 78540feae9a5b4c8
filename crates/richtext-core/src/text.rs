pub(crate) fn split_paragraphs(text: &str) -> std::str::Split<'_, char> {
    // `str::split('\n')` preserves trailing empty segments: N newlines => N+1 paragraphs.
    text.split('\n')
}

pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Byte index of the `char_idx`-th character, or `text.len()` when `char_idx` is the end.
pub(crate) fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Slice `text` by character offsets. Callers guarantee `from <= to <= char_len(text)`.
pub(crate) fn char_slice(text: &str, from: usize, to: usize) -> &str {
    let start = char_to_byte(text, from);
    let end = start + char_to_byte(&text[start..], to - from);
    &text[start..end]
}
