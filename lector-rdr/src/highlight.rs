//! Word/line highlight layout
//!
//! Pure computation over the selected element's text: given the
//! character offset and length of the word being spoken, produce the
//! byte ranges for the line window (a few words around the spoken word)
//! and the spoken word nested inside it. Rendering the ranges into
//! actual page nodes is the [`crate::page::PageAccess`] implementor's
//! job, which keeps this logic testable without a live document.

use std::ops::Range;

/// Byte ranges describing one highlight pair within an element's text.
///
/// Concatenating `prefix`, the line parts, and `suffix` always yields
/// the original text exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightLayout {
    /// Text before the line window
    pub prefix: Range<usize>,
    /// The line window, with the spoken word nested inside
    pub line: LineLayout,
    /// Text after the line window
    pub suffix: Range<usize>,
    /// Index of the spoken word within the space-separated word list
    pub word_index: usize,
}

/// The inside of the line window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineLayout {
    /// Line text before the spoken word
    pub prefix: Range<usize>,
    /// The spoken word
    pub word: Range<usize>,
    /// Line text after the spoken word
    pub suffix: Range<usize>,
}

/// Split on single spaces, keeping byte offsets.
///
/// Matches the speech engine's word accounting: consecutive spaces
/// produce empty words, which keeps offsets consistent.
pub fn word_spans(text: &str) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = 0usize;
    for (i, b) in text.bytes().enumerate() {
        if b == b' ' {
            spans.push(start..i);
            start = i + 1;
        }
    }
    spans.push(start..text.len());
    spans
}

/// Index of the word containing `char_index`.
///
/// The first word whose end offset exceeds `char_index` wins; an offset
/// pointing at a separating space resolves to the following word. An
/// offset at or past the end of the text clamps to the last word.
/// Returns `None` only for empty text.
pub fn word_index_at(text: &str, char_index: usize) -> Option<usize> {
    if text.is_empty() {
        return None;
    }
    let spans = word_spans(text);
    let found = spans.iter().position(|span| span.end > char_index);
    Some(found.unwrap_or(spans.len() - 1))
}

/// Length in bytes of the whitespace-delimited run starting at
/// `char_index`, as boundary callbacks only carry an offset.
pub fn word_length_at(text: &str, char_index: usize) -> usize {
    let start = floor_char_boundary(text, char_index);
    if start >= text.len() {
        return 0;
    }
    text[start..]
        .split(' ')
        .next()
        .map(str::len)
        .unwrap_or(0)
}

/// Compute the highlight layout for the word at `[char_index,
/// char_index + word_length)` with a window of `words_before` words
/// before and `words_after` words after it, clamped to the text.
///
/// Returns `None` for empty text.
pub fn layout(
    text: &str,
    char_index: usize,
    word_length: usize,
    words_before: usize,
    words_after: usize,
) -> Option<HighlightLayout> {
    if text.is_empty() {
        return None;
    }

    let spans = word_spans(text);
    let word_index = word_index_at(text, char_index)?;

    let first = word_index.saturating_sub(words_before);
    let last = (word_index + words_after + 1).min(spans.len());
    let line_start = spans[first].start;
    let line_end = spans[last - 1].end;

    // Clamp the spoken word into the line window and onto character
    // boundaries; an offset past the end snaps onto the last word.
    let (word_start, word_end) = if char_index >= text.len() {
        (spans[word_index].start, spans[word_index].end)
    } else {
        let start = floor_char_boundary(text, char_index.clamp(line_start, line_end));
        let end = floor_char_boundary(text, start.saturating_add(word_length).min(line_end));
        (start, end)
    };

    Some(HighlightLayout {
        prefix: 0..line_start,
        line: LineLayout {
            prefix: line_start..word_start,
            word: word_start..word_end,
            suffix: word_end..line_end,
        },
        suffix: line_end..text.len(),
        word_index,
    })
}

/// Largest char boundary not greater than `index`
fn floor_char_boundary(text: &str, index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    let mut i = index;
    while i > 0 && !text.is_char_boundary(i) {
        i -= 1;
    }
    i
}
