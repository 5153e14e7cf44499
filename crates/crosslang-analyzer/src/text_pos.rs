use std::ops::Range;

use tower_lsp::lsp_types::{Position, Range as LspRange};

/// Byte offset within `line` of a UTF-16 column, clamped to the line end.
pub fn byte_column_of_utf16(
    line: &str,
    character: u32,
) -> usize {
    let mut utf16_offset = 0u32;
    for (byte_idx, ch) in line.char_indices() {
        if utf16_offset >= character {
            return byte_idx;
        }
        utf16_offset += ch.len_utf16() as u32;
    }
    line.len()
}

pub fn utf16_column_of_byte_offset(
    line: &str,
    byte_offset: usize,
) -> u32 {
    line[..byte_offset.min(line.len())].encode_utf16().count() as u32
}

/// LSP range covering `bytes` on line `line` of `text`.
pub fn lsp_range_on_line(
    line: u32,
    text: &str,
    bytes: Range<usize>,
) -> LspRange {
    LspRange::new(
        Position::new(line, utf16_column_of_byte_offset(text, bytes.start)),
        Position::new(line, utf16_column_of_byte_offset(text, bytes.end)),
    )
}

pub fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

/// Byte range of the identifier touching a UTF-16 column, if any.
///
/// A cursor placed directly after the last character still counts, matching
/// how editors report the position of a just-typed word.
pub fn identifier_at(
    line: &str,
    character: u32,
) -> Option<Range<usize>> {
    let cursor = byte_column_of_utf16(line, character);
    let start = line[..cursor]
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_identifier_char(*ch))
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(cursor);
    let end = line[cursor..].find(|ch: char| !is_identifier_char(ch)).map(|idx| cursor + idx).unwrap_or(line.len());
    if start == end || line[start..].starts_with(|ch: char| ch.is_ascii_digit()) {
        return None;
    }
    Some(start..end)
}

/// Byte ranges of every whole-word occurrence of `word` in `line`.
pub fn word_occurrences<'a>(
    line: &'a str,
    word: &'a str,
) -> impl Iterator<Item = Range<usize>> + 'a {
    line.match_indices(word).filter_map(move |(start, _)| {
        let end = start + word.len();
        let before_ok = line[..start].chars().next_back().is_none_or(|ch| !is_identifier_char(ch));
        let after_ok = line[end..].chars().next().is_none_or(|ch| !is_identifier_char(ch));
        (before_ok && after_ok).then_some(start..end)
    })
}

#[cfg(test)]
#[path = "../tests/src/text_pos_tests.rs"]
mod tests;
