use tower_lsp::lsp_types::{Position, TextDocumentContentChangeEvent, Url};

use crate::text_pos::byte_column_of_utf16;

/// Editor-side snapshot of an open Go or TypeScript file.
#[derive(Debug, Clone)]
pub struct Document {
    pub uri: Url,
    pub text: String,
    pub version: i32,
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
}

impl Document {
    pub fn new(
        uri: Url,
        text: String,
        version: i32,
    ) -> Self {
        let line_starts = line_starts_of(&text);
        Self {
            uri,
            text,
            version,
            line_starts,
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text of a 0-based line without `\n` or `\r\n`.
    pub fn line_text(
        &self,
        line: usize,
    ) -> Option<&str> {
        let start = *self.line_starts.get(line)?;
        let end = self.line_starts.get(line + 1).copied().unwrap_or(self.text.len());
        Some(self.text[start..end].trim_end_matches('\n').trim_end_matches('\r'))
    }

    /// Byte offset of an LSP position; `None` when the line does not exist.
    pub fn offset_of(
        &self,
        position: Position,
    ) -> Option<usize> {
        let start = *self.line_starts.get(position.line as usize)?;
        let line = self.line_text(position.line as usize)?;
        Some(start + byte_column_of_utf16(line, position.character))
    }

    /// Apply ranged or whole-document edits in order.
    pub fn apply_changes(
        &mut self,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        for change in changes {
            match change.range {
                Some(range) => {
                    if let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end))
                        && start <= end
                    {
                        self.text.replace_range(start..end, &change.text);
                    }
                },
                None => self.text = change.text,
            }
            self.line_starts = line_starts_of(&self.text);
        }
        self.version = version;
    }
}

fn line_starts_of(text: &str) -> Vec<usize> {
    std::iter::once(0).chain(text.match_indices('\n').map(|(idx, _)| idx + 1)).collect()
}

#[cfg(test)]
#[path = "../../tests/src/document/text_document_tests.rs"]
mod tests;
