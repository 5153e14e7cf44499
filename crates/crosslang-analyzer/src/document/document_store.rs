use dashmap::DashMap;
use tower_lsp::lsp_types::{TextDocumentContentChangeEvent, Url};

use super::Document;

/// Open documents keyed by URI. Unsaved editor text always takes priority
/// over the copy on disk when the engine reads a file.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: DashMap<Url, Document>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(
        &self,
        uri: Url,
        text: String,
        version: i32,
    ) {
        self.documents.insert(uri.clone(), Document::new(uri, text, version));
    }

    pub fn apply_changes(
        &self,
        uri: &Url,
        changes: Vec<TextDocumentContentChangeEvent>,
        version: i32,
    ) {
        if let Some(mut document) = self.documents.get_mut(uri) {
            document.apply_changes(changes, version);
        }
    }

    pub fn close(
        &self,
        uri: &Url,
    ) {
        self.documents.remove(uri);
    }

    pub fn is_open(
        &self,
        uri: &Url,
    ) -> bool {
        self.documents.contains_key(uri)
    }

    pub fn get_content(
        &self,
        uri: &Url,
    ) -> Option<String> {
        self.documents.get(uri).map(|document| document.text.clone())
    }

    pub fn get(
        &self,
        uri: &Url,
    ) -> Option<Document> {
        self.documents.get(uri).map(|document| document.clone())
    }

    /// `Some(None)` when the document is open but shorter than `line`.
    pub fn line_text(
        &self,
        uri: &Url,
        line: u32,
    ) -> Option<Option<String>> {
        self.documents.get(uri).map(|document| document.line_text(line as usize).map(str::to_owned))
    }
}

#[cfg(test)]
#[path = "../../tests/src/document/document_store_tests.rs"]
mod tests;
