#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use crosslang_analyzer::{
    CrossLanguageResolver, DocumentStore, SourceError, SourceResult, SymbolSource, WorkspaceSource,
    bridge::{
        Candidate, Classification, ReadinessPolicy, classify,
        matchers::{MatchContext, match_declarations},
    },
};
use tempfile::TempDir;
use tower_lsp::lsp_types::{DocumentSymbol, Location, Position, Url};

/// A throwaway workspace on disk with the built-in source on top of it.
pub struct Fixture {
    dir: TempDir,
    pub documents: Arc<DocumentStore>,
    pub source: Arc<WorkspaceSource>,
    pub resolver: CrossLanguageResolver<WorkspaceSource>,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp workspace");
        let documents = Arc::new(DocumentStore::new());
        let source = Arc::new(WorkspaceSource::new(Arc::clone(&documents)));
        let resolver = CrossLanguageResolver::new(Arc::clone(&source));
        Self {
            dir,
            documents,
            source,
            resolver,
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().canonicalize().expect("canonical temp root")
    }

    pub fn write(
        &self,
        relative_path: &str,
        text: &str,
    ) -> Url {
        let path = self.root().join(relative_path);
        fs::create_dir_all(path.parent().expect("fixture file has a parent")).expect("create fixture dirs");
        fs::write(&path, text).expect("write fixture");
        Url::from_file_path(path).expect("fixture path is valid file:// URI")
    }

    /// Classify and match without expanding, keeping the scores.
    pub async fn candidates(
        &self,
        uri: &Url,
        position: Position,
        strict_export: bool,
    ) -> Vec<Candidate> {
        let Some(classification) = classify(&*self.source, uri, position).await else {
            return Vec::new();
        };
        let ctx = MatchContext {
            source: &*self.source,
            strict_export,
            readiness: ReadinessPolicy::default(),
            is_cancelled: &never_cancelled,
        };
        match_declarations(&ctx, &classification).await
    }

    pub async fn classification(
        &self,
        uri: &Url,
        position: Position,
    ) -> Option<Classification> {
        classify(&*self.source, uri, position).await
    }
}

pub fn never_cancelled() -> bool {
    false
}

pub fn position_of(
    source: &str,
    needle: &str,
) -> Position {
    position_of_nth(source, needle, 0)
}

pub fn position_of_nth(
    source: &str,
    needle: &str,
    nth: usize,
) -> Position {
    assert!(!needle.is_empty(), "needle must not be empty");
    let mut from = 0usize;
    let mut current = 0usize;

    loop {
        let Some(idx) = source[from..].find(needle) else {
            panic!("needle not found: {needle}");
        };
        let absolute = from + idx;
        if current == nth {
            let before = &source[..absolute];
            let line = before.as_bytes().iter().filter(|&&b| b == b'\n').count() as u32;
            let col = before
                .rsplit_once('\n')
                .map(|(_, tail)| tail.chars().count() as u32)
                .unwrap_or_else(|| before.chars().count() as u32);
            return Position::new(line, col);
        }
        current += 1;
        from = absolute + needle.len();
    }
}

/// `(file name, line)` of each location, in order.
pub fn file_lines(locations: &[Location]) -> Vec<(String, u32)> {
    locations.iter().map(|location| (file_name(&location.uri), location.range.start.line)).collect()
}

pub fn file_name(uri: &Url) -> String {
    uri.path().rsplit('/').next().unwrap_or_default().to_string()
}

/// A source whose analyzers are all down.
pub struct FailingSource;

fn backend_down<T>() -> SourceResult<T> {
    Err(SourceError::Backend("analyzer unavailable".to_string()))
}

#[tower_lsp::async_trait]
impl SymbolSource for FailingSource {
    async fn document_symbols(
        &self,
        _uri: &Url,
    ) -> SourceResult<Vec<DocumentSymbol>> {
        backend_down()
    }

    async fn definitions(
        &self,
        _uri: &Url,
        _position: Position,
    ) -> SourceResult<Vec<Location>> {
        backend_down()
    }

    async fn references(
        &self,
        _uri: &Url,
        _position: Position,
    ) -> SourceResult<Vec<Location>> {
        backend_down()
    }

    async fn implementations(
        &self,
        _uri: &Url,
        _position: Position,
    ) -> SourceResult<Vec<Location>> {
        backend_down()
    }

    async fn list_sibling_files(
        &self,
        _dir: &Path,
        _extensions: &[&str],
    ) -> SourceResult<Vec<Url>> {
        backend_down()
    }

    async fn line_text(
        &self,
        _uri: &Url,
        _line: u32,
    ) -> SourceResult<Option<String>> {
        backend_down()
    }
}

/// The workspace source with one file whose symbols cannot be loaded and
/// reference lookups that always fail.
pub struct PartiallyBrokenSource {
    pub inner: WorkspaceSource,
    pub broken: Url,
}

#[tower_lsp::async_trait]
impl SymbolSource for PartiallyBrokenSource {
    async fn document_symbols(
        &self,
        uri: &Url,
    ) -> SourceResult<Vec<DocumentSymbol>> {
        if *uri == self.broken {
            return backend_down();
        }
        self.inner.document_symbols(uri).await
    }

    async fn definitions(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>> {
        self.inner.definitions(uri, position).await
    }

    async fn references(
        &self,
        _uri: &Url,
        _position: Position,
    ) -> SourceResult<Vec<Location>> {
        backend_down()
    }

    async fn implementations(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>> {
        self.inner.implementations(uri, position).await
    }

    async fn list_sibling_files(
        &self,
        dir: &Path,
        extensions: &[&str],
    ) -> SourceResult<Vec<Url>> {
        self.inner.list_sibling_files(dir, extensions).await
    }

    async fn line_text(
        &self,
        uri: &Url,
        line: u32,
    ) -> SourceResult<Option<String>> {
        self.inner.line_text(uri, line).await
    }
}
