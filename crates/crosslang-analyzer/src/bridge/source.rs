//! The capability the engine consumes: symbol trees, navigation results and
//! raw line text, supplied by whatever analyzers the host has for each
//! language.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tower_lsp::lsp_types::{DocumentSymbol, Location, Position, Url};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error for path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("document not available: {0}")]
    NotFound(Url),

    #[error("not a file URI: {0}")]
    InvalidUri(Url),

    #[error("symbol backend failed: {0}")]
    Backend(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Language analyzers as seen by the engine.
///
/// Every method may fail; the engine logs failures and treats them as "no
/// results from this file", so implementations should not retry internally.
#[tower_lsp::async_trait]
pub trait SymbolSource: Send + Sync {
    /// Hierarchical symbols of a document, members nested under containers.
    async fn document_symbols(
        &self,
        uri: &Url,
    ) -> SourceResult<Vec<DocumentSymbol>>;

    async fn definitions(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>>;

    async fn references(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>>;

    async fn implementations(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>>;

    /// Files directly inside `dir` whose extension is one of `extensions`.
    async fn list_sibling_files(
        &self,
        dir: &Path,
        extensions: &[&str],
    ) -> SourceResult<Vec<Url>>;

    /// Text of a 0-based line without its terminator, `None` past the end.
    async fn line_text(
        &self,
        uri: &Url,
        line: u32,
    ) -> SourceResult<Option<String>>;

    /// Ask the backing analyzer to load a document before it is queried.
    async fn open_document(
        &self,
        _uri: &Url,
    ) -> SourceResult<()> {
        Ok(())
    }

    /// Whether symbols for `uri` are already final. Sources that cannot tell
    /// return `false` and the engine polls until the symbol tree is stable.
    async fn is_ready(
        &self,
        _uri: &Url,
    ) -> bool {
        true
    }
}
