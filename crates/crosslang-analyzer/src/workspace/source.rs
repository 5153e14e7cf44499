use std::{
    collections::{HashMap, HashSet},
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{DocumentSymbol, Location, Position, Range, SymbolKind, Url};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{WorkspaceScope, has_extension, outline::outline};
use crate::{
    bridge::{Language, SourceError, SourceResult, SymbolSource, model::range_contains},
    document::DocumentStore,
    text_pos::{identifier_at, lsp_range_on_line, word_occurrences},
};

static TS_IMPLEMENTS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bclass\s+(?P<name>[A-Za-z_$][\w$]*)[^{]*?\bimplements\s+(?P<list>[^{]+)").expect("implements pattern")
});

/// Symbol source backed by the editor's open documents and the workspace on disk.
#[derive(Debug)]
pub struct WorkspaceSource {
    documents: Arc<DocumentStore>,
    scope: RwLock<WorkspaceScope>,
}

impl WorkspaceSource {
    pub fn new(documents: Arc<DocumentStore>) -> Self {
        Self {
            documents,
            scope: RwLock::new(WorkspaceScope::default()),
        }
    }

    pub fn set_scope(
        &self,
        scope: WorkspaceScope,
    ) {
        if let Ok(mut guard) = self.scope.write() {
            *guard = scope;
        }
    }

    pub fn scope_snapshot(&self) -> WorkspaceScope {
        self.scope.read().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// Current text of `uri`: the open buffer if there is one, else the file.
    pub async fn text(
        &self,
        uri: &Url,
    ) -> SourceResult<String> {
        if let Some(text) = self.documents.get_content(uri) {
            return Ok(text);
        }
        let path = file_path(uri)?;
        let read = tokio::fs::read_to_string(&path).await;
        read.map_err(|source| match source.kind() {
            ErrorKind::NotFound => SourceError::NotFound(uri.clone()),
            _ => SourceError::Io {
                path,
                source,
            },
        })
    }

    async fn word_at(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Option<(String, bool)>> {
        let text = self.text(uri).await?;
        let Some(line) = text.lines().nth(position.line as usize) else {
            return Ok(None);
        };
        Ok(identifier_at(line, position.character).map(|range| {
            let member_access = line[..range.start].trim_end().ends_with('.');
            (line[range].to_string(), member_access)
        }))
    }

    async fn outline_of(
        &self,
        uri: &Url,
    ) -> SourceResult<Vec<DocumentSymbol>> {
        let Some(language) = Language::from_uri(uri) else {
            return Ok(Vec::new());
        };
        Ok(outline(language, &self.text(uri).await?))
    }

    /// Same-directory, same-language files; `uri` first.
    async fn package_files(
        &self,
        uri: &Url,
        language: Language,
    ) -> Vec<Url> {
        let mut files = vec![uri.clone()];
        let Some(dir) = uri.to_file_path().ok().and_then(|path| path.parent().map(Path::to_path_buf)) else {
            return files;
        };
        match self.list_sibling_files(&dir, language.extensions()).await {
            Ok(siblings) => files.extend(siblings.into_iter().filter(|sibling| sibling != uri)),
            Err(error) => debug!("[workspace] listing {} failed: {error}", dir.display()),
        }
        files
    }

    async fn blocking<T, F>(
        &self,
        work: F,
    ) -> SourceResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&WorkspaceScope, &DocumentStore) -> T + Send + 'static,
    {
        let documents = Arc::clone(&self.documents);
        let scope = self.scope_snapshot();
        tokio::task::spawn_blocking(move || work(&scope, &documents))
            .await
            .map_err(|error| SourceError::Backend(format!("workspace scan task failed: {error}")))
    }
}

#[tower_lsp::async_trait]
impl SymbolSource for WorkspaceSource {
    async fn document_symbols(
        &self,
        uri: &Url,
    ) -> SourceResult<Vec<DocumentSymbol>> {
        self.outline_of(uri).await
    }

    /// Declarations named like the identifier at `position`, searched in the
    /// same file first and then in the rest of its package directory. A
    /// position on a declared name resolves to that declaration alone.
    async fn definitions(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>> {
        let Some(language) = Language::from_uri(uri) else {
            return Ok(Vec::new());
        };
        let Some((word, member_access)) = self.word_at(uri, position).await? else {
            return Ok(Vec::new());
        };
        if let Some(declared) = declared_name_at(&self.outline_of(uri).await?, position) {
            return Ok(vec![Location::new(uri.clone(), declared)]);
        }

        let mut top_level = Vec::new();
        let mut members = Vec::new();
        for file in self.package_files(uri, language).await {
            let symbols = match self.outline_of(&file).await {
                Ok(symbols) => symbols,
                Err(error) => {
                    debug!("[workspace] skipping {file}: {error}");
                    continue;
                },
            };
            for symbol in &symbols {
                if symbol.name == word {
                    top_level.push(Location::new(file.clone(), symbol.selection_range));
                }
                for child in symbol.children.iter().flatten().filter(|child| child.name == word) {
                    members.push(Location::new(file.clone(), child.selection_range));
                }
            }
        }

        if (member_access && !members.is_empty()) || top_level.is_empty() {
            return Ok(members);
        }
        Ok(top_level)
    }

    /// Whole-word occurrences in every workspace file of the same language.
    async fn references(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>> {
        let Some(language) = Language::from_uri(uri) else {
            return Ok(Vec::new());
        };
        let Some((word, _)) = self.word_at(uri, position).await? else {
            return Ok(Vec::new());
        };
        let fallback_root = file_path(uri)?.parent().map(Path::to_path_buf);

        let locations = self
            .blocking(move |scope, documents| {
                let mut locations = Vec::new();
                for path in scope.files_with_extensions(language.extensions(), fallback_root.as_deref()) {
                    let Some((file, text)) = read_file(documents, &path) else {
                        continue;
                    };
                    for (line_idx, line) in text.lines().enumerate() {
                        for range in word_occurrences(line, &word) {
                            locations.push(Location::new(file.clone(), lsp_range_on_line(line_idx as u32, line, range)));
                        }
                    }
                }
                locations
            })
            .await?;
        debug!("[workspace] {} reference(s) in {}", locations.len(), language.label());
        Ok(locations)
    }

    /// Types implementing the interface named at `position`.
    ///
    /// Go structs qualify when their receiver methods cover every interface
    /// method; TypeScript classes when they list the interface in `implements`.
    async fn implementations(
        &self,
        uri: &Url,
        position: Position,
    ) -> SourceResult<Vec<Location>> {
        let Some(language) = Language::from_uri(uri) else {
            return Ok(Vec::new());
        };
        let Some((word, _)) = self.word_at(uri, position).await? else {
            return Ok(Vec::new());
        };
        let symbols = self.outline_of(uri).await?;
        let Some(interface) = symbols.iter().find(|symbol| symbol.kind == SymbolKind::INTERFACE && symbol.name == word)
        else {
            return Ok(Vec::new());
        };
        let required: HashSet<String> = interface
            .children
            .iter()
            .flatten()
            .filter(|child| child.kind == SymbolKind::METHOD)
            .map(|child| child.name.clone())
            .collect();
        let fallback_root = file_path(uri)?.parent().map(Path::to_path_buf);

        self.blocking(move |scope, documents| {
            let files = scope.files_with_extensions(language.extensions(), fallback_root.as_deref());
            match language {
                Language::Go => go_implementations(documents, &files, &required),
                Language::TypeScript => ts_implementations(documents, &files, &word),
            }
        })
        .await
    }

    async fn list_sibling_files(
        &self,
        dir: &Path,
        extensions: &[&str],
    ) -> SourceResult<Vec<Url>> {
        tokio::fs::metadata(dir).await.map_err(|source| SourceError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).into_iter().filter_map(|entry| entry.ok()) {
            if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
                continue;
            }
            match Url::from_file_path(entry.path()) {
                Ok(url) => files.push(url),
                Err(()) => warn!("[workspace] cannot express {} as a URI", entry.path().display()),
            }
        }
        files.sort();
        Ok(files)
    }

    async fn line_text(
        &self,
        uri: &Url,
        line: u32,
    ) -> SourceResult<Option<String>> {
        if let Some(text) = self.documents.line_text(uri, line) {
            return Ok(text);
        }
        Ok(self.text(uri).await?.lines().nth(line as usize).map(str::to_owned))
    }
}

fn file_path(uri: &Url) -> SourceResult<PathBuf> {
    uri.to_file_path().map_err(|()| SourceError::InvalidUri(uri.clone()))
}

/// Open buffer or disk contents of `path`, with its URI.
/// Selection range of the declaration or member whose name covers `position`.
fn declared_name_at(
    symbols: &[DocumentSymbol],
    position: Position,
) -> Option<Range> {
    symbols.iter().find_map(|symbol| {
        if range_contains(symbol.selection_range, position) {
            return Some(symbol.selection_range);
        }
        declared_name_at(symbol.children.as_deref().unwrap_or(&[]), position)
    })
}

fn read_file(
    documents: &DocumentStore,
    path: &Path,
) -> Option<(Url, String)> {
    let uri = Url::from_file_path(path).ok()?;
    if let Some(text) = documents.get_content(&uri) {
        return Some((uri, text));
    }
    match std::fs::read_to_string(path) {
        Ok(text) => Some((uri, text)),
        Err(error) => {
            debug!("[workspace] cannot read {}: {error}", path.display());
            None
        },
    }
}

fn go_implementations(
    documents: &DocumentStore,
    files: &[PathBuf],
    required: &HashSet<String>,
) -> Vec<Location> {
    if required.is_empty() {
        return Vec::new();
    }

    let mut types: Vec<(String, Location)> = Vec::new();
    let mut receivers: HashMap<String, HashSet<String>> = HashMap::new();
    for path in files {
        let Some((uri, text)) = read_file(documents, path) else {
            continue;
        };
        for symbol in outline(Language::Go, &text) {
            match symbol.kind {
                SymbolKind::METHOD => {
                    if let Some(receiver) = symbol.detail {
                        receivers.entry(receiver).or_default().insert(symbol.name);
                    }
                },
                SymbolKind::STRUCT | SymbolKind::TYPE_PARAMETER => {
                    types.push((symbol.name, Location::new(uri.clone(), symbol.selection_range)));
                },
                _ => {},
            }
        }
    }

    types
        .into_iter()
        .filter(|(name, _)| receivers.get(name).is_some_and(|methods| required.is_subset(methods)))
        .map(|(_, location)| location)
        .collect()
}

fn ts_implementations(
    documents: &DocumentStore,
    files: &[PathBuf],
    interface: &str,
) -> Vec<Location> {
    let mut locations = Vec::new();
    for path in files {
        let Some((uri, text)) = read_file(documents, path) else {
            continue;
        };
        for (line_idx, line) in text.lines().enumerate() {
            let Some(caps) = TS_IMPLEMENTS.captures(line) else {
                continue;
            };
            let implemented = caps["list"].split(',').any(|entry| {
                let entry = entry.trim();
                entry.split('<').next().unwrap_or(entry).trim() == interface
            });
            if let (true, Some(name)) = (implemented, caps.name("name")) {
                locations.push(Location::new(uri.clone(), lsp_range_on_line(line_idx as u32, line, name.range())));
            }
        }
    }
    locations
}

#[cfg(test)]
#[path = "../../tests/src/workspace/source_tests.rs"]
mod tests;
