use tower_lsp::lsp_types::{self, DocumentSymbol, Location, Position, Range, Url};

use crate::bridge::{
    shapes,
    source::{SourceResult, SymbolSource},
};

/// One side of a Go / TypeScript pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Go,
    TypeScript,
}

impl Language {
    pub fn from_uri(uri: &Url) -> Option<Self> {
        let file_name = uri.path().rsplit('/').next()?;
        let (_, extension) = file_name.rsplit_once('.')?;
        Self::from_extension(extension)
    }

    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension {
            "go" => Some(Language::Go),
            "ts" | "tsx" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// The language this one is paired with.
    pub fn counterpart(self) -> Self {
        match self {
            Language::Go => Language::TypeScript,
            Language::TypeScript => Language::Go,
        }
    }

    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Language::Go => &["go"],
            Language::TypeScript => &["ts", "tsx"],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Language::Go => "go",
            Language::TypeScript => "typescript",
        }
    }
}

/// Symbol kinds the engine distinguishes.
///
/// TypeScript providers usually report `type X = ...` aliases as variables,
/// so `Variable` and `TypeAlias` are both treated as alias-shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Struct,
    Interface,
    Class,
    Field,
    Property,
    Method,
    Constant,
    Variable,
    TypeAlias,
    Other,
}

impl SymbolKind {
    pub fn from_lsp(kind: lsp_types::SymbolKind) -> Self {
        match kind {
            lsp_types::SymbolKind::FUNCTION => SymbolKind::Function,
            lsp_types::SymbolKind::STRUCT => SymbolKind::Struct,
            lsp_types::SymbolKind::INTERFACE => SymbolKind::Interface,
            lsp_types::SymbolKind::CLASS => SymbolKind::Class,
            lsp_types::SymbolKind::FIELD => SymbolKind::Field,
            lsp_types::SymbolKind::PROPERTY => SymbolKind::Property,
            lsp_types::SymbolKind::METHOD => SymbolKind::Method,
            lsp_types::SymbolKind::CONSTANT => SymbolKind::Constant,
            lsp_types::SymbolKind::VARIABLE => SymbolKind::Variable,
            lsp_types::SymbolKind::TYPE_PARAMETER => SymbolKind::TypeAlias,
            _ => SymbolKind::Other,
        }
    }

    pub fn to_lsp(self) -> lsp_types::SymbolKind {
        match self {
            SymbolKind::Function => lsp_types::SymbolKind::FUNCTION,
            SymbolKind::Struct => lsp_types::SymbolKind::STRUCT,
            SymbolKind::Interface => lsp_types::SymbolKind::INTERFACE,
            SymbolKind::Class => lsp_types::SymbolKind::CLASS,
            SymbolKind::Field => lsp_types::SymbolKind::FIELD,
            SymbolKind::Property => lsp_types::SymbolKind::PROPERTY,
            SymbolKind::Method => lsp_types::SymbolKind::METHOD,
            SymbolKind::Constant => lsp_types::SymbolKind::CONSTANT,
            SymbolKind::Variable => lsp_types::SymbolKind::VARIABLE,
            SymbolKind::TypeAlias => lsp_types::SymbolKind::TYPE_PARAMETER,
            SymbolKind::Other => lsp_types::SymbolKind::OBJECT,
        }
    }

    pub fn is_member(self) -> bool {
        matches!(self, SymbolKind::Field | SymbolKind::Property | SymbolKind::Method)
    }
}

/// A declaration from one document snapshot, with its nested members.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub language: Language,
    pub uri: Url,
    /// Range of the declared name.
    pub selection_range: Range,
    /// Range of the whole declaration.
    pub range: Range,
    pub exported: bool,
    pub children: Vec<Symbol>,
}

impl Symbol {
    pub fn location(&self) -> Location {
        Location::new(self.uri.clone(), self.selection_range)
    }

    pub fn declaration_line(&self) -> u32 {
        self.selection_range.start.line
    }

    pub fn name_contains(
        &self,
        position: Position,
    ) -> bool {
        range_contains(self.selection_range, position)
    }

    pub fn declaration_contains(
        &self,
        position: Position,
    ) -> bool {
        range_contains(self.range, position)
    }

    /// Go struct methods live outside the struct body, so a struct never has
    /// methods even if a provider nests something method-like under it.
    pub fn has_methods(&self) -> bool {
        self.kind != SymbolKind::Struct && self.children.iter().any(|child| child.kind == SymbolKind::Method)
    }
}

pub fn range_contains(
    range: Range,
    position: Position,
) -> bool {
    let at = (position.line, position.character);
    (range.start.line, range.start.character) <= at && at <= (range.end.line, range.end.character)
}

/// Resolved declaration produced once per request by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    pub language: Language,
    pub location: Location,
    pub exported: bool,
}

impl SymbolInfo {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            language: symbol.language,
            location: symbol.location(),
            exported: symbol.exported,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    pub name: String,
    /// Name from a Go `json:"..."` tag; never set for TypeScript.
    pub json_tag: Option<String>,
    pub parent: Symbol,
    pub field: Symbol,
    pub uri: Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceInfo {
    pub name: String,
    pub symbol: Symbol,
    pub uri: Url,
    pub is_exported: bool,
    pub has_methods: bool,
}

impl InterfaceInfo {
    pub fn from_symbol(symbol: &Symbol) -> Self {
        Self {
            name: symbol.name.clone(),
            symbol: symbol.clone(),
            uri: symbol.uri.clone(),
            is_exported: symbol.exported,
            has_methods: symbol.has_methods(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumConstInfo {
    pub name: String,
    pub symbol: Symbol,
    pub uri: Url,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumTypeInfo {
    pub name: String,
    pub symbol: Symbol,
    pub uri: Url,
}

/// A scored match candidate; lives for one matcher invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub symbol: Symbol,
    pub uri: Url,
    pub score: u32,
}

impl Candidate {
    pub fn new(
        symbol: Symbol,
        score: u32,
    ) -> Self {
        let uri = symbol.uri.clone();
        Self {
            symbol,
            uri,
            score,
        }
    }

    pub fn location(&self) -> Location {
        self.symbol.location()
    }
}

/// Fetch and convert the symbol tree of `uri`.
///
/// Export state is computed here: from the name for Go, from the
/// declaration line for TypeScript. TypeScript members inherit the export
/// state of their container.
pub async fn load_symbols<S: SymbolSource + ?Sized>(
    source: &S,
    uri: &Url,
) -> SourceResult<Vec<Symbol>> {
    let Some(language) = Language::from_uri(uri) else {
        return Ok(Vec::new());
    };
    let document_symbols = source.document_symbols(uri).await?;

    let mut symbols = Vec::with_capacity(document_symbols.len());
    for document_symbol in &document_symbols {
        let exported = match language {
            Language::Go => shapes::is_go_exported(&document_symbol.name),
            Language::TypeScript => {
                let line = source.line_text(uri, document_symbol.selection_range.start.line).await?;
                line.as_deref().is_some_and(shapes::is_ts_export_line)
            },
        };
        symbols.push(convert_symbol(document_symbol, language, uri, exported));
    }
    Ok(symbols)
}

fn convert_symbol(
    document_symbol: &DocumentSymbol,
    language: Language,
    uri: &Url,
    exported: bool,
) -> Symbol {
    let children = document_symbol
        .children
        .iter()
        .flatten()
        .map(|child| {
            let child_exported = match language {
                Language::Go => shapes::is_go_exported(&child.name),
                Language::TypeScript => exported,
            };
            convert_symbol(child, language, uri, child_exported)
        })
        .collect();

    Symbol {
        name: document_symbol.name.clone(),
        kind: SymbolKind::from_lsp(document_symbol.kind),
        language,
        uri: uri.clone(),
        selection_range: document_symbol.selection_range,
        range: document_symbol.range,
        exported,
        children,
    }
}

#[cfg(test)]
#[path = "../../tests/src/bridge/model_tests.rs"]
mod tests;
