use std::sync::Arc;

use super::*;
use crate::{document::DocumentStore, workspace::WorkspaceSource};

fn open(
    store: &DocumentStore,
    path: &str,
    text: &str,
) -> Url {
    let uri = Url::parse(path).unwrap();
    store.open(uri.clone(), text.to_string(), 1);
    uri
}

#[test]
fn language_from_extension() {
    assert_eq!(Language::from_uri(&Url::parse("file:///api/user.go").unwrap()), Some(Language::Go));
    assert_eq!(Language::from_uri(&Url::parse("file:///api/user.ts").unwrap()), Some(Language::TypeScript));
    assert_eq!(Language::from_uri(&Url::parse("file:///web/App.tsx").unwrap()), Some(Language::TypeScript));
    assert_eq!(Language::from_uri(&Url::parse("file:///api/user.rs").unwrap()), None);
    assert_eq!(Language::from_uri(&Url::parse("file:///api.v2/Makefile").unwrap()), None);
    assert_eq!(Language::Go.counterpart(), Language::TypeScript);
}

#[test]
fn lsp_kinds_round_trip() {
    for kind in [
        SymbolKind::Function,
        SymbolKind::Struct,
        SymbolKind::Interface,
        SymbolKind::Property,
        SymbolKind::Method,
        SymbolKind::Constant,
        SymbolKind::TypeAlias,
    ] {
        assert_eq!(SymbolKind::from_lsp(kind.to_lsp()), kind);
    }
    assert_eq!(SymbolKind::from_lsp(lsp_types::SymbolKind::ENUM), SymbolKind::Other);
}

#[test]
fn ranges_are_inclusive_at_both_ends() {
    let range = Range::new(Position::new(2, 5), Position::new(2, 12));
    assert!(range_contains(range, Position::new(2, 5)));
    assert!(range_contains(range, Position::new(2, 12)));
    assert!(!range_contains(range, Position::new(2, 13)));
    assert!(!range_contains(range, Position::new(1, 8)));
}

#[tokio::test]
async fn go_export_comes_from_the_name() {
    let store = Arc::new(DocumentStore::new());
    let uri = open(&store, "file:///virtual/api/user.go", "package api\n\nfunc GetUser() {}\n\nfunc helper() {}\n");
    let source = WorkspaceSource::new(Arc::clone(&store));

    let symbols = load_symbols(&source, &uri).await.unwrap();
    let exported: Vec<(&str, bool)> = symbols.iter().map(|symbol| (symbol.name.as_str(), symbol.exported)).collect();
    assert_eq!(exported, vec![("GetUser", true), ("helper", false)]);
    assert!(symbols.iter().all(|symbol| symbol.language == Language::Go && symbol.uri == uri));
}

#[tokio::test]
async fn typescript_members_inherit_container_export() {
    let store = Arc::new(DocumentStore::new());
    let text = "export interface User {\n  id: string;\n}\n\ninterface Internal {\n  id: string;\n}\n";
    let uri = open(&store, "file:///virtual/api/user.ts", text);
    let source = WorkspaceSource::new(Arc::clone(&store));

    let symbols = load_symbols(&source, &uri).await.unwrap();
    assert_eq!(symbols.len(), 2);
    assert!(symbols[0].exported);
    assert!(symbols[0].children.iter().all(|child| child.exported));
    assert!(!symbols[1].exported);
    assert!(symbols[1].children.iter().all(|child| !child.exported));
}

#[tokio::test]
async fn struct_never_reports_methods() {
    let store = Arc::new(DocumentStore::new());
    let text = "package api\n\ntype Service interface {\n\tRun() error\n}\n\ntype Config struct {\n\tName string\n}\n";
    let uri = open(&store, "file:///virtual/api/service.go", text);
    let source = WorkspaceSource::new(Arc::clone(&store));

    let symbols = load_symbols(&source, &uri).await.unwrap();
    let service = symbols.iter().find(|symbol| symbol.name == "Service").unwrap();
    let config = symbols.iter().find(|symbol| symbol.name == "Config").unwrap();
    assert!(service.has_methods());
    assert!(!config.has_methods());
    assert!(InterfaceInfo::from_symbol(service).has_methods);
}

#[tokio::test]
async fn unknown_languages_have_no_symbols() {
    let store = Arc::new(DocumentStore::new());
    let uri = open(&store, "file:///virtual/README.md", "# GetUser\n");
    let source = WorkspaceSource::new(store);
    assert!(load_symbols(&source, &uri).await.unwrap().is_empty());
}
