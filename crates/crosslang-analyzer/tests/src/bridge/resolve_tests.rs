use std::{fs, path::Path};

use tempfile::TempDir;
use tower_lsp::lsp_types::Range;

use super::*;
use crate::{document::DocumentStore, workspace::WorkspaceSource};

const GO_FILE: &str = "package api\n\nfunc GetUser(id string) string {\n\treturn id\n}\n";
const TS_FILE: &str =
    "export function getUser(id: string): string {\n  return id;\n}\n\nexport const profile = getUser(\"42\");\n";

struct Fixture {
    dir: TempDir,
    go: Url,
    ts: Url,
    resolver: CrossLanguageResolver<WorkspaceSource>,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let write = |name: &str, text: &str| {
        let path = dir.path().join(name);
        fs::write(&path, text).unwrap();
        Url::from_file_path(&path).unwrap()
    };
    let go = write("user.go", GO_FILE);
    let ts = write("user.ts", TS_FILE);
    let source = Arc::new(WorkspaceSource::new(Arc::new(DocumentStore::new())));
    Fixture {
        dir,
        go,
        ts,
        resolver: CrossLanguageResolver::new(source),
    }
}

fn never() -> bool {
    false
}

fn in_dir(
    locations: &[Location],
    dir: &Path,
) -> bool {
    locations.iter().all(|location| location.uri.to_file_path().unwrap().parent() == Some(dir))
}

#[tokio::test]
async fn counterparts_are_the_matched_declarations() {
    let fx = fixture();
    let found = fx.resolver.resolve_counterparts(&fx.go, Position::new(2, 6), &ResolveOptions::default(), &never).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uri, fx.ts);
    assert_eq!(found[0].range.start, Position::new(0, 16));
    assert!(in_dir(&found, fx.dir.path()));
}

#[tokio::test]
async fn references_lead_with_declarations_and_drop_duplicates() {
    let fx = fixture();
    let found = fx.resolver.resolve_references(&fx.go, Position::new(2, 6), &ResolveOptions::default(), &never).await;
    let starts: Vec<Position> = found.iter().map(|location| location.range.start).collect();
    assert_eq!(starts, vec![Position::new(0, 16), Position::new(4, 23)]);
    assert!(found.iter().all(|location| location.uri == fx.ts));
}

#[tokio::test]
async fn implementations_of_a_function_are_its_counterparts() {
    let fx = fixture();
    let found =
        fx.resolver.resolve_implementations(&fx.ts, Position::new(0, 17), &ResolveOptions::default(), &never).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uri, fx.go);
    assert_eq!(found[0].range.start, Position::new(2, 5));
}

#[tokio::test]
async fn disabled_resolution_returns_nothing() {
    let fx = fixture();
    let options = ResolveOptions {
        enabled: false,
        ..ResolveOptions::default()
    };
    assert!(fx.resolver.resolve_references(&fx.go, Position::new(2, 6), &options, &never).await.is_empty());
    assert!(fx.resolver.resolve_counterparts(&fx.go, Position::new(2, 6), &options, &never).await.is_empty());
}

#[tokio::test]
async fn nested_requests_are_refused() {
    let fx = fixture();
    let token = fx.resolver.guard().try_enter().unwrap();
    let options = ResolveOptions::default();
    assert!(fx.resolver.resolve_references(&fx.go, Position::new(2, 6), &options, &never).await.is_empty());
    assert!(fx.resolver.resolve_implementations(&fx.go, Position::new(2, 6), &options, &never).await.is_empty());
    drop(token);
    assert_eq!(fx.resolver.resolve_counterparts(&fx.go, Position::new(2, 6), &options, &never).await.len(), 1);
    assert!(!fx.resolver.guard().is_held());
}

#[tokio::test]
async fn an_admitted_session_keeps_answering_while_others_are_refused() {
    let fx = fixture();
    let options = ResolveOptions::default();
    let session = fx.resolver.begin(&options).unwrap();
    assert!(fx.resolver.begin(&options).is_none());
    assert!(fx.resolver.resolve_references(&fx.go, Position::new(2, 6), &options, &never).await.is_empty());

    let found = session.counterparts(&fx.go, Position::new(2, 6), &never).await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].uri, fx.ts);
    drop(session);
    assert!(!fx.resolver.guard().is_held());

    let disabled = ResolveOptions {
        enabled: false,
        ..options
    };
    assert!(fx.resolver.begin(&disabled).is_none());
}

#[tokio::test]
async fn unmatchable_positions_return_nothing() {
    let fx = fixture();
    let options = ResolveOptions::default();
    // `package api`
    assert!(fx.resolver.resolve_references(&fx.go, Position::new(0, 2), &options, &never).await.is_empty());
    assert!(!fx.resolver.guard().is_held());
}

#[test]
fn location_set_keeps_first_occurrence_and_filters_language() {
    let go = Url::parse("file:///api/user.go").unwrap();
    let ts = Url::parse("file:///api/user.ts").unwrap();
    let at = |uri: &Url, line: u32, character: u32, end: u32| {
        Location::new(uri.clone(), Range::new(Position::new(line, character), Position::new(line, end)))
    };

    let mut set = LocationSet::default();
    set.insert(at(&ts, 0, 16, 23));
    set.extend([at(&ts, 0, 16, 30), at(&go, 2, 5, 12), at(&ts, 4, 23, 30)]);
    let kept = set.into_language(Language::TypeScript);
    assert_eq!(kept, vec![at(&ts, 0, 16, 23), at(&ts, 4, 23, 30)]);
}
