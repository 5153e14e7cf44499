use tower_lsp::lsp_types::Range;

use super::*;

fn test_doc(text: &str) -> Document {
    Document::new(Url::parse("file:///api/user.go").unwrap(), text.to_string(), 1)
}

fn edit(
    start: (u32, u32),
    end: (u32, u32),
    text: &str,
) -> TextDocumentContentChangeEvent {
    TextDocumentContentChangeEvent {
        range: Some(Range::new(Position::new(start.0, start.1), Position::new(end.0, end.1))),
        range_length: None,
        text: text.to_string(),
    }
}

#[test]
fn line_offsets_empty() {
    let doc = test_doc("");
    assert_eq!(doc.line_count(), 1);
    assert_eq!(doc.line_text(0), Some(""));
    assert_eq!(doc.line_text(1), None);
}

#[test]
fn line_offsets_basic() {
    let doc = test_doc("package api\r\n\r\nfunc GetUser() {}\n");
    assert_eq!(doc.line_count(), 4);
    assert_eq!(doc.line_text(0), Some("package api"));
    assert_eq!(doc.line_text(1), Some(""));
    assert_eq!(doc.line_text(2), Some("func GetUser() {}"));
    assert_eq!(doc.line_text(3), Some(""));
}

#[test]
fn offsets_use_utf16_columns() {
    let doc = test_doc("// héllo\nvar x = 1\n");
    assert_eq!(doc.offset_of(Position::new(1, 0)), Some(10));
    assert_eq!(doc.offset_of(Position::new(0, 4)), Some(4));
    assert_eq!(doc.offset_of(Position::new(0, 5)), Some(6));
    assert_eq!(doc.offset_of(Position::new(0, 99)), Some(9));
    assert_eq!(doc.offset_of(Position::new(7, 0)), None);
}

#[test]
fn incremental_change() {
    let mut doc = test_doc("func getUser() {}");
    doc.apply_changes(vec![edit((0, 5), (0, 6), "G")], 2);
    assert_eq!(doc.text, "func GetUser() {}");
    assert_eq!(doc.version, 2);
}

#[test]
fn sequential_changes_see_earlier_edits() {
    let mut doc = test_doc("type User struct {\n}\n");
    doc.apply_changes(vec![edit((1, 0), (1, 0), "\tID string\n"), edit((2, 1), (2, 1), "\n// end")], 2);
    assert_eq!(doc.text, "type User struct {\n\tID string\n}\n// end\n");
    assert_eq!(doc.line_count(), 5);
    assert_eq!(doc.line_text(1), Some("\tID string"));
}

#[test]
fn full_content_change() {
    let mut doc = test_doc("old content");
    doc.apply_changes(
        vec![TextDocumentContentChangeEvent {
            range: None,
            range_length: None,
            text: "new\ncontent".to_string(),
        }],
        3,
    );
    assert_eq!(doc.text, "new\ncontent");
    assert_eq!(doc.line_count(), 2);
    assert_eq!(doc.version, 3);
}

#[test]
fn out_of_range_edits_are_ignored() {
    let mut doc = test_doc("const a = 1");
    doc.apply_changes(vec![edit((4, 0), (4, 1), "x")], 2);
    assert_eq!(doc.text, "const a = 1");
    assert_eq!(doc.version, 2);
}
