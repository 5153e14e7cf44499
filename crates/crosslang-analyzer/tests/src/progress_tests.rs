use super::*;

#[test]
fn progress_title_adds_prefix_when_missing() {
    assert_eq!(prefixed_progress_title("References"), "crosslang-analyzer: References".to_string());
    assert_eq!(prefixed_progress_title("  Definition "), "crosslang-analyzer: Definition".to_string());
}

#[test]
fn progress_title_preserves_existing_prefix() {
    assert_eq!(
        prefixed_progress_title("crosslang-analyzer: Implementations"),
        "crosslang-analyzer: Implementations".to_string()
    );
}

#[test]
fn end_carries_the_message() {
    let WorkDoneProgress::End(end) = end_value(Some("2 location(s)".to_string())) else {
        panic!("expected an end notification");
    };
    assert_eq!(end.message.as_deref(), Some("2 location(s)"));
}
