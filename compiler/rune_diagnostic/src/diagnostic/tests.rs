use super::*;
use pretty_assertions::assert_eq;

#[test]
fn first_label_is_primary() {
    let diag = Diagnostic::error(ErrorCode::E3001)
        .with_message("`helper` takes 2 argument(s), but more were passed")
        .with_label(Span::new(10, 14), "called with 3 arguments")
        .with_label(Span::new(0, 4), "declared here")
        .with_note("while binding main()");

    assert_eq!(diag.primary_span(), Some(Span::new(10, 14)));
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.notes, vec!["while binding main()".to_string()]);
}

#[test]
fn display_lists_labels_then_notes() {
    let diag = undefined_identifier(Span::new(2, 5), "foo").with_note("while binding main()");
    assert_eq!(
        diag.to_string(),
        "error[E5001]: undefined identifier `foo`\n  --> 2..5: never defined in this scope\n  = note: while binding main()"
    );
}

#[test]
fn unlocated_diagnostic_has_no_span() {
    let diag = Diagnostic::error(ErrorCode::E9001).with_message("binding graph is inconsistent");
    assert_eq!(diag.primary_span(), None);
    assert!(diag.code.is_internal_error());
}
