use super::*;
use pretty_assertions::assert_eq;
use std::error::Error as _;

fn parse_int_error() -> std::num::ParseIntError {
    "12x".parse::<i32>().unwrap_err()
}

#[test]
fn test_new_has_no_context() {
    let err = CompileError::new();

    assert_eq!(err.message(), "");
    assert_eq!(err.expr(), None);
    assert_eq!(err.cursor(), None);
    assert_eq!(err.raw_cursor(), -1);
    assert_eq!(err.line_number(), None);
    assert_eq!(err.column(), None);
    assert!(err.cause().is_none());
    assert!(err.errors().is_empty());
    assert!(!err.has_errors_set());
    assert_eq!(err.to_string(), "[Error: ]\n[Near : {... Unknown ....}]");
}

#[test]
fn test_from_message() {
    let err = CompileError::from_message("unknown function `frob`");

    assert_eq!(err.message(), "unknown function `frob`");
    assert_eq!(err.snippet(), "Unknown");
    assert!(err.errors().is_empty());
}

#[test]
fn test_aggregate_keeps_batch_in_order() {
    let errors = vec![
        ErrorDetail::error("unexpected `;`").with_cursor(3),
        ErrorDetail::warning("unused variable `t`").with_cursor(9),
    ];
    let err = CompileError::aggregate("2 problems found", errors.clone());

    assert_eq!(err.message(), "2 problems found");
    assert_eq!(err.errors(), errors.as_slice());
    assert!(err.has_errors_set());
}

#[test]
fn test_aggregate_with_empty_batch() {
    let err = CompileError::aggregate("nothing", Vec::new());

    assert!(err.errors().is_empty());
    assert!(err.has_errors_set());
}

#[test]
fn test_at_cursor_has_no_source() {
    let err = CompileError::at_cursor("unbalanced parens", 7);

    assert_eq!(err.cursor(), Some(7));
    assert_eq!(err.raw_cursor(), 7);
    assert_eq!(err.expr(), None);
    assert_eq!(err.snippet(), "Unknown");
}

#[test]
fn test_at_cursor_renders_once_source_is_attached() {
    let err = CompileError::at_cursor("unbalanced parens", 2).with_expr("((a + b)");

    assert_eq!(err.snippet(), extract_snippet(Some("((a + b)"), 2));
    assert!(err.to_string().contains("[Near : {... ((a + b ....}]"));
}

#[test]
fn test_in_source_display() {
    // len 7, cursor 4: end 24 -> 6, start -> 0
    let err = CompileError::in_source("unexpected token", "a + * b", 4);

    assert_eq!(
        err.to_string(),
        "[Error: unexpected token]\n[Near : {... a + *  ....}]"
    );
}

#[test]
fn test_in_source_display_contains_snippet() {
    let expr = "order.total > 100 && customer.tier == 'gold' && ";
    let err = CompileError::in_source("X", expr, 5);
    let output = err.to_display_string();

    assert!(output.contains("[Error: X]"));
    assert!(output.contains(&extract_snippet(Some(expr), 5)));
    assert_eq!(output, err.to_string());
}

#[test]
fn test_position_suffix() {
    let err = CompileError::in_source("bad", "x + ", 3).with_position(3, 14);

    assert_eq!(err.line_number(), Some(3));
    assert_eq!(err.column(), Some(14));
    assert!(err.to_string().ends_with("\n[Line: 3, Column: 14]"));
}

#[test]
fn test_no_position_no_suffix() {
    let err = CompileError::in_source("bad", "x + ", 3);
    assert!(!err.to_string().contains("[Line:"));
}

#[test]
fn test_line_without_column_renders_minus_one() {
    let err = CompileError::from_message("bad").with_line_number(2);
    assert!(err.to_string().ends_with("[Line: 2, Column: -1]"));
}

#[test]
fn test_column_alone_does_not_render() {
    let err = CompileError::from_message("bad").with_column(8);
    assert!(!err.to_string().contains("[Line:"));
}

#[test]
fn test_in_source_caused_by_chains_source() {
    let err = CompileError::in_source_caused_by("invalid literal", "x = 12x", 4, parse_int_error());

    assert_eq!(err.cursor(), Some(4));
    assert_eq!(err.expr(), Some("x = 12x"));
    assert_eq!(
        err.source().unwrap().to_string(),
        parse_int_error().to_string()
    );
    assert!(err.cause().is_some());
}

#[test]
fn test_caused_by() {
    let err = CompileError::caused_by("could not coerce argument", parse_int_error());

    assert_eq!(err.message(), "could not coerce argument");
    assert_eq!(err.expr(), None);
    assert!(err.source().is_some());
}

#[test]
fn test_from_cause_uses_cause_text() {
    let err = CompileError::from_cause(parse_int_error());

    assert_eq!(err.message(), parse_int_error().to_string());
    assert_eq!(err.cursor(), None);
}

#[test]
fn test_rewrapping_keeps_original_reachable() {
    let inner = CompileError::in_source("unknown property `nmae`", "user.nmae", 5).with_position(1, 6);
    let outer = CompileError::caused_by("failed to compile rule `is_admin`", inner);

    let inner = outer
        .source()
        .unwrap()
        .downcast_ref::<CompileError>()
        .unwrap();
    assert_eq!(inner.message(), "unknown property `nmae`");
    assert_eq!(inner.expr(), Some("user.nmae"));
    assert_eq!(inner.line_number(), Some(1));
}

#[test]
fn test_formatted_eager_message() {
    let err = CompileError::formatted("bad operator", "a + * b", 4, true, None);

    assert_eq!(
        err.message(),
        "Failed to compile:\n[Error: bad operator]\n[Near: { ... a + *  ... } ]\n[Position: 4]"
    );
    assert!(err.message().contains("Failed to compile:"));
    assert!(err.message().contains("[Near:"));
    assert!(err.message().contains("[Position: 4]"));
    assert!(err.cause().is_none());
}

#[test]
fn test_formatted_without_concat_keeps_message() {
    let cause: Cause = Arc::new(parse_int_error());
    let err = CompileError::formatted("bad literal", "x = 12x", 4, false, Some(cause));

    assert_eq!(err.message(), "bad literal");
    assert_eq!(err.expr(), Some("x = 12x"));
    assert_eq!(err.cursor(), Some(4));
    assert!(err.source().is_some());
}

#[test]
fn test_formatted_message_and_display_both_carry_snippet() {
    let err = CompileError::formatted("bad operator", "a + * b", 4, true, None);
    let output = err.to_string();

    // The eager message is wrapped by the regular rendering.
    assert!(output.starts_with("[Error: Failed to compile:\n[Error: bad operator]"));
    assert!(output.ends_with("[Near : {... a + *  ....}]"));
}

#[test]
fn test_formatted_message_diverges_after_update() {
    let err = CompileError::formatted("bad operator", "a + * b", 4, true, None)
        .with_expr("first || second && )")
        .with_cursor(19);

    // The stored message still shows the excerpt taken at construction...
    assert!(err.message().contains("[Near: { ... a + *  ... } ]"));
    assert!(err.message().contains("[Position: 4]"));
    // ...while rendering reads the updated expression and cursor.
    assert_eq!(err.snippet(), "first || second && ");
    assert!(err.to_string().contains("[Near : {... first || second &&  ....}]"));
}

#[test]
fn test_cursor_and_expr_can_be_cleared() {
    let err = CompileError::in_source("bad", "a + * b", 4).without_cursor();

    assert_eq!(err.cursor(), None);
    assert_eq!(err.raw_cursor(), -1);
    // unknown cursor renders like -1: start clamps to 0, end = 19 -> len - 1
    assert_eq!(err.snippet(), "a + * ");

    let err = err.with_cursor(4).without_expr();
    assert_eq!(err.expr(), None);
    assert_eq!(err.cursor(), Some(4));
    assert_eq!(err.snippet(), "Unknown");
    assert!(err.to_string().contains("[Near : {... Unknown ....}]"));
}

#[test]
fn test_with_errors_replaces_batch() {
    let err = CompileError::aggregate("problems", vec![ErrorDetail::error("first")])
        .with_errors(vec![ErrorDetail::warning("second")]);

    assert_eq!(err.errors().len(), 1);
    assert_eq!(err.errors()[0].message(), "second");
    assert!(!err.errors()[0].is_critical());
}

#[test]
fn test_locate_in_source() {
    let err = CompileError::in_source("unexpected `?`", "a = 1\nb = ?", 10).locate_in_source();

    assert_eq!(err.line_number(), Some(2));
    assert_eq!(err.column(), Some(5));
    assert!(err.to_string().ends_with("\n[Line: 2, Column: 5]"));
}

#[test]
fn test_locate_with_external_index() {
    let source = "first\nsecond\nthird";
    let index = LineIndex::build(source);
    let err = CompileError::at_cursor("bad", 15).locate(&index);

    assert_eq!(err.line_number(), Some(3));
    assert_eq!(err.column(), Some(3));
}

#[test]
fn test_locate_without_cursor_is_noop() {
    let index = LineIndex::build("a\nb");

    let err = CompileError::from_message("bad").locate(&index);
    assert_eq!(err.line_number(), None);

    let err = CompileError::at_cursor("bad", 1).locate_in_source();
    assert_eq!(err.line_number(), None);
}

#[test]
fn test_options_without_message_or_cause() {
    let err: CompileError = CompileErrorOptions::default().source("a.b", 2).into();

    assert_eq!(err.message(), "");
    assert_eq!(err.snippet(), "a.");
}

#[test]
fn test_options_explicit_message_wins_over_cause() {
    let err = CompileError::from_options(
        CompileErrorOptions::new("wrapped")
            .cause(parse_int_error())
            .errors(vec![ErrorDetail::error("detail")]),
    );

    assert_eq!(err.message(), "wrapped");
    assert_eq!(err.errors().len(), 1);
    assert!(err.source().is_some());
}

#[test]
fn test_eager_format_without_source() {
    let err = CompileErrorOptions::new("oops")
        .eager_format(true)
        .into_error();

    assert_eq!(
        err.message(),
        "Failed to compile:\n[Error: oops]\n[Near: { ... Unknown ... } ]\n[Position: -1]"
    );
}

#[test]
fn test_propagates_with_question_mark() {
    fn compile(expr: &str) -> Result<usize, CompileError> {
        match expr.find(')') {
            Some(cursor) => Err(CompileError::in_source("unbalanced `)`", expr, cursor)),
            None => Ok(expr.len()),
        }
    }

    fn compile_all(exprs: &[&str]) -> Result<usize, CompileError> {
        let mut total = 0;
        for expr in exprs {
            total += compile(expr)?;
        }
        Ok(total)
    }

    assert_eq!(compile_all(&["a", "bc"]).unwrap(), 3);
    let err = compile_all(&["a", "b)"]).unwrap_err();
    assert_eq!(err.cursor(), Some(1));
}

#[test]
fn test_clone_shares_expression() {
    let err = CompileError::in_source("bad", String::from("x + y"), 2);
    let copy = err.clone();

    assert_eq!(copy.expr(), err.expr());
    assert_eq!(copy.to_string(), err.to_string());
}

#[test]
fn test_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<CompileError>();
    assert_send_sync::<ErrorDetail>();
}
