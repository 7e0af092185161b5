#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rune_ir::Span;

use super::*;
use crate::test_helpers::Fixture;

/// `format % (args...)` with bound argument types.
fn check(format: &str, args: &[TypeId]) -> Result<(), Diagnostic> {
    let mut fx = Fixture::new();
    let format_expr = fx.string(format);
    let tuple_type = fx.pool.tuple(args);
    let args_expr = fx.program.new_expr(ExprKind::Tuple, &[], Span::default());
    fx.program.expr_mut(args_expr).datatype = Some(tuple_type);
    let expr = fx
        .program
        .new_expr(ExprKind::Mod, &[format_expr, args_expr], Span::default());
    let binder = fx.binder();
    verify_format_expr(&binder, expr, format_expr, args_expr)
}

fn code(result: Result<(), Diagnostic>) -> ErrorCode {
    result.unwrap_err().code
}

#[test]
fn matching_directives_are_accepted() {
    assert!(check("%d %u %s %b %f", &[TypeId::I32, TypeId::U64, TypeId::STRING, TypeId::BOOL, TypeId::F64]).is_ok());
}

#[test]
fn width_and_percent_are_accepted() {
    assert!(check("%08x%% done", &[TypeId::U32]).is_ok());
}

#[test]
fn hex_takes_signed_integers() {
    assert!(check("%x", &[TypeId::I64]).is_ok());
}

#[test]
fn signed_directive_rejects_unsigned() {
    assert_eq!(code(check("%i", &[TypeId::U32])), ErrorCode::E2008);
}

#[test]
fn missing_argument_is_reported() {
    assert_eq!(code(check("%s and %s", &[TypeId::STRING])), ErrorCode::E2008);
}

#[test]
fn extra_argument_is_reported() {
    assert_eq!(code(check("%s", &[TypeId::STRING, TypeId::BOOL])), ErrorCode::E2008);
}

#[test]
fn unknown_directive_is_reported() {
    assert_eq!(code(check("%q", &[TypeId::STRING])), ErrorCode::E2008);
}

#[test]
fn trailing_percent_is_reported() {
    assert_eq!(code(check("100%", &[])), ErrorCode::E2008);
}

#[test]
fn single_argument_without_tuple() {
    let mut fx = Fixture::new();
    let format_expr = fx.string("%u items");
    let arg = fx.uint(3, 32);
    let expr = fx.program.new_expr(ExprKind::Mod, &[format_expr, arg], Span::default());
    let binder = fx.binder();
    assert!(verify_format_expr(&binder, expr, format_expr, arg).is_ok());
}

#[test]
fn secret_print_argument_is_rejected() {
    let mut fx = Fixture::new();
    let arg = fx.uint(3, 32);
    let secret = fx.pool.set_secret(TypeId::U32, true);
    fx.program.expr_mut(arg).datatype = Some(secret);
    let list = fx.program.new_expr(ExprKind::List, &[arg], Span::default());
    let binder = fx.binder();
    assert_eq!(code(verify_print_arguments(&binder, list, false)), ErrorCode::E2005);
}

#[test]
fn raise_needs_enum_first() {
    let mut fx = Fixture::new();
    let message = fx.string("oops");
    let list = fx.program.new_expr(ExprKind::List, &[message], Span::default());
    let binder = fx.binder();
    assert_eq!(code(verify_print_arguments(&binder, list, true)), ErrorCode::E2002);
}
