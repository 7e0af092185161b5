#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rune_diagnostic::ErrorCode;
use rune_ir::{BlockId, ExprId, ExprKind, FunctionId, Linkage, StmtKind, TypeId};

use super::*;
use crate::test_helpers::Fixture;

const SPAN: Span = Span::DUMMY;

fn bind(fx: &mut Fixture) -> Result<BindReport, BindErrors> {
    bind_program(&mut fx.program, &mut fx.pool, &fx.options)
}

fn u32_literal(fx: &mut Fixture, value: u64) -> ExprId {
    fx.program.int_expr(value, Some(32), false, SPAN)
}

/// `name(args...)`
fn call(fx: &mut Fixture, name: &str, args: &[ExprId]) -> ExprId {
    let callee = fx.program.ident_expr(name, SPAN);
    let list = fx.program.new_expr(ExprKind::List, args, SPAN);
    fx.program.new_expr(ExprKind::Call, &[callee, list], SPAN)
}

/// `target = value` in `block`.
fn assign(fx: &mut Fixture, block: BlockId, target: &str, value: ExprId) {
    let target = fx.program.ident_expr(target, SPAN);
    let assignment = fx.program.new_expr(ExprKind::Equals, &[target, value], SPAN);
    fx.program.add_statement(block, StmtKind::Assign, Some(assignment), SPAN);
}

fn print(fx: &mut Fixture, block: BlockId, args: &[ExprId]) {
    let list = fx.program.new_expr(ExprKind::List, args, SPAN);
    fx.program.add_statement(block, StmtKind::Print, Some(list), SPAN);
}

fn function(fx: &mut Fixture, name: &str, params: &[&str]) -> (FunctionId, BlockId) {
    let root = fx.program.root_block();
    let function = fx
        .program
        .add_function(root, name, FuncKind::Plain, Linkage::Module, SPAN);
    for param in params {
        fx.program.add_parameter(function, param, SPAN);
    }
    (function, fx.program.function(function).sub_block)
}

fn main_variable_type(fx: &Fixture, name: &str) -> Option<TypeId> {
    let name = fx.program.interner().get(name)?;
    let ident = fx.program.find_ident(fx.program.root_block(), name)?;
    let variable = fx.program.ident_variable(ident)?;
    fx.program.variable(variable).datatype
}

fn error_codes(errors: &BindErrors) -> Vec<ErrorCode> {
    errors.diagnostics.iter().map(|d| d.code).collect()
}

#[test]
fn empty_main_returns_u32() {
    let mut fx = Fixture::new();
    let report = bind(&mut fx).unwrap();

    assert_eq!(report.signatures, 1);
    let main = fx.program.main_function();
    let signature = fx.program.function(main).signatures[0];
    assert_eq!(fx.program.signature(signature).return_type, Some(TypeId::U32));
    assert!(fx.program.signature(signature).bound);

    let root = fx.program.root_block();
    let last = *fx.program.block(root).statements.last().unwrap();
    assert_eq!(fx.program.statement(last).kind, StmtKind::Return);
    assert!(fx.program.statement(last).generated);
}

#[test]
fn call_result_types_the_assigned_variable() {
    let mut fx = Fixture::new();
    let (_, body) = function(&mut fx, "double", &["n"]);
    let left = fx.program.ident_expr("n", SPAN);
    let right = fx.program.ident_expr("n", SPAN);
    let sum = fx.program.new_expr(ExprKind::Add, &[left, right], SPAN);
    fx.program.add_statement(body, StmtKind::Return, Some(sum), SPAN);

    let main = fx.main_block();
    let three = u32_literal(&mut fx, 3);
    let value = call(&mut fx, "double", &[three]);
    assign(&mut fx, main, "x", value);

    let report = bind(&mut fx).unwrap();
    assert_eq!(report.signatures, 2);
    assert_eq!(main_variable_type(&fx, "x"), Some(TypeId::U32));
}

#[test]
fn conflicting_returns_are_reported() {
    let mut fx = Fixture::new();
    let (_, body) = function(&mut fx, "pick", &["flag"]);
    let condition = fx.program.ident_expr("flag", SPAN);
    let (_, then_block) = fx
        .program
        .add_compound_statement(body, StmtKind::If, Some(condition), SPAN);
    let one = u32_literal(&mut fx, 1);
    fx.program.add_statement(then_block, StmtKind::Return, Some(one), SPAN);
    let text = fx.program.string_expr("none", SPAN);
    fx.program.add_statement(body, StmtKind::Return, Some(text), SPAN);

    let main = fx.main_block();
    let flag = fx.program.bool_expr(true, SPAN);
    let value = call(&mut fx, "pick", &[flag]);
    assign(&mut fx, main, "y", value);

    let errors = bind(&mut fx).unwrap_err();
    assert_eq!(error_codes(&errors), vec![ErrorCode::E2013]);
}

#[test]
fn undefined_identifier_is_reported_after_binding() {
    let mut fx = Fixture::new();
    let main = fx.main_block();
    let missing = fx.program.ident_expr("missing", SPAN);
    print(&mut fx, main, &[missing]);

    let errors = bind(&mut fx).unwrap_err();
    assert_eq!(error_codes(&errors), vec![ErrorCode::E5001]);
    assert!(errors.first().unwrap().message.contains("missing"));
}

#[test]
fn error_limit_caps_unresolved_reports() {
    let build = |limit: usize| {
        let mut fx = Fixture::new();
        fx.options = BindOptions::new().error_limit(limit);
        let main = fx.main_block();
        for name in ["first", "second", "third"] {
            let missing = fx.program.ident_expr(name, SPAN);
            print(&mut fx, main, &[missing]);
        }
        bind(&mut fx).unwrap_err().diagnostics.len()
    };
    assert_eq!(build(0), 3);
    assert_eq!(build(2), 2);
}

#[test]
fn printing_a_secret_fails() {
    let mut fx = Fixture::new();
    let main = fx.main_block();
    let five = u32_literal(&mut fx, 5);
    let secret = fx.program.new_expr(ExprKind::Secret, &[five], SPAN);
    print(&mut fx, main, &[secret]);

    let errors = bind(&mut fx).unwrap_err();
    assert_eq!(error_codes(&errors), vec![ErrorCode::E2005]);
}

#[test]
fn unit_tests_bind_only_in_test_mode() {
    let build = |test_mode: bool| {
        let mut fx = Fixture::new();
        fx.options = BindOptions::new().test_mode(test_mode);
        let root = fx.program.root_block();
        let test = fx
            .program
            .add_function(root, "checks", FuncKind::Unittest, Linkage::Module, SPAN);
        let body = fx.program.function(test).sub_block;
        let message = fx.program.string_expr("ok", SPAN);
        print(&mut fx, body, &[message]);
        bind(&mut fx).unwrap().signatures
    };
    assert_eq!(build(false), 1);
    assert_eq!(build(true), 2);
}
