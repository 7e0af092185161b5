#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rune_diagnostic::ErrorCode;
use rune_ir::{Linkage, Span};

use super::*;
use crate::test_helpers::Fixture;

const SPAN: Span = Span::DUMMY;

/// Templates `A` and `B` plus a transformer `Link(parent, child, cascade = false)`.
struct Setup {
    fx: Fixture,
    a: TemplateId,
    link: FunctionId,
}

impl Setup {
    fn new() -> Self {
        let mut fx = Fixture::new();
        let (a, _) = fx.class_type("A");
        fx.class_type("B");
        let root = fx.program.root_block();
        let link = fx
            .program
            .add_function(root, "Link", FuncKind::Transformer, Linkage::Module, SPAN);
        fx.program.add_parameter(link, "parent", SPAN);
        fx.program.add_parameter(link, "child", SPAN);
        let cascade = fx.program.add_parameter(link, "cascade", SPAN);
        let default = fx.program.bool_expr(false, SPAN);
        fx.program.set_variable_initializer(cascade, default);
        Setup { fx, a, link }
    }

    fn body(&self) -> BlockId {
        self.fx.program.function(self.link).sub_block
    }

    /// `appendcode parent { fn <name>() {} }` in `block`.
    fn append_function(&mut self, block: BlockId, name: &str) {
        let dest = self.fx.program.ident_expr("parent", SPAN);
        let (_, code) = self
            .fx
            .program
            .add_compound_statement(block, StmtKind::AppendCode, Some(dest), SPAN);
        self.fx
            .program
            .add_function(code, name, FuncKind::Plain, Linkage::Module, SPAN);
    }

    /// `relation <callee>(A, B, extra...)` in `main`.
    fn relation(&mut self, callee: &str, extra: &[ExprId]) -> StatementId {
        let callee = self.fx.program.ident_expr(callee, SPAN);
        let parent = self.fx.program.ident_expr("A", SPAN);
        let child = self.fx.program.ident_expr("B", SPAN);
        let mut args = vec![parent, child];
        args.extend_from_slice(extra);
        let list = self.fx.program.new_expr(ExprKind::List, &args, SPAN);
        let call = self.fx.program.new_expr(ExprKind::Call, &[callee, list], SPAN);
        let main = self.fx.main_block();
        self.fx
            .program
            .add_statement(main, StmtKind::Relation, Some(call), SPAN)
    }

    fn cascade_arg(&mut self, value: bool) -> ExprId {
        let name = self.fx.program.ident_expr("cascade", SPAN);
        let value = self.fx.program.bool_expr(value, SPAN);
        self.fx.program.new_expr(ExprKind::NamedParam, &[name, value], SPAN)
    }

    fn execute(&mut self, statement: StatementId) -> Result<(), Diagnostic> {
        execute_relation(&mut self.fx.binder(), statement)
    }

    fn has_method(&self, template: TemplateId, name: &str) -> bool {
        let constructor = self.fx.program.template(template).function;
        let block = self.fx.program.function(constructor).sub_block;
        self.fx
            .program
            .interner()
            .get(name)
            .and_then(|name| self.fx.program.find_ident_in_block(block, name))
            .is_some()
    }
}

#[test]
fn relation_records_templates_and_generated_code() {
    let mut setup = Setup::new();
    let body = setup.body();
    setup.append_function(body, "first$child");
    let cascade = setup.cascade_arg(true);
    let statement = setup.relation("Link", &[cascade]);

    setup.execute(statement).unwrap();

    assert!(setup.has_method(setup.a, "firstB"));
    let relation = setup.fx.program.relation_ids().next().unwrap();
    let record = setup.fx.program.relation(relation);
    assert!(record.cascade);
    assert_eq!(setup.fx.program.template_name(record.parent), "A");
    assert_eq!(setup.fx.program.template_name(record.child), "B");
    assert_eq!(record.functions.len(), 1);
    let generated = record.functions[0];
    assert!(setup.fx.program.function(generated).generated);
    assert_eq!(setup.fx.program.function(generated).relation, Some(relation));
    assert!(setup.fx.program.statement(statement).executed);
}

#[test]
fn executed_relation_runs_once() {
    let mut setup = Setup::new();
    let body = setup.body();
    setup.append_function(body, "get$child");
    let statement = setup.relation("Link", &[]);

    setup.execute(statement).unwrap();
    setup.execute(statement).unwrap();

    assert_eq!(setup.fx.program.relation_ids().count(), 1);
}

#[test]
fn if_chain_selects_by_parameter_default() {
    let mut setup = Setup::new();
    let body = setup.body();
    let condition = setup.fx.program.ident_expr("cascade", SPAN);
    let (_, then_block) = setup
        .fx
        .program
        .add_compound_statement(body, StmtKind::If, Some(condition), SPAN);
    setup.append_function(then_block, "owned$child");
    let (_, else_block) = setup
        .fx
        .program
        .add_compound_statement(body, StmtKind::Else, None, SPAN);
    setup.append_function(else_block, "shared$child");
    let statement = setup.relation("Link", &[]);

    setup.execute(statement).unwrap();

    assert!(setup.has_method(setup.a, "sharedB"));
    assert!(!setup.has_method(setup.a, "ownedB"));
}

#[test]
fn generator_variables_feed_expansion() {
    let mut setup = Setup::new();
    let body = setup.body();
    let target = setup.fx.program.ident_expr("label", SPAN);
    let value = setup.fx.program.string_expr("Kid", SPAN);
    let assignment = setup
        .fx
        .program
        .new_expr(ExprKind::Equals, &[target, value], SPAN);
    setup
        .fx
        .program
        .add_statement(body, StmtKind::Assign, Some(assignment), SPAN);
    setup.append_function(body, "each$label");
    let statement = setup.relation("Link", &[]);

    setup.execute(statement).unwrap();

    assert!(setup.has_method(setup.a, "eachKid"));
}

#[test]
fn callee_must_be_a_transformer() {
    let mut setup = Setup::new();
    let root = setup.fx.program.root_block();
    setup
        .fx
        .program
        .add_function(root, "plain", FuncKind::Plain, Linkage::Module, SPAN);
    let statement = setup.relation("plain", &[]);

    let error = setup.execute(statement).unwrap_err();
    assert_eq!(error.code, ErrorCode::E4001);
}

#[test]
fn unknown_fragment_is_reported() {
    let mut setup = Setup::new();
    let body = setup.body();
    setup.append_function(body, "get$sibling");
    let statement = setup.relation("Link", &[]);

    let error = setup.execute(statement).unwrap_err();
    assert_eq!(error.code, ErrorCode::E4001);
    assert!(error.message.contains("$sibling"));
}

#[test]
fn other_statements_are_rejected() {
    let mut setup = Setup::new();
    let body = setup.body();
    let list = setup.fx.program.new_expr(ExprKind::List, &[], SPAN);
    setup
        .fx
        .program
        .add_statement(body, StmtKind::Print, Some(list), SPAN);
    let statement = setup.relation("Link", &[]);

    let error = setup.execute(statement).unwrap_err();
    assert_eq!(error.code, ErrorCode::E4002);
}
