#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{ExprKind, FuncKind, Linkage, Span, StmtKind, TypeId};
use pretty_assertions::assert_eq;

fn func(program: &mut Program, name: &str) -> FunctionId {
    let root = program.root_block();
    program.add_function(root, name, FuncKind::Plain, Linkage::Module, Span::DUMMY)
}

#[test]
fn main_owns_root_block() {
    let program = Program::new();
    let main = program.main_function();
    assert_eq!(program.function(main).sub_block, program.root_block());
    assert_eq!(program.function_name(main), "main");
    assert_eq!(program.function(main).kind, FuncKind::Module);
}

#[test]
fn find_ident_walks_outward() {
    let mut program = Program::new();
    let fact = func(&mut program, "fact");
    let n = program.add_parameter(fact, "n", Span::DUMMY);
    let body = program.function(fact).sub_block;
    let (_, then_block) =
        program.add_compound_statement(body, StmtKind::If, None, Span::DUMMY);

    let n_name = program.intern("n");
    let fact_name = program.intern("fact");
    let found = program.find_ident(then_block, n_name).unwrap();
    assert_eq!(program.ident_variable(found), Some(n));
    let found = program.find_ident(then_block, fact_name).unwrap();
    assert_eq!(program.ident_function(found), Some(fact));
    assert_eq!(program.find_ident(then_block, program.intern("missing")), None);
}

#[test]
fn parameters_precede_locals() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let local_name = program.intern("tmp");
    let local = program.add_local(body, local_name, false, Span::DUMMY);
    let param = program.add_parameter(f, "x", Span::DUMMY);
    assert_eq!(program.block(body).variables, vec![param, local]);
}

#[test]
fn locals_go_to_scope_block() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let (_, inner) = program.add_compound_statement(body, StmtKind::While, None, Span::DUMMY);
    let name = program.intern("i");
    let local = program.add_local(inner, name, false, Span::DUMMY);
    assert_eq!(program.variable(local).block, body);
}

#[test]
fn undefined_ident_upgrades_in_place() {
    let mut program = Program::new();
    let root = program.root_block();
    let name = program.intern("later");
    let undefined = program.create_undefined_ident(root, name);
    assert_eq!(program.ident(undefined).target, IdentTarget::Undefined);

    let later = func(&mut program, "later");
    let found = program.find_ident(root, name).unwrap();
    assert_eq!(found, undefined);
    assert_eq!(program.ident_function(found), Some(later));
    assert_eq!(program.take_newly_defined(), vec![undefined]);
    assert!(program.take_newly_defined().is_empty());
}

#[test]
fn class_block_sees_constructor_methods() {
    let mut program = Program::new();
    let root = program.root_block();
    let constructor = program.add_constructor(root, "Point", Span::DUMMY);
    let template = program.function(constructor).template.unwrap();
    let class = program.create_class(template, Vec::new());
    let class_block = program.class(class).sub_block;

    let destroy = program.intern("destroy");
    let ident = program.find_ident_in_block(class_block, destroy).unwrap();
    let target = program.ident_function(ident).unwrap();
    assert_eq!(program.function(target).kind, FuncKind::Destructor);
    assert_eq!(program.class(class).number, 1);
    assert_eq!(program.find_class(template, &[]), Some(class));
}

#[test]
fn template_classes_keyed_by_params() {
    let mut program = Program::new();
    let root = program.root_block();
    let constructor = program.add_constructor(root, "Box", Span::DUMMY);
    let value = program.add_parameter(constructor, "value", Span::DUMMY);
    program.set_template_parameter(value);
    let template = program.function(constructor).template.unwrap();
    assert!(program.template(template).is_template);

    let a = program.create_class(template, vec![TypeId::U32]);
    let b = program.create_class(template, vec![TypeId::STRING]);
    assert_eq!(program.find_class(template, &[TypeId::STRING]), Some(b));
    assert_eq!(program.find_class(template, &[TypeId::U32]), Some(a));
    assert_eq!(program.find_class(template, &[TypeId::BOOL]), None);
    assert_eq!(program.default_class(template), None);
    assert_eq!(program.class(b).number, 2);
}

#[test]
fn signatures_are_unique_per_param_types() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    program.add_parameter(f, "x", Span::DUMMY);
    let types = vec![Some(TypeId::U32)];
    let sig = program.create_signature(f, types.clone(), Span::DUMMY, None, None);
    assert_eq!(program.lookup_signature(f, &types), Some(sig));
    assert_eq!(program.lookup_signature(f, &[Some(TypeId::I32)]), None);

    let record = program.signature(sig);
    assert_ne!(record.uniquified, f);
    assert_eq!(record.params.len(), 1);
    assert_eq!(program.signature_param_types(sig), types);
    assert_eq!(program.function(record.uniquified).uniquified_for, Some(sig));

    let other = program.create_signature(f, vec![Some(TypeId::I32)], Span::DUMMY, None, None);
    assert_eq!(program.signature(other).number, 1);
}

#[test]
fn module_signature_binds_its_own_body() {
    let mut program = Program::new();
    let main = program.main_function();
    let sig = program.create_signature(main, Vec::new(), Span::DUMMY, None, None);
    assert_eq!(program.signature(sig).uniquified, main);
    assert_eq!(program.signature_block(sig), program.root_block());
}

#[test]
fn uniquified_body_is_independent() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let one = program.int_expr(1, None, false, Span::DUMMY);
    program.add_statement(body, StmtKind::Return, Some(one), Span::DUMMY);

    let sig = program.create_signature(f, Vec::new(), Span::DUMMY, None, None);
    let copy_block = program.signature_block(sig);
    assert_ne!(copy_block, body);
    let copied = program.block(copy_block).statements[0];
    let copied_expr = program.statement(copied).expr.unwrap();
    assert_ne!(copied_expr, one);
    assert_eq!(program.expr(copied_expr).kind, ExprKind::Integer);
    assert_eq!(program.expr_statement(copied_expr), Some(copied));
}

#[test]
fn reachability_of_returning_branches() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let cond = program.bool_expr(true, Span::DUMMY);
    let (_, then_block) = program.add_compound_statement(body, StmtKind::If, Some(cond), Span::DUMMY);
    program.add_statement(then_block, StmtKind::Return, None, Span::DUMMY);
    let (_, else_block) = program.add_compound_statement(body, StmtKind::Else, None, Span::DUMMY);
    program.add_statement(else_block, StmtKind::Return, None, Span::DUMMY);

    program.compute_reachability(body).unwrap();
    assert!(!program.block(body).can_continue);
    assert!(program.block(body).can_return);

    let dead = program.add_statement(body, StmtKind::Print, None, Span::DUMMY);
    assert_eq!(program.compute_reachability(body), Err(UnreachableStatement(dead)));
}

#[test]
fn switch_without_default_can_continue() {
    let mut program = Program::new();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let (_, cases) = program.add_compound_statement(body, StmtKind::Switch, None, Span::DUMMY);
    let (_, case_block) = program.add_compound_statement(cases, StmtKind::Case, None, Span::DUMMY);
    program.add_statement(case_block, StmtKind::Return, None, Span::DUMMY);

    program.compute_reachability(body).unwrap();
    assert!(program.block(body).can_continue);
    assert!(program.block(body).can_return);
}

#[test]
fn append_block_moves_statements_and_variables() {
    let mut program = Program::new();
    let root = program.root_block();
    let f = func(&mut program, "f");
    let body = program.function(f).sub_block;
    let name = program.intern("x");
    program.add_local(body, name, false, Span::DUMMY);
    let print = program.add_statement(body, StmtKind::Print, None, Span::DUMMY);

    let copy = program.copy_block(body);
    program.append_block_to_block(copy, root);
    let last = *program.block(root).statements.last().unwrap();
    assert_ne!(last, print);
    assert_eq!(program.statement(last).kind, StmtKind::Print);
    assert_eq!(program.statement(last).block, root);
    let found = program.find_ident_in_block(root, name).unwrap();
    assert!(program.ident_variable(found).is_some());
    assert!(program.block(copy).destroyed);
}

#[test]
fn destroying_template_contents_drops_relations() {
    let mut program = Program::new();
    let root = program.root_block();
    let main = program.main_function();
    let a = program.add_constructor(root, "A", Span::DUMMY);
    let b = program.add_constructor(root, "B", Span::DUMMY);
    let ta = program.function(a).template.unwrap();
    let tb = program.function(b).template.unwrap();
    let relation = program.create_relation(main, ta, tb, String::new(), String::new(), true);
    let generated = program.add_statement(root, StmtKind::Print, None, Span::DUMMY);
    program.relation_mut(relation).statements.push(generated);

    let old_body = program.function(b).sub_block;
    program.destroy_template_contents(tb);
    assert!(program.block(old_body).destroyed);
    assert!(!program.block(program.function(b).sub_block).destroyed);
    assert!(program.template(ta).child_relations.is_empty());
    assert!(program.statement(generated).destroyed);
    assert!(!program.block(root).statements.contains(&generated));
}
