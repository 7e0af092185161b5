#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rune_ir::{FuncKind, FunctionId, Linkage, Span, DEFAULT_REF_WIDTH};

use super::*;
use crate::test_helpers::Fixture;

fn constructor(fx: &mut Fixture, name: &str) -> (FunctionId, TemplateId) {
    let root = fx.program.root_block();
    let constructor = fx.program.add_constructor(root, name, Span::default());
    let template = fx.program.function(constructor).template.unwrap();
    (constructor, template)
}

fn method_names(fx: &Fixture, constructor: FunctionId) -> Vec<&'static str> {
    let block = fx.program.function(constructor).sub_block;
    fx.program
        .block(block)
        .functions
        .iter()
        .map(|&f| fx.program.function_name(f))
        .collect()
}

/// A bound constructor signature for the template's class.
fn constructor_signature(fx: &mut Fixture, constructor: FunctionId, template: TemplateId) -> SignatureId {
    let mut binder = fx.binder();
    let class = class_for(&mut binder, template, Vec::new());
    let signature = binder
        .program
        .create_signature(constructor, Vec::new(), Span::default(), None, None);
    binder.program.signature_mut(signature).class = Some(class);
    signature
}

#[test]
fn class_is_created_once_per_parameter_tuple() {
    let mut fx = Fixture::new();
    let (_, template) = constructor(&mut fx, "Point");
    let mut binder = fx.binder();
    let first = class_for(&mut binder, template, Vec::new());
    let again = class_for(&mut binder, template, Vec::new());
    assert_eq!(first, again);
    assert_eq!(binder.report.classes, 1);
    assert_eq!(binder.program.class(first).number, 1);
}

#[test]
fn new_class_has_next_free_member() {
    let mut fx = Fixture::new();
    let (_, template) = constructor(&mut fx, "Point");
    let class = class_for(&mut fx.binder(), template, Vec::new());
    let block = fx.program.class(class).sub_block;
    let next_free = fx.program.interner().get("nextFree").unwrap();
    let ident = fx.program.find_ident_in_block(block, next_free).unwrap();
    let variable = fx.program.ident_variable(ident).unwrap();
    let expected = fx.pool.uint(DEFAULT_REF_WIDTH);
    assert_eq!(fx.program.variable(variable).datatype, Some(expected));
    assert!(fx.program.variable(variable).generated);
}

#[test]
fn finished_constructor_returns_its_class() {
    let mut fx = Fixture::new();
    let (constructor, template) = constructor(&mut fx, "Point");
    let signature = constructor_signature(&mut fx, constructor, template);
    finish_constructor(&mut fx.binder(), signature).unwrap();

    let class = fx.program.signature(signature).class.unwrap();
    let class_type = fx.pool.class(class, template);
    assert_eq!(fx.program.signature(signature).return_type, Some(class_type));
    assert!(fx.program.signature(signature).bound);
    assert!(fx.program.class(class).bound);
}

#[test]
fn default_methods_are_generated_once() {
    let mut fx = Fixture::new();
    let (constructor, template) = constructor(&mut fx, "Point");
    let signature = constructor_signature(&mut fx, constructor, template);
    finish_constructor(&mut fx.binder(), signature).unwrap();
    finish_constructor(&mut fx.binder(), signature).unwrap();

    assert_eq!(method_names(&fx, constructor), vec!["destroy", "toString", "show"]);
    let block = fx.program.function(constructor).sub_block;
    for &method in &fx.program.block(block).functions[1..] {
        assert!(fx.program.function(method).generated);
        assert_eq!(fx.program.function(method).kind, FuncKind::Plain);
    }
}

#[test]
fn declared_to_string_is_kept() {
    let mut fx = Fixture::new();
    let (constructor, template) = constructor(&mut fx, "Point");
    let block = fx.program.function(constructor).sub_block;
    let custom = fx
        .program
        .add_function(block, "toString", FuncKind::Plain, Linkage::Module, Span::default());
    let signature = constructor_signature(&mut fx, constructor, template);
    finish_constructor(&mut fx.binder(), signature).unwrap();

    assert_eq!(method_names(&fx, constructor), vec!["destroy", "toString", "show"]);
    assert!(!fx.program.function(custom).generated);
}

#[test]
fn class_typed_members_are_recorded_on_first_bind() {
    let mut fx = Fixture::new();
    let (_, leaf) = fx.class_type("Leaf");
    let (constructor, template) = constructor(&mut fx, "Node");
    let signature = constructor_signature(&mut fx, constructor, template);
    let class = fx.program.signature(signature).class.unwrap();
    let block = fx.program.class(class).sub_block;
    let child = fx.program.intern("child");
    let member = fx.program.add_local(block, child, false, Span::default());
    fx.program.variable_mut(member).datatype = Some(leaf);
    let count = fx.program.intern("count");
    let plain = fx.program.add_local(block, count, false, Span::default());
    fx.program.variable_mut(plain).datatype = Some(rune_ir::TypeId::U32);

    finish_constructor(&mut fx.binder(), signature).unwrap();

    let relations = &fx.program.class(class).member_relations;
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].variable, member);
    assert_eq!(Some(relations[0].child), fx.pool.class_of(leaf));
}
