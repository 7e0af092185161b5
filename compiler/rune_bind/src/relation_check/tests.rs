#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rune_ir::{FuncKind, FunctionId, Linkage, MemberRelation, Span};

use super::*;
use crate::test_helpers::Fixture;

fn template(fx: &mut Fixture, name: &str) -> TemplateId {
    let root = fx.program.root_block();
    let constructor = fx.program.add_constructor(root, name, Span::default());
    fx.program.function(constructor).template.unwrap()
}

fn generator(fx: &mut Fixture) -> FunctionId {
    let root = fx.program.root_block();
    fx.program
        .add_function(root, "Link", FuncKind::Transformer, Linkage::Module, Span::default())
}

fn relate(fx: &mut Fixture, link: FunctionId, parent: TemplateId, child: TemplateId, cascade: bool) {
    fx.program
        .create_relation(link, parent, child, String::new(), String::new(), cascade);
}

fn check(fx: &mut Fixture) -> Result<(), Diagnostic> {
    check_relation_loops(&fx.binder())
}

#[test]
fn tree_of_cascade_relations_is_accepted() {
    let mut fx = Fixture::new();
    let link = generator(&mut fx);
    let a = template(&mut fx, "A");
    let b = template(&mut fx, "B");
    let c = template(&mut fx, "C");
    relate(&mut fx, link, a, b, true);
    relate(&mut fx, link, a, c, true);
    relate(&mut fx, link, b, c, true);
    assert!(check(&mut fx).is_ok());
}

#[test]
fn plain_relation_back_to_a_counted_class_is_a_loop() {
    let mut fx = Fixture::new();
    let link = generator(&mut fx);
    let a = template(&mut fx, "A");
    let b = template(&mut fx, "B");
    relate(&mut fx, link, a, b, true);
    relate(&mut fx, link, b, a, false);

    let error = check(&mut fx).unwrap_err();
    assert_eq!(error.code, ErrorCode::E4004);
    assert_eq!(
        error.message,
        "relation loop contains reference-counted class `A`: A -> B -> A"
    );
}

#[test]
fn loop_of_owned_classes_is_accepted() {
    let mut fx = Fixture::new();
    let link = generator(&mut fx);
    let root = template(&mut fx, "Root");
    let b = template(&mut fx, "B");
    let c = template(&mut fx, "C");
    relate(&mut fx, link, root, b, true);
    relate(&mut fx, link, b, c, true);
    relate(&mut fx, link, c, b, true);
    assert!(check(&mut fx).is_ok());
}

#[test]
fn plain_relations_between_counted_classes_form_a_loop() {
    let mut fx = Fixture::new();
    let link = generator(&mut fx);
    let a = template(&mut fx, "A");
    let b = template(&mut fx, "B");
    let c = template(&mut fx, "C");
    relate(&mut fx, link, a, b, false);
    relate(&mut fx, link, b, c, false);
    relate(&mut fx, link, c, a, false);

    let error = check(&mut fx).unwrap_err();
    assert_eq!(
        error.message,
        "relation loop contains reference-counted class `A`: A -> B -> C -> A"
    );
}

#[test]
fn member_of_its_own_class_is_a_loop() {
    let mut fx = Fixture::new();
    let (node, _) = fx.class_type("Node");
    let class = fx.program.template(node).classes[0];
    let block = fx.program.class(class).sub_block;
    let next = fx.program.intern("next");
    let variable = fx.program.add_local(block, next, false, Span::default());
    fx.program
        .class_mut(class)
        .member_relations
        .push(MemberRelation { variable, child: class });

    let error = check(&mut fx).unwrap_err();
    assert_eq!(
        error.message,
        "relation loop contains reference-counted class `Node`: Node -> Node"
    );
}

#[test]
fn member_pointing_back_at_the_owner_is_a_loop() {
    let mut fx = Fixture::new();
    let link = generator(&mut fx);
    let (list, _) = fx.class_type("List");
    let (entry, _) = fx.class_type("Entry");
    relate(&mut fx, link, list, entry, true);
    let list_class = fx.program.template(list).classes[0];
    let entry_class = fx.program.template(entry).classes[0];
    let block = fx.program.class(entry_class).sub_block;
    let owner = fx.program.intern("owner");
    let variable = fx.program.add_local(block, owner, false, Span::default());
    fx.program
        .class_mut(entry_class)
        .member_relations
        .push(MemberRelation { variable, child: list_class });

    let error = check(&mut fx).unwrap_err();
    assert_eq!(
        error.message,
        "relation loop contains reference-counted class `List`: List -> Entry -> List"
    );
}
