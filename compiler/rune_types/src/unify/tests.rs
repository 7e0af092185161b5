#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use pretty_assertions::assert_eq;
use rune_ir::{Program, Span, TemplateId};

fn tree_template(program: &mut Program, pool: &mut Pool) -> (TemplateId, TypeId) {
    let root = program.root_block();
    let constructor = program.add_constructor(root, "Tree", Span::DUMMY);
    let template = program.function(constructor).template.unwrap();
    let class = program.create_class(template, Vec::new());
    (template, pool.class(class, template))
}

#[test]
fn unify_identical_types() {
    let mut pool = Pool::new();
    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(TypeId::U32, TypeId::U32), Ok(TypeId::U32));
    assert_eq!(engine.unify(TypeId::STRING, TypeId::STRING), Ok(TypeId::STRING));
}

#[test]
fn unify_different_primitives_fails() {
    let mut pool = Pool::new();
    let mut engine = UnifyEngine::new(&mut pool);
    let result = engine.unify(TypeId::U32, TypeId::I32);
    assert_eq!(
        result,
        Err(UnifyError::Mismatch {
            expected: TypeId::U32,
            found: TypeId::I32,
            context: UnifyContext::TopLevel,
        })
    );
}

#[test]
fn placeholder_joins_class_of_its_template() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = tree_template(&mut program, &mut pool);
    let placeholder = pool.null_placeholder(template);
    let nullable = pool.set_nullable(class, true).unwrap();

    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(placeholder, class), Ok(nullable));
    assert_eq!(engine.unify(class, placeholder), Ok(nullable));
}

#[test]
fn placeholder_rejects_other_templates() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, _) = tree_template(&mut program, &mut pool);
    let root = program.root_block();
    let other = program.add_constructor(root, "Leaf", Span::DUMMY);
    let other_template = program.function(other).template.unwrap();
    let other_class = program.create_class(other_template, Vec::new());
    let leaf = pool.class(other_class, other_template);
    let placeholder = pool.null_placeholder(template);

    let mut engine = UnifyEngine::new(&mut pool);
    assert!(matches!(
        engine.unify(placeholder, leaf),
        Err(UnifyError::Mismatch { .. })
    ));
}

#[test]
fn nullable_wins_for_same_class() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (_, class) = tree_template(&mut program, &mut pool);
    let nullable = pool.set_nullable(class, true).unwrap();
    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(class, nullable), Ok(nullable));
    assert_eq!(engine.unify(nullable, class), Ok(nullable));
}

#[test]
fn secret_wins_when_otherwise_equal() {
    let mut pool = Pool::new();
    let secret = pool.set_secret(TypeId::U64, true);
    let secret_bool = pool.set_secret(TypeId::BOOL, true);
    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(TypeId::U64, secret), Ok(secret));
    assert_eq!(engine.unify(secret, TypeId::U64), Ok(secret));

    assert_eq!(
        engine.unify(secret, secret_bool),
        Err(UnifyError::Mismatch {
            expected: secret,
            found: secret_bool,
            context: UnifyContext::TopLevel,
        })
    );
}

#[test]
fn arrays_unify_elementwise() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = tree_template(&mut program, &mut pool);
    let placeholder = pool.null_placeholder(template);
    let open = pool.array(placeholder);
    let closed = pool.array(class);
    let nullable = pool.set_nullable(class, true).unwrap();
    let expected = pool.array(nullable);
    let strings = pool.array(TypeId::STRING);

    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(open, closed), Ok(expected));

    let err = engine.unify(closed, strings).unwrap_err();
    assert_eq!(err.context(), UnifyContext::ArrayElement);
}

#[test]
fn tuples_unify_pairwise() {
    let mut pool = Pool::new();
    let secret = pool.set_secret(TypeId::U8, true);
    let a = pool.tuple(&[TypeId::U8, TypeId::STRING]);
    let b = pool.tuple(&[secret, TypeId::STRING]);
    let short = pool.tuple(&[TypeId::U8]);
    let wrong = pool.tuple(&[TypeId::U8, TypeId::BOOL]);

    let mut engine = UnifyEngine::new(&mut pool);
    assert_eq!(engine.unify(a, b), Ok(b));
    assert_eq!(
        engine.unify(a, short),
        Err(UnifyError::ArityMismatch {
            expected: 2,
            found: 1,
            context: UnifyContext::TopLevel,
        })
    );
    let err = engine.unify(a, wrong).unwrap_err();
    assert_eq!(err.context(), UnifyContext::tuple_elem(1));
    assert_eq!(err.to_string(), "type mismatch in tuple element");
}

#[test]
fn unify_is_commutative_and_idempotent() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = tree_template(&mut program, &mut pool);
    let placeholder = pool.null_placeholder(template);
    let secret = pool.set_secret(TypeId::I32, true);
    let array = pool.array(TypeId::I32);
    let secret_array = pool.array(secret);
    let types = [
        TypeId::I32,
        secret,
        array,
        secret_array,
        class,
        placeholder,
        TypeId::STRING,
    ];

    let mut engine = UnifyEngine::new(&mut pool);
    for &a in &types {
        assert_eq!(engine.unify(a, a), Ok(a));
        for &b in &types {
            let forward = engine.unify(a, b).ok();
            let backward = engine.unify(b, a).ok();
            assert_eq!(forward, backward, "unify({a:?}, {b:?})");
        }
    }
}
