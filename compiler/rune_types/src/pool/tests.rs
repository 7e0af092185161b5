#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::TypeError;
use pretty_assertions::assert_eq;
use rune_ir::{ExprKind, FuncKind, Linkage, Program, Span};

fn class_fixture(program: &mut Program, pool: &mut Pool, name: &str) -> (TemplateId, TypeId) {
    let root = program.root_block();
    let constructor = program.add_constructor(root, name, Span::DUMMY);
    let template = program.function(constructor).template.unwrap();
    let class = program.create_class(template, Vec::new());
    (template, pool.class(class, template))
}

#[test]
fn primitives_at_reserved_ids() {
    let pool = Pool::new();
    assert_eq!(pool.len(), TypeId::FIRST_DYNAMIC as usize);
    assert_eq!(pool.tag(TypeId::NONE), Tag::None);
    assert_eq!(pool.tag(TypeId::STRING), Tag::String);
    assert_eq!(pool.width(TypeId::U8), Some(8));
    assert_eq!(pool.width(TypeId::I64), Some(64));
    assert_eq!(pool.width(TypeId::F32), Some(32));
}

#[test]
fn interning_is_structural() {
    let mut pool = Pool::new();
    let a = pool.tuple(&[TypeId::U32, TypeId::STRING]);
    let b = pool.tuple(&[TypeId::U32, TypeId::STRING]);
    let c = pool.tuple(&[TypeId::STRING, TypeId::U32]);
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(pool.uint(32), TypeId::U32);
    assert_eq!(pool.array(TypeId::U8), pool.array(TypeId::U8));
}

#[test]
fn modifiers_are_part_of_identity() {
    let mut pool = Pool::new();
    let secret = pool.set_secret(TypeId::U32, true);
    assert_ne!(secret, TypeId::U32);
    assert!(pool.is_secret(secret));
    assert_eq!(pool.set_secret(secret, false), TypeId::U32);
    assert!(pool.equivalent(secret, TypeId::U32));
}

#[test]
fn concreteness_follows_members() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = class_fixture(&mut program, &mut pool, "Point");
    let template_ty = pool.template(template);
    assert!(pool.is_concrete(class));
    assert!(!pool.is_concrete(template_ty));

    let concrete_array = pool.array(class);
    let open_array = pool.array(template_ty);
    assert!(pool.is_concrete(concrete_array));
    assert!(!pool.is_concrete(open_array));

    let open_tuple = pool.tuple(&[TypeId::U32, template_ty]);
    assert!(!pool.is_concrete(open_tuple));
}

#[test]
fn contains_array_propagates() {
    let mut pool = Pool::new();
    let tuple = pool.tuple(&[TypeId::BOOL, TypeId::STRING]);
    assert!(pool.contains_array(tuple));
    let plain = pool.tuple(&[TypeId::BOOL, TypeId::U64]);
    assert!(!pool.contains_array(plain));
}

#[test]
fn float_widths() {
    let mut pool = Pool::new();
    assert_eq!(pool.float(64), Ok(TypeId::F64));
    assert_eq!(
        pool.float(16),
        Err(TypeError::InvalidWidth {
            tag: Tag::Float,
            width: 16
        })
    );
}

#[test]
fn struct_rejects_open_fields() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, _) = class_fixture(&mut program, &mut pool, "Node");
    let root = program.root_block();
    let function = program.add_function(root, "Pair", FuncKind::Struct, Linkage::Module, Span::DUMMY);
    let open = pool.template(template);
    let err = pool.struct_type(function, &[TypeId::U32, open]).unwrap_err();
    assert_eq!(err, TypeError::NonConcreteField { index: 1, field: open });
    assert!(pool.struct_type(function, &[TypeId::U32]).is_ok());
}

#[test]
fn nullable_only_on_objects() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = class_fixture(&mut program, &mut pool, "Tree");
    let nullable = pool.set_nullable(class, true).unwrap();
    assert!(pool.is_nullable(nullable));
    assert!(pool.is_concrete(nullable));

    let placeholder = pool.null_placeholder(template);
    assert!(pool.is_null_placeholder(placeholder));
    assert_eq!(pool.set_nullable(placeholder, false).unwrap(), pool.template(template));

    assert!(pool.set_nullable(TypeId::U32, true).is_err());
    assert_eq!(pool.set_nullable(TypeId::U32, false), Ok(TypeId::U32));
}

#[test]
fn sign_changes_keep_width_and_secrecy() {
    let mut pool = Pool::new();
    let secret = pool.set_secret(TypeId::U32, true);
    let signed = pool.set_signed(secret, true).unwrap();
    assert_eq!(pool.tag(signed), Tag::Int);
    assert_eq!(pool.width(signed), Some(32));
    assert!(pool.is_secret(signed));
    assert!(pool.set_signed(TypeId::STRING, true).is_err());
}

#[test]
fn format_source_spelling() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = class_fixture(&mut program, &mut pool, "Point");
    let array = pool.array(TypeId::U8);
    let secret = pool.set_secret(TypeId::I64, true);
    let tuple = pool.tuple(&[TypeId::U32, secret]);
    let funcptr = pool.funcptr(TypeId::BOOL, &[class]);
    let placeholder = pool.null_placeholder(template);

    assert_eq!(pool.format_type(&program, array), "[u8]");
    assert_eq!(pool.format_type(&program, tuple), "(u32, secret(i64))");
    assert_eq!(pool.format_type(&program, funcptr), "func(Point) -> bool");
    assert_eq!(pool.format_type(&program, placeholder), "null(Point)");
    assert_eq!(pool.format_type(&program, TypeId::NONE), "none");
}

#[test]
fn format_template_class_params() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let root = program.root_block();
    let constructor = program.add_constructor(root, "Box", Span::DUMMY);
    let template = program.function(constructor).template.unwrap();
    let class = program.create_class(template, vec![TypeId::U32, TypeId::STRING]);
    let ty = pool.class(class, template);
    assert_eq!(pool.format_type(&program, ty), "Box(u32, string)");
}

#[test]
fn unique_concrete_of_default_template() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let (template, class) = class_fixture(&mut program, &mut pool, "Point");
    let placeholder = pool.null_placeholder(template);
    let resolved = pool.find_unique_concrete(&program, placeholder).unwrap();
    assert_eq!(pool.class_of(resolved), pool.class_of(class));
    assert!(pool.is_nullable(resolved));

    let open = pool.template(template);
    let tuple = pool.tuple(&[open, TypeId::U8]);
    let concrete = pool.find_unique_concrete(&program, tuple).unwrap();
    assert_eq!(pool.type_list(concrete), &[class, TypeId::U8]);
}

#[test]
fn unique_concrete_of_parameterized_template_is_none() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let root = program.root_block();
    let constructor = program.add_constructor(root, "List", Span::DUMMY);
    let param = program.add_parameter(constructor, "value", Span::DUMMY);
    program.set_template_parameter(param);
    let template = program.function(constructor).template.unwrap();
    let open = pool.template(template);
    assert_eq!(pool.find_unique_concrete(&program, open), None);
}

#[test]
fn enum_width_from_first_entry() {
    let mut program = Program::new();
    let mut pool = Pool::new();
    let root = program.root_block();
    let function = program.add_function(root, "Color", FuncKind::Enum, Linkage::Module, Span::DUMMY);
    let block = program.function(function).sub_block;
    let red = program.intern("Red");
    let variable = program.add_local(block, red, false, Span::DUMMY);
    program.variable_mut(variable).datatype = Some(TypeId::U8);
    let enum_class = pool.enum_class(function);
    let value = pool.find_unique_concrete(&program, enum_class).unwrap();
    assert_eq!(pool.tag(value), Tag::Enum);
    assert_eq!(pool.width(value), Some(8));
    assert_eq!(pool.format_type(&program, value), "Color");

    let modulus = program.width_type_expr(ExprKind::UintType, 8, Span::DUMMY);
    let modint = pool.modint(modulus, 256);
    assert_eq!(pool.modulus(modint), Some(modulus));
}
