//! Builtin classes.
//!
//! Values of non-object types have methods declared on builtin templates
//! named after their tag (`Array`, `String`, `Uint`, ...). Builtin methods
//! have no body; their return type is computed from the receiver.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, FuncKind, FunctionId, Linkage, Program, Span, TypeId};
use rune_types::Tag;

use crate::binder::Binder;
use crate::error::BindResult;

/// Methods every builtin class has.
const COMMON_METHODS: &[(&str, &[&str])] = &[("toString", &[])];

/// Methods shared by arrays and strings.
const SEQUENCE_METHODS: &[(&str, &[&str])] = &[
    ("length", &[]),
    ("values", &[]),
    ("indices", &[]),
    ("append", &["value"]),
    ("concat", &["other"]),
    ("resize", &["length"]),
    ("reverse", &[]),
];

const SIGNED_METHODS: &[(&str, &[&str])] = &[("abs", &[])];

const BUILTIN_CLASSES: &[(&str, &[&[(&str, &[&str])]])] = &[
    ("Array", &[SEQUENCE_METHODS]),
    ("String", &[SEQUENCE_METHODS]),
    ("Uint", &[]),
    ("Int", &[SIGNED_METHODS]),
    ("Float", &[SIGNED_METHODS]),
    ("Bool", &[]),
    ("Tuple", &[]),
    ("Struct", &[]),
    ("Enum", &[]),
    ("Funcptr", &[]),
    ("Function", &[]),
    ("Modint", &[]),
];

/// Declare the builtin classes in the root block. Does nothing if they
/// are already declared.
pub fn declare_builtins(program: &mut Program) {
    let root = program.root_block();
    let declared = program
        .interner()
        .get("Array")
        .and_then(|name| program.find_ident_in_block(root, name))
        .is_some();
    if declared {
        return;
    }
    for &(class_name, method_sets) in BUILTIN_CLASSES {
        let constructor = program.add_builtin_template(root, class_name, Span::DUMMY);
        let block = program.function(constructor).sub_block;
        for &(method, params) in method_sets.iter().copied().chain([COMMON_METHODS]).flatten() {
            let kind = if matches!(method, "values" | "indices") {
                FuncKind::Iterator
            } else {
                FuncKind::Plain
            };
            let function = program.add_function(block, method, kind, Linkage::Builtin, Span::DUMMY);
            program.add_parameter(function, "self", Span::DUMMY);
            for &param in params {
                program.add_parameter(function, param, Span::DUMMY);
            }
        }
    }
    tracing::debug!(classes = BUILTIN_CLASSES.len(), "declared builtin classes");
}

/// Type a call of a builtin method on a value of type `receiver`.
pub(crate) fn bind_builtin_method(
    b: &mut Binder<'_>,
    expr: ExprId,
    function: FunctionId,
    receiver: Option<TypeId>,
    args: &[ExprId],
) -> BindResult {
    let name = b.program.function_name(function);
    let Some(receiver) = receiver else {
        return Err(b.error_at(
            ErrorCode::E3006,
            expr,
            format!("builtin method `{name}` must be called on a value"),
        ));
    };
    let arity = b
        .program
        .block(b.program.function(function).sub_block)
        .variables
        .len()
        .saturating_sub(1);
    if args.len() != arity {
        return Err(b.error_at(
            ErrorCode::E3001,
            expr,
            format!(
                "`{name}` takes {arity} argument(s), but {} were passed",
                args.len()
            ),
        ));
    }
    let datatype = match name {
        "length" | "indices" => TypeId::U64,
        "values" => element_type(b, receiver),
        "toString" => TypeId::STRING,
        "append" => {
            let element = element_type(b, receiver);
            expect_argument(b, args[0], element)?;
            TypeId::NONE
        }
        "concat" => {
            expect_argument(b, args[0], receiver)?;
            TypeId::NONE
        }
        "resize" => {
            let found = b.expr_type(args[0])?;
            if b.pool.tag(found) != Tag::Uint || b.pool.is_secret(found) {
                return Err(b.error_at(
                    ErrorCode::E2002,
                    args[0],
                    format!(
                        "length must be a public unsigned integer, found `{}`",
                        b.type_name(found)
                    ),
                ));
            }
            TypeId::NONE
        }
        "reverse" => TypeId::NONE,
        "abs" => receiver,
        _ => {
            return Err(b.error_at(
                ErrorCode::E3008,
                expr,
                format!("`{}` has no method `{name}`", b.type_name(receiver)),
            ))
        }
    };
    b.set_type(expr, datatype)
}

/// Element type of an array, or a byte of a string.
fn element_type(b: &mut Binder<'_>, sequence: TypeId) -> TypeId {
    match b.pool.element(sequence) {
        Some(element) => element,
        None => b.pool.set_secret(TypeId::U8, b.pool.is_secret(sequence)),
    }
}

fn expect_argument(b: &mut Binder<'_>, arg: ExprId, expected: TypeId) -> Result<(), Diagnostic> {
    let found = b.expr_type(arg)?;
    if found == expected {
        return Ok(());
    }
    let autocast = b.program.expr(arg).autocast && b.pool.is_integer(found) && b.pool.is_integer(expected);
    if autocast || b.unify(expected, found).is_ok() {
        return Ok(());
    }
    Err(b.mismatch(arg, "builtin method argument", expected, found))
}
