//! Casts, secrecy, null handling and type-valued operators.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, TypeId};
use rune_types::{Tag, TypeData};

use super::operators::{binary_operands, unary_operand};
use crate::binder::Binder;
use crate::class;
use crate::error::BindResult;

/// `<T>value`. The result keeps the value's secrecy.
pub(super) fn bind_cast(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (target_expr, value) = binary_operands(b, expr)?;
    let target = b.expr_type(target_expr)?;
    let target = coerce_to_class(b, target);
    let found = b.expr_type(value)?;
    let secret = b.pool.is_secret(found);
    let target_public = b.pool.set_secret(target, false);
    let found_public = b.pool.set_secret(found, false);
    if !cast_allowed(b, target_public, found_public) {
        return Err(b.error_at(
            ErrorCode::E2004,
            expr,
            format!(
                "cannot cast `{}` to `{}`",
                b.type_name(found),
                b.type_name(target)
            ),
        ));
    }
    let datatype = b.pool.set_secret(target_public, secret);
    b.set_type(expr, datatype)
}

fn cast_allowed(b: &Binder<'_>, target: TypeId, found: TypeId) -> bool {
    if target == found {
        return true;
    }
    let (to, from) = (b.pool.tag(target), b.pool.tag(found));
    let is_bytes = |datatype| b.pool.element(datatype) == Some(TypeId::U8);
    let ref_width_matches = |integer: TypeId, object: TypeId| {
        let ref_width = b
            .pool
            .template_of(object)
            .map(|template| b.program.template(template).ref_width);
        b.pool.width(integer).is_some() && b.pool.width(integer) == ref_width
    };
    match (to, from) {
        _ if to.is_number() && from.is_number() => true,
        (Tag::Enum, Tag::Uint | Tag::Int) | (Tag::Uint | Tag::Int, Tag::Enum) => true,
        (Tag::String, Tag::Array) => is_bytes(found),
        (Tag::Array, Tag::String) => is_bytes(target),
        (Tag::Uint | Tag::Int, Tag::Class) => ref_width_matches(target, found),
        (Tag::Class, Tag::Uint | Tag::Int) => ref_width_matches(found, target),
        _ => false,
    }
}

/// A class name used as a type means its only class, when it has one.
fn coerce_to_class(b: &mut Binder<'_>, datatype: TypeId) -> TypeId {
    if b.pool.tag(datatype) != Tag::Template {
        return datatype;
    }
    b.pool
        .find_unique_concrete(b.program, datatype)
        .unwrap_or(datatype)
}

/// `signed(x)` and `unsigned(x)`.
pub(super) fn bind_sign_change(b: &mut Binder<'_>, expr: ExprId, signed: bool) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let changed = b
        .pool
        .set_signed(datatype, signed)
        .map_err(|err| b.error_at(ErrorCode::E2002, operand, err.to_string()))?;
    b.set_type(expr, changed)
}

/// `secret(x)` and `reveal(x)`. On a type, `secret(u32)` is itself a type.
pub(super) fn bind_secrecy(b: &mut Binder<'_>, expr: ExprId, secret: bool) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    if b.pool.tag(datatype).is_object() {
        let verb = if secret { "made secret" } else { "revealed" };
        return Err(b.error_at(
            ErrorCode::E2005,
            operand,
            format!("object references cannot be {verb}"),
        ));
    }
    let changed = b.pool.set_secret(datatype, secret);
    if b.program.expr(operand).is_type {
        return b.set_type_value(expr, changed);
    }
    b.set_type(expr, changed)
}

/// `null(T)`: a null reference to a `T`. Without template parameters the
/// class is known now; otherwise the result is a placeholder that a later
/// assignment refines.
pub(super) fn bind_null(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let null_type = match b.pool.data(datatype).clone() {
        TypeData::Template(template) if !b.program.template(template).is_template => {
            let class = match b.program.default_class(template) {
                Some(class) => class,
                None => class::class_for(b, template, Vec::new()),
            };
            let class_type = b.pool.class(class, template);
            nullable(b, operand, class_type)?
        }
        TypeData::Template(template) => b.pool.null_placeholder(template),
        TypeData::Class { .. } => nullable(b, operand, datatype)?,
        TypeData::None | TypeData::Modint { .. } => {
            return Err(b.error_at(
                ErrorCode::E2006,
                operand,
                format!("`null` is not defined for `{}`", b.type_name(datatype)),
            ))
        }
        _ => datatype,
    };
    b.set_type(expr, null_type)
}

fn nullable(b: &mut Binder<'_>, at: ExprId, datatype: TypeId) -> Result<TypeId, Diagnostic> {
    b.pool
        .set_nullable(datatype, true)
        .map_err(|err| b.error_at(ErrorCode::E2006, at, err.to_string()))
}

/// `notnull(x)`.
pub(super) fn bind_not_null(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let non_null = b
        .pool
        .set_nullable(datatype, false)
        .map_err(|err| b.error_at(ErrorCode::E2006, operand, err.to_string()))?;
    b.set_type(expr, non_null)
}

/// `isnull(x)` on object references.
pub(super) fn bind_isnull(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let is_reference = b.pool.tag(datatype) == Tag::Class || b.pool.is_null_placeholder(datatype);
    if !is_reference {
        return Err(b.error_at(
            ErrorCode::E2006,
            operand,
            format!("isnull expects an object reference, found `{}`", b.type_name(datatype)),
        ));
    }
    b.set_type(expr, TypeId::BOOL)
}

pub(super) fn bind_typeof(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    b.set_type_value(expr, datatype)
}

/// `arrayof(T)`: an empty array of `T`.
pub(super) fn bind_arrayof(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let element = coerce_to_class(b, datatype);
    let array = b.pool.array(element);
    b.set_type(expr, array)
}

/// `&f(args)`: a pointer to the signature the call selects.
pub(super) fn bind_funcaddr(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let call = unary_operand(b, expr)?;
    if b.program.expr(call).kind != ExprKind::Call {
        return Err(b.error_at(
            ErrorCode::E2002,
            call,
            "can only take the address of a function call",
        ));
    }
    let Some(signature) = b.program.expr(call).signature else {
        return Err(b.error_at(
            ErrorCode::E2002,
            call,
            "cannot take the address of a builtin method",
        ));
    };
    let ret = b.expr_type(call)?;
    {
        let record = b.program.signature_mut(signature);
        record.instantiated = true;
        record.called_by_funcptr = true;
    }
    let params: Vec<TypeId> = b
        .program
        .signature(signature)
        .params
        .iter()
        .map(|param| param.datatype.unwrap_or(TypeId::NONE))
        .collect();
    let datatype = b.pool.funcptr(ret, &params);
    b.set_type(expr, datatype)
}
