//! Constants, type keywords and aggregate literals.

use rune_diagnostic::ErrorCode;
use rune_ir::{ExprId, ExprKind, Literal, TypeId};

use super::operators::join_types;
use crate::binder::Binder;
use crate::error::BindResult;

pub(super) fn bind_integer(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let Literal::Integer {
        width,
        signed,
        autocast,
        ..
    } = b.program.expr(expr).literal
    else {
        return Err(b.error_at(ErrorCode::E9001, expr, "integer expression without a value"));
    };
    let datatype = if signed {
        b.pool.int(width)
    } else {
        b.pool.uint(width)
    };
    let record = b.program.expr_mut(expr);
    record.autocast = autocast;
    record.is_const = true;
    b.set_type(expr, datatype)
}

pub(super) fn bind_float(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let Literal::Float { width, .. } = b.program.expr(expr).literal else {
        return Err(b.error_at(ErrorCode::E9001, expr, "float expression without a value"));
    };
    let datatype = b
        .pool
        .float(width)
        .map_err(|err| b.error_at(ErrorCode::E2002, expr, err.to_string()))?;
    b.program.expr_mut(expr).is_const = true;
    b.set_type(expr, datatype)
}

/// `randuint` produces a secret random unsigned integer.
pub(super) fn bind_randuint(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let width = match b.program.expr(expr).literal {
        Literal::Width(width) => width,
        _ => 64,
    };
    let public = b.pool.uint(width);
    let datatype = b.pool.set_secret(public, true);
    b.set_type(expr, datatype)
}

pub(super) fn bind_type_keyword(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind) -> BindResult {
    let width = match b.program.expr(expr).literal {
        Literal::Width(width) => Some(width),
        _ => None,
    };
    let datatype = match kind {
        ExprKind::UintType => b.pool.uint(width.unwrap_or(64)),
        ExprKind::IntType => b.pool.int(width.unwrap_or(64)),
        ExprKind::FloatType => b
            .pool
            .float(width.unwrap_or(64))
            .map_err(|err| b.error_at(ErrorCode::E2002, expr, err.to_string()))?,
        ExprKind::StringType => TypeId::STRING,
        ExprKind::BoolType => TypeId::BOOL,
        _ => TypeId::NONE,
    };
    b.set_type_value(expr, datatype)
}

/// A tuple of types is itself a type.
pub(super) fn bind_tuple(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let children = b.program.expr(expr).children.clone();
    let mut fields = Vec::with_capacity(children.len());
    for &child in &children {
        fields.push(b.expr_type(child)?);
    }
    let datatype = b.pool.tuple(&fields);
    let all_types = !children.is_empty() && children.iter().all(|&c| b.program.expr(c).is_type);
    if all_types {
        return b.set_type_value(expr, datatype);
    }
    b.set_type(expr, datatype)
}

/// Array elements must share one type. `[T]` with a single type element is
/// the array type of `T`.
pub(super) fn bind_array(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let children = b.program.expr(expr).children.clone();
    let Some((&first, rest)) = children.split_first() else {
        return Err(b.error_at(ErrorCode::E2007, expr, "empty array literal has no element type"));
    };
    if b.program.expr(first).is_type {
        let element = b.expr_type(first)?;
        let datatype = b.pool.array(element);
        return b.set_type_value(expr, datatype);
    }
    let mut element = (b.expr_type(first)?, b.program.expr(first).autocast);
    for &child in rest {
        let next = (b.expr_type(child)?, b.program.expr(child).autocast);
        let Some(joined) = join_types(b, element, next) else {
            return Err(b.mismatch(child, "array elements must have the same type", element.0, next.0));
        };
        element = (joined, element.1 && next.1);
    }
    let element = element.0;
    let datatype = b.pool.array(element);
    b.set_type(expr, datatype)
}
