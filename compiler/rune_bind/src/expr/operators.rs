//! Arithmetic, logical, comparison and range operators.
//!
//! Binary operators join their operand types first. An integer literal
//! written without a width adopts the other operand's integer type, so
//! `n - 1` has the type of `n`. Secrecy is sticky: a result is secret if
//! either operand is.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, TypeId};
use rune_types::Tag;

use crate::binder::Binder;
use crate::error::BindResult;
use crate::printf;

/// Join two operand types, letting an unsized integer literal on either
/// side take the other side's type.
pub(super) fn join_types(
    b: &mut Binder<'_>,
    (left, left_autocast): (TypeId, bool),
    (right, right_autocast): (TypeId, bool),
) -> Option<TypeId> {
    if left == right {
        return Some(left);
    }
    let both_integer = b.pool.is_integer(left) && b.pool.is_integer(right);
    if both_integer && left_autocast {
        return Some(right);
    }
    if both_integer && right_autocast {
        return Some(left);
    }
    b.unify(left, right).ok()
}

/// Join the types of two operands of `expr`. The autocast side is retyped
/// to the joined type.
pub(super) fn unify_operands(
    b: &mut Binder<'_>,
    expr: ExprId,
    left: ExprId,
    right: ExprId,
    message: &str,
) -> Result<TypeId, Diagnostic> {
    let left_type = b.expr_type(left)?;
    let right_type = b.expr_type(right)?;
    let left_autocast = b.program.expr(left).autocast;
    let right_autocast = b.program.expr(right).autocast;
    let Some(joined) = join_types(b, (left_type, left_autocast), (right_type, right_autocast)) else {
        return Err(b.mismatch(expr, message, left_type, right_type));
    };
    for (operand, autocast) in [(left, left_autocast), (right, right_autocast)] {
        if autocast {
            let public = b.pool.set_secret(joined, false);
            b.program.expr_mut(operand).datatype = Some(public);
        }
    }
    if left_autocast && right_autocast {
        b.program.expr_mut(expr).autocast = true;
    }
    Ok(joined)
}

pub(super) fn binary_operands(b: &Binder<'_>, expr: ExprId) -> Result<(ExprId, ExprId), Diagnostic> {
    match b.program.expr(expr).children[..] {
        [left, right] => Ok((left, right)),
        _ => Err(b.error_at(ErrorCode::E9001, expr, "binary operator needs two operands")),
    }
}

pub(super) fn unary_operand(b: &Binder<'_>, expr: ExprId) -> Result<ExprId, Diagnostic> {
    b.program
        .first_child(expr)
        .ok_or_else(|| b.error_at(ErrorCode::E9001, expr, "operator needs an operand"))
}

fn any_secret(b: &Binder<'_>, types: &[TypeId]) -> bool {
    types.iter().any(|&ty| b.pool.is_secret(ty))
}

fn symbol(kind: ExprKind) -> &'static str {
    kind.operator_symbol().unwrap_or("operator")
}

fn operand_kind_error(b: &Binder<'_>, expr: ExprId, kind: ExprKind, datatype: TypeId) -> Diagnostic {
    b.error_at(
        ErrorCode::E2002,
        expr,
        format!(
            "`{}` cannot be applied to `{}`",
            symbol(kind),
            b.type_name(datatype)
        ),
    )
}

/// `+ - * /`, the truncating forms, and bitwise `& | @`.
pub(super) fn bind_arithmetic(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    if kind == ExprKind::BitOr && b.program.expr(left).is_type && b.program.expr(right).is_type {
        // A type union such as `u32 | string`.
        let datatype = b.expr_type(left)?;
        return b.set_type_value(expr, datatype);
    }
    let joined = unify_operands(b, expr, left, right, "operands must have the same type")?;
    let tag = b.pool.tag(joined);
    let allowed = match kind {
        ExprKind::Add => tag.is_number() || matches!(tag, Tag::String | Tag::Array),
        ExprKind::Sub | ExprKind::Mul | ExprKind::Div => tag.is_number(),
        ExprKind::AddTrunc | ExprKind::SubTrunc | ExprKind::MulTrunc => tag.is_integer(),
        _ => tag.is_integer() || tag == Tag::Bool,
    };
    if !allowed {
        return Err(operand_kind_error(b, expr, kind, joined));
    }
    let secret = any_secret(b, &[b.expr_type(left)?, b.expr_type(right)?]);
    let datatype = b.pool.set_secret(joined, secret);
    b.set_type(expr, datatype)
}

/// `%` is the remainder on numbers and formatting on a string.
pub(super) fn bind_mod(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    if b.tag(left)? == Tag::String {
        printf::verify_format_expr(b, expr, left, right)?;
        return b.set_type(expr, TypeId::STRING);
    }
    let joined = unify_operands(b, expr, left, right, "operands must have the same type")?;
    if !b.pool.is_number(joined) {
        return Err(operand_kind_error(b, expr, ExprKind::Mod, joined));
    }
    b.set_type(expr, joined)
}

/// `&& || ^^`.
pub(super) fn bind_logical(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let types = [b.expr_type(left)?, b.expr_type(right)?];
    for (operand, datatype) in [left, right].into_iter().zip(types) {
        if b.pool.tag(datatype) != Tag::Bool {
            let kind = b.program.expr(expr).kind;
            return Err(operand_kind_error(b, operand, kind, datatype));
        }
    }
    let datatype = b.pool.set_secret(TypeId::BOOL, any_secret(b, &types));
    b.set_type(expr, datatype)
}

/// An unsigned, public amount for shifts, rotations and exponents.
pub(super) fn require_public_uint(b: &Binder<'_>, operand: ExprId, what: &str) -> Result<(), Diagnostic> {
    let datatype = b.expr_type(operand)?;
    if b.pool.tag(datatype) != Tag::Uint {
        return Err(b.error_at(
            ErrorCode::E2002,
            operand,
            format!("{what} must be an unsigned integer, found `{}`", b.type_name(datatype)),
        ));
    }
    if b.pool.is_secret(datatype) {
        return Err(b.error_at(ErrorCode::E2005, operand, format!("{what} cannot be secret")));
    }
    Ok(())
}

/// `<< >> <<< >>>`.
pub(super) fn bind_shift(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let datatype = b.expr_type(left)?;
    if !b.pool.is_integer(datatype) {
        let kind = b.program.expr(expr).kind;
        return Err(operand_kind_error(b, left, kind, datatype));
    }
    require_public_uint(b, right, "shift distance")?;
    b.set_type(expr, datatype)
}

/// `**`: integer or modular base, public unsigned exponent.
pub(super) fn bind_exponent(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let datatype = b.expr_type(left)?;
    if !b.pool.is_integer(datatype) {
        return Err(operand_kind_error(b, left, ExprKind::Exp, datatype));
    }
    require_public_uint(b, right, "exponent")?;
    b.set_type(expr, datatype)
}

/// `< <= > >=` on numbers, strings and arrays.
pub(super) fn bind_relational(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let joined = unify_operands(b, expr, left, right, "compared values must have the same type")?;
    let tag = b.pool.tag(joined);
    if !(tag.is_number() || matches!(tag, Tag::String | Tag::Array)) {
        let kind = b.program.expr(expr).kind;
        return Err(operand_kind_error(b, expr, kind, joined));
    }
    let datatype = b.pool.set_secret(TypeId::BOOL, b.pool.is_secret(joined));
    b.set_type(expr, datatype)
}

/// `== !=` on any two values of one type.
pub(super) fn bind_equality(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let joined = unify_operands(b, expr, left, right, "compared values must have the same type")?;
    let datatype = b.pool.set_secret(TypeId::BOOL, b.pool.is_secret(joined));
    b.set_type(expr, datatype)
}

/// `-x`, `!-x`, `~x` and `!x`.
pub(super) fn bind_unary(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind) -> BindResult {
    let operand = unary_operand(b, expr)?;
    let datatype = b.expr_type(operand)?;
    let tag = b.pool.tag(datatype);
    let allowed = match kind {
        ExprKind::Not => tag == Tag::Bool,
        ExprKind::Negate => tag.is_number(),
        _ => tag.is_integer(),
    };
    if !allowed {
        return Err(operand_kind_error(b, expr, kind, datatype));
    }
    b.program.expr_mut(expr).autocast = b.program.expr(operand).autocast;
    b.set_type(expr, datatype)
}

/// `c ? a : b`.
pub(super) fn bind_select(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let [condition, then, otherwise] = b.program.expr(expr).children[..] else {
        return Err(b.error_at(ErrorCode::E9001, expr, "select needs three operands"));
    };
    let condition_type = b.expr_type(condition)?;
    if b.pool.tag(condition_type) != Tag::Bool {
        return Err(b.error_at(
            ErrorCode::E2002,
            condition,
            format!("select condition must be bool, found `{}`", b.type_name(condition_type)),
        ));
    }
    let joined = unify_operands(b, expr, then, otherwise, "select branches must have the same type")?;
    let datatype = b.pool.set_secret(joined, b.pool.is_secret(condition_type) || b.pool.is_secret(joined));
    b.set_type(expr, datatype)
}

/// `a in b`.
pub(super) fn bind_in(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let types = [b.expr_type(left)?, b.expr_type(right)?];
    let datatype = b.pool.set_secret(TypeId::BOOL, any_secret(b, &types));
    b.set_type(expr, datatype)
}

/// `a ... b`: a range of integers, or of integer types such as
/// `u1 ... u32`.
pub(super) fn bind_range(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let left_type = b.expr_type(left)?;
    let right_type = b.expr_type(right)?;
    let (left_tag, right_tag) = (b.pool.tag(left_type), b.pool.tag(right_type));
    if left_tag != right_tag || !matches!(left_tag, Tag::Uint | Tag::Int) {
        return Err(b.mismatch(
            expr,
            "range bounds must both be signed or both be unsigned integers",
            left_type,
            right_type,
        ));
    }
    let both_types = b.program.expr(left).is_type && b.program.expr(right).is_type;
    if both_types && b.pool.width(left_type) > b.pool.width(right_type) {
        return Err(b.error_at(
            ErrorCode::E2002,
            expr,
            format!(
                "type range `{} ... {}` has decreasing widths",
                b.type_name(left_type),
                b.type_name(right_type)
            ),
        ));
    }
    if both_types {
        return b.set_type_value(expr, left_type);
    }
    b.set_type(expr, left_type)
}
