//! Modular arithmetic.
//!
//! In `expr mod p` every operator of `expr` computes modulo `p`. The
//! `Modint` node is bound before its value tree: it gives each node of the
//! tree the modular type, then each node checks its operands against that
//! preset type as it is bound.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, TypeId};
use rune_types::Tag;

use super::operators::{binary_operands, require_public_uint};
use crate::binder::Binder;
use crate::error::{BindResult, Progress};

/// Modular type a node was given by an enclosing `mod`, if any.
pub(super) fn preset_modular_type(b: &Binder<'_>, expr: ExprId) -> Option<TypeId> {
    let record = b.program.expr(expr);
    if record.kind == ExprKind::Modint {
        return None;
    }
    record
        .datatype
        .filter(|&datatype| b.pool.tag(datatype) == Tag::Modint)
}

/// `value mod modulus`.
pub(super) fn bind_modint(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (value, modulus) = binary_operands(b, expr)?;
    let modulus_type = b.expr_type(modulus)?;
    if b.pool.tag(modulus_type) != Tag::Uint || b.pool.is_secret(modulus_type) {
        return Err(b.error_at(
            ErrorCode::E2012,
            modulus,
            format!(
                "modulus must be a public unsigned integer, found `{}`",
                b.type_name(modulus_type)
            ),
        ));
    }
    let width = b.pool.width(modulus_type).unwrap_or(rune_ir::DEFAULT_REF_WIDTH);
    let modular = b.pool.modint(modulus, width);
    let compares = matches!(
        b.program.expr(value).kind,
        ExprKind::Equal | ExprKind::NotEqual
    );
    preset_tree(b, value, modular)?;
    let datatype = if compares { TypeId::BOOL } else { modulus_type };
    b.set_type(expr, datatype)
}

fn preset_tree(b: &mut Binder<'_>, expr: ExprId, modular: TypeId) -> Result<(), Diagnostic> {
    let kind = b.program.expr(expr).kind;
    let children = b.program.expr(expr).children.to_vec();
    match kind {
        ExprKind::Add | ExprKind::Sub | ExprKind::Mul | ExprKind::Div => {
            b.program.expr_mut(expr).datatype = Some(modular);
            for child in children {
                preset_tree(b, child, modular)?;
            }
        }
        ExprKind::Exp | ExprKind::Negate | ExprKind::Secret | ExprKind::Reveal => {
            b.program.expr_mut(expr).datatype = Some(modular);
            if let Some(&base) = children.first() {
                preset_tree(b, base, modular)?;
            }
        }
        ExprKind::Equal | ExprKind::NotEqual => {
            for child in children {
                preset_tree(b, child, modular)?;
            }
        }
        _ if is_modular_leaf(kind) => {
            b.program.expr_mut(expr).datatype = Some(modular);
        }
        _ => {
            return Err(b.error_at(
                ErrorCode::E2012,
                expr,
                format!("{kind:?} is not supported in modular arithmetic"),
            ))
        }
    }
    Ok(())
}

fn is_modular_leaf(kind: ExprKind) -> bool {
    matches!(
        kind,
        ExprKind::Integer
            | ExprKind::Ident
            | ExprKind::Randuint
            | ExprKind::Cast
            | ExprKind::Call
            | ExprKind::Index
            | ExprKind::Dot
            | ExprKind::Widthof
    )
}

/// Bind a node inside a `mod` tree against its preset modular type.
pub(super) fn bind_modular_node(b: &mut Binder<'_>, expr: ExprId, modular: TypeId) -> BindResult {
    let kind = b.program.expr(expr).kind;
    let modular = b.pool.set_secret(modular, false);
    if is_modular_leaf(kind) {
        return bind_modular_leaf(b, expr, kind, modular);
    }
    let children = b.program.expr(expr).children.to_vec();
    let operands = if kind == ExprKind::Exp {
        if let Some(&exponent) = children.get(1) {
            require_public_uint(b, exponent, "modular exponent")?;
        }
        &children[..children.len().min(1)]
    } else {
        &children[..]
    };
    let mut secret = false;
    for &operand in operands {
        let datatype = b.expr_type(operand)?;
        if b.pool.modulus(datatype) != b.pool.modulus(modular) {
            return Err(b.error_at(
                ErrorCode::E2012,
                operand,
                format!(
                    "operand of modular `{kind:?}` has type `{}`, expected `{}`",
                    b.type_name(datatype),
                    b.type_name(modular)
                ),
            ));
        }
        secret |= b.pool.is_secret(datatype);
    }
    let secret = match kind {
        ExprKind::Secret => true,
        ExprKind::Reveal => false,
        _ => secret,
    };
    let datatype = b.pool.set_secret(modular, secret);
    b.set_type(expr, datatype)
}

/// A leaf is bound by its ordinary rule and must produce an integer, which
/// is then taken modulo the modulus.
fn bind_modular_leaf(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind, modular: TypeId) -> BindResult {
    b.program.expr_mut(expr).datatype = None;
    let progress = super::bind_node(b, expr, kind);
    let found = b.program.expr(expr).datatype;
    b.program.expr_mut(expr).datatype = Some(modular);
    let progress = progress?;
    if progress != Progress::Done {
        return Ok(progress);
    }
    let Some(found) = found else {
        return Err(b.error_at(ErrorCode::E9001, expr, "modular operand was not bound"));
    };
    if !b.pool.is_integer(found) {
        return Err(b.error_at(
            ErrorCode::E2012,
            expr,
            format!(
                "modular operands must be integers, found `{}`",
                b.type_name(found)
            ),
        ));
    }
    let datatype = b.pool.set_secret(modular, b.pool.is_secret(found));
    b.set_type(expr, datatype)
}
