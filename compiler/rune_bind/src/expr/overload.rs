//! Operators implemented by class methods.
//!
//! A class overloads an operator by declaring a method named after its
//! symbol, e.g. `func +(self, other: Vec)`. The first operand's class is
//! tried first, then the second's. Operands that are types, such as the
//! target of a cast, and nullable objects never supply the method. Operands
//! are passed in source order and the method must take exactly as many
//! parameters as there are operands.

use rune_diagnostic::Diagnostic;
use rune_ir::{ExprId, ExprKind, FunctionId, TypeId};
use rune_types::Tag;

use super::calls::{bind_signature_call, parameter_variables};
use crate::binder::Binder;
use crate::error::Progress;

/// Bind `expr` as a call to the method for operator `kind` if one of its
/// operands' classes defines one. `kind` is the expression's own kind, or
/// the operator a compound assignment applies. Returns `None` to fall back
/// to the built-in rule.
pub(super) fn bind_operator_overload(
    b: &mut Binder<'_>,
    expr: ExprId,
    kind: ExprKind,
) -> Result<Option<Progress>, Diagnostic> {
    let Some(symbol) = kind.operator_symbol() else {
        return Ok(None);
    };
    let operands = b.program.expr(expr).children.to_vec();
    if operands.is_empty() || operands.len() > 2 {
        return Ok(None);
    }
    let mut types = Vec::with_capacity(operands.len());
    for &operand in &operands {
        types.push(b.expr_type(operand)?);
    }
    for (&operand, &datatype) in operands.iter().zip(&types) {
        if b.program.expr(operand).is_type {
            continue;
        }
        let Some(method) = find_operator_method(b, datatype, symbol) else {
            continue;
        };
        if parameter_variables(b, method).len() != operands.len() {
            continue;
        }
        tracing::trace!(?expr, symbol, "binding overloaded operator");
        let params: Vec<Option<TypeId>> = types.iter().copied().map(Some).collect();
        let args: Vec<Option<ExprId>> = operands.iter().copied().map(Some).collect();
        return bind_signature_call(b, expr, method, params, None, &args).map(Some);
    }
    Ok(None)
}

/// A nullable object may be null, so its class cannot supply the method.
fn find_operator_method(b: &Binder<'_>, datatype: TypeId, symbol: &str) -> Option<FunctionId> {
    if b.pool.tag(datatype) != Tag::Class || b.pool.is_nullable(datatype) {
        return None;
    }
    let class = b.pool.class_of(datatype)?;
    let name = b.program.interner().get(symbol)?;
    let ident = b.program.find_ident_in_block(b.program.class(class).sub_block, name)?;
    b.program.ident_function(ident)
}
