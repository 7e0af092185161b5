//! Identifier resolution.

use rune_diagnostic::ErrorCode;
use rune_ir::{ExprId, IdentId, IdentTarget, TypeId, VariableId};
use rune_types::Tag;

use crate::binder::Binder;
use crate::error::BindResult;
use crate::graph::Event;

/// Resolve a name in the current scope. A name not declared anywhere yet
/// gets an undefined identifier in the module block, which a transformer
/// or a later declaration may define.
pub(super) fn bind_ident(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let Some(name) = b.program.expr_name(expr) else {
        return Err(b.error_at(ErrorCode::E9001, expr, "identifier expression without a name"));
    };
    let scope = b.scope();
    match b.program.find_ident(scope, name) {
        Some(ident) => bind_resolved_ident(b, expr, ident),
        None => {
            let module = b.program.module_block(scope);
            let ident = b.program.create_undefined_ident(module, name);
            tracing::trace!(name = b.program.name_str(name), "waiting for identifier");
            b.program.expr_mut(expr).ident = Some(ident);
            b.suspend(Event::IdentifierDefined(ident))
        }
    }
}

/// Bind `expr` as a reference to `ident`.
pub(super) fn bind_resolved_ident(b: &mut Binder<'_>, expr: ExprId, ident: IdentId) -> BindResult {
    b.program.expr_mut(expr).ident = Some(ident);
    match b.program.ident(ident).target {
        IdentTarget::Undefined => b.suspend(Event::IdentifierDefined(ident)),
        IdentTarget::Variable(variable) => bind_variable_ref(b, expr, variable),
        IdentTarget::Function(function) => {
            let datatype = b.function_type(function);
            if b.in_type_constraint() {
                return b.set_type_value(expr, datatype);
            }
            b.set_type(expr, datatype)
        }
    }
}

fn bind_variable_ref(b: &mut Binder<'_>, expr: ExprId, variable: VariableId) -> BindResult {
    let (instantiating, lhs) = {
        let record = b.program.expr(expr);
        (record.instantiating, record.lhs)
    };
    if instantiating && !lhs {
        b.program.variable_mut(variable).instantiated = true;
    }
    let record = b.program.variable(variable);
    let (is_type, is_const) = (record.is_type, record.is_const);
    let Some(datatype) = record.datatype else {
        return b.suspend(Event::VariableTypeKnown(variable));
    };
    if !(b.pool.is_concrete(datatype) || is_type || lhs || is_final_value_type(b, datatype)) {
        return b.suspend(Event::VariableTypeKnown(variable));
    }
    let record = b.program.expr_mut(expr);
    record.is_type = is_type;
    record.is_const = is_const;
    b.set_type(expr, datatype)
}

/// Functions, enumerations and class templates held in a variable are
/// never concrete, but will not get any more specific either.
fn is_final_value_type(b: &Binder<'_>, datatype: TypeId) -> bool {
    match b.pool.tag(datatype) {
        Tag::Function | Tag::EnumClass => true,
        Tag::Template => !b.pool.is_nullable(datatype),
        _ => false,
    }
}

/// `name = value` in a call: typed as its value. The name is matched
/// against the callee's parameters by the call rule.
pub(super) fn bind_named_param(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let Some(value) = b.program.child(expr, 1) else {
        return Err(b.error_at(ErrorCode::E9001, expr, "named parameter without a value"));
    };
    let datatype = b.expr_type(value)?;
    let value_is_type = b.program.expr(value).is_type;
    b.program.expr_mut(expr).is_type = value_is_type;
    b.set_type(expr, datatype)
}
