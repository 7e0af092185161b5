//! Assignment.
//!
//! `=` creates or updates its target: a local, a class member reached
//! through `object.member`, or an element of an array or tuple. The target
//! is not queued with the rest of the statement, so it is bound here after
//! the value.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, FuncKind, StmtKind, TypeId, VariableId};
use rune_types::TypeData;

use super::access::member_scope;
use super::operators::{binary_operands, join_types};
use crate::binder::Binder;
use crate::error::{BindResult, Progress};
use crate::refine::refine_access_chain;

pub(super) fn bind_assignment(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind) -> BindResult {
    let (target, value) = binary_operands(b, expr)?;
    if let Some(base) = kind.compound_base() {
        return bind_compound(b, expr, base, target);
    }
    if rewrite_foreach_source(b, expr, value) {
        return Ok(Progress::Rebind);
    }
    let value_type = b.expr_type(value)?;
    let value_is_type = b.program.expr(value).is_type;
    let progress = match b.program.expr(target).kind {
        ExprKind::Ident => assign_ident(b, expr, target, value_type, value_is_type)?,
        ExprKind::Dot => assign_member(b, expr, target, value_type, value_is_type)?,
        ExprKind::Index => {
            assign_element(b, target, value)?;
            Progress::Done
        }
        ExprKind::Tuple => {
            return Err(b.error_at(
                ErrorCode::E2002,
                target,
                "assigning to a tuple of targets is not supported",
            ))
        }
        _ => {
            return Err(b.error_at(
                ErrorCode::E2002,
                target,
                "left side of `=` is not assignable",
            ))
        }
    };
    if progress != Progress::Done {
        return Ok(progress);
    }
    b.program.expr_mut(expr).is_type = value_is_type;
    b.set_type(expr, value_type)
}

/// `x = value`: find the variable in scope, or declare a local.
fn assign_ident(
    b: &mut Binder<'_>,
    expr: ExprId,
    target: ExprId,
    value_type: TypeId,
    value_is_type: bool,
) -> Result<Progress, Diagnostic> {
    let Some(name) = b.program.expr_name(target) else {
        return Err(b.error_at(ErrorCode::E9001, target, "assignment target without a name"));
    };
    let scope = b.scope();
    let existing = b.program.find_ident(scope, name);
    if let Some(function) = existing.and_then(|ident| b.program.ident_function(ident)) {
        return Err(b.error_at(
            ErrorCode::E2002,
            target,
            format!("cannot assign to function `{}`", b.program.function_name(function)),
        ));
    }
    let variable = match existing.and_then(|ident| b.program.ident_variable(ident)) {
        Some(variable) => {
            let record = b.program.variable(variable);
            if record.is_const && record.datatype.is_some() {
                return Err(b.error_at(
                    ErrorCode::E3009,
                    target,
                    format!("cannot assign to const variable `{}`", b.program.name_str(name)),
                ));
            }
            variable
        }
        None => {
            let span = b.program.expr(target).span;
            b.program.add_local(scope, name, false, span)
        }
    };
    assign_variable(b, expr, target, variable, value_type, value_is_type)?;
    b.program.expr_mut(target).ident = b.program.find_ident(scope, name);
    Ok(Progress::Done)
}

/// `object.member = value`. Assigning an undeclared member of an object
/// adds it to the object's class.
fn assign_member(
    b: &mut Binder<'_>,
    expr: ExprId,
    target: ExprId,
    value_type: TypeId,
    value_is_type: bool,
) -> Result<Progress, Diagnostic> {
    let (object, member) = binary_operands(b, target)?;
    let object_type = b.expr_type(object)?;
    let Some(name) = b.program.expr_name(member) else {
        return Err(b.error_at(ErrorCode::E9001, member, "member name must be an identifier"));
    };
    let scope = member_scope(b, object, object_type)?;
    let existing = b.program.find_ident_in_block(scope.block, name);
    let variable = match existing {
        Some(ident) => match b.program.ident_variable(ident) {
            Some(variable) => variable,
            None if b.program.ident_function(ident).is_some() => {
                return Err(b.error_at(
                    ErrorCode::E2002,
                    member,
                    format!("cannot assign to method `{}`", b.program.name_str(name)),
                ))
            }
            None => declare_member(b, object_type, scope.block, name, member)?,
        },
        None => declare_member(b, object_type, scope.block, name, member)?,
    };
    assign_variable(b, expr, member, variable, value_type, value_is_type)?;
    let member_type = b.program.variable(variable).datatype;
    b.program.expr_mut(member).ident = b.program.find_ident_in_block(scope.block, name);
    b.program.expr_mut(target).datatype = member_type;
    Ok(Progress::Done)
}

fn declare_member(
    b: &mut Binder<'_>,
    object_type: TypeId,
    block: rune_ir::BlockId,
    name: rune_ir::Name,
    member: ExprId,
) -> Result<VariableId, Diagnostic> {
    if !matches!(b.pool.data(object_type), TypeData::Class { .. }) {
        return Err(b.error_at(
            ErrorCode::E3008,
            member,
            format!(
                "`{}` has no member `{}`",
                b.type_name(object_type),
                b.program.name_str(name)
            ),
        ));
    }
    let span = b.program.expr(member).span;
    let variable = b.program.add_local(block, name, false, span);
    tracing::trace!(member = b.program.name_str(name), "added class member");
    Ok(variable)
}

fn assign_variable(
    b: &mut Binder<'_>,
    expr: ExprId,
    target: ExprId,
    variable: VariableId,
    value_type: TypeId,
    value_is_type: bool,
) -> Result<(), Diagnostic> {
    if value_is_type {
        b.program.variable_mut(variable).is_type = true;
    }
    b.update_variable(variable, value_type, expr)?;
    b.check_variable_constraint(variable)?;
    let datatype = b.program.variable(variable).datatype;
    let record = b.program.expr_mut(target);
    record.datatype = datatype;
    record.is_type = value_is_type;
    Ok(())
}

/// `a[i] = value` may refine a container holding null placeholders.
fn assign_element(b: &mut Binder<'_>, target: ExprId, value: ExprId) -> Result<(), Diagnostic> {
    let element = b.expr_type(target)?;
    let value_type = b.expr_type(value)?;
    let autocast = b.program.expr(value).autocast;
    let Some(joined) = join_types(b, (element, false), (value_type, autocast)) else {
        return Err(b.mismatch(target, "assigned element has the wrong type", element, value_type));
    };
    if joined != element {
        refine_access_chain(b, target, joined)?;
    }
    Ok(())
}

/// `x op= value` types as `x op value`, which must keep the type of `x`.
fn bind_compound(b: &mut Binder<'_>, expr: ExprId, base: ExprKind, target: ExprId) -> BindResult {
    if b.program.expr(target).is_const {
        return Err(b.error_at(
            ErrorCode::E3009,
            target,
            "cannot assign to a constant",
        ));
    }
    let target_type = b.expr_type(target)?;
    let overloaded = if base.is_overloadable() {
        super::overload::bind_operator_overload(b, expr, base)?
    } else {
        None
    };
    let progress = match overloaded {
        Some(progress) => progress,
        None => super::bind_node(b, expr, base)?,
    };
    if progress != Progress::Done {
        return Ok(progress);
    }
    let result = b.expr_type(expr)?;
    if result != target_type && b.unify(target_type, result).is_err() {
        return Err(b.mismatch(expr, "compound assignment changes the target's type", target_type, result));
    }
    b.set_type(expr, target_type)
}

/// `for x = values` iterates `values.values()` unless the source already
/// calls an iterator. Returns true when the tree was rewritten.
fn rewrite_foreach_source(b: &mut Binder<'_>, expr: ExprId, value: ExprId) -> bool {
    let Some(statement) = b.program.expr_statement(expr) else {
        return false;
    };
    let record = b.program.statement(statement);
    if record.kind != StmtKind::Foreach || record.expr != Some(expr) {
        return false;
    }
    if calls_iterator(b, value) {
        return false;
    }
    let span = b.program.expr(value).span;
    let values = b.program.ident_expr("values", span);
    let dot = b.program.new_expr(ExprKind::Dot, &[value, values], span);
    let list = b.program.new_expr(ExprKind::List, &[], span);
    let call = b.program.new_expr(ExprKind::Call, &[dot, list], span);
    b.program.replace_child(expr, 1, call);
    tracing::debug!(?statement, "iterating over implicit values()");
    true
}

fn calls_iterator(b: &Binder<'_>, value: ExprId) -> bool {
    if b.program.expr(value).kind != ExprKind::Call {
        return false;
    }
    let callee = b
        .program
        .first_child(value)
        .and_then(|access| b.program.expr(access).datatype)
        .and_then(|datatype| b.pool.function_of(datatype));
    callee.is_some_and(|function| b.program.function(function).kind == FuncKind::Iterator)
}
