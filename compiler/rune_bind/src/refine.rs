//! Refining container types through an access chain.
//!
//! `a.b[0][i] = value` may give a null placeholder element a concrete
//! class. The refined element type is pushed back out through each
//! container to the variable at the root of the chain.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, Literal, TypeId};
use rune_types::Tag;

use crate::binder::Binder;

/// Give `target` the type `datatype` and rebuild the types of the
/// containers it was reached through.
pub(crate) fn refine_access_chain(
    b: &mut Binder<'_>,
    target: ExprId,
    datatype: TypeId,
) -> Result<(), Diagnostic> {
    b.program.expr_mut(target).datatype = Some(datatype);
    match b.program.expr(target).kind {
        ExprKind::Ident => {
            let variable = b
                .program
                .expr(target)
                .ident
                .and_then(|ident| b.program.ident_variable(ident));
            if let Some(variable) = variable {
                b.update_variable(variable, datatype, target)?;
            }
        }
        ExprKind::Dot => {
            let variable = b
                .program
                .last_child(target)
                .and_then(|member| b.program.expr(member).ident)
                .and_then(|ident| b.program.ident_variable(ident));
            if let Some(variable) = variable {
                b.update_variable(variable, datatype, target)?;
            }
        }
        ExprKind::Index => {
            let (Some(container), Some(index)) =
                (b.program.child(target, 0), b.program.child(target, 1))
            else {
                return Ok(());
            };
            let container_type = b.expr_type(container)?;
            let refined = match b.pool.tag(container_type) {
                Tag::Array => b.pool.array(datatype),
                Tag::Tuple => {
                    let Literal::Integer { value, .. } = b.program.expr(index).literal else {
                        return Err(b.error_at(ErrorCode::E2007, index, "tuple index must be constant"));
                    };
                    let mut fields = b.pool.type_list(container_type).to_vec();
                    match usize::try_from(value).ok().and_then(|i| fields.get_mut(i)) {
                        Some(field) => *field = datatype,
                        None => return Err(b.error_at(ErrorCode::E2007, index, "tuple index out of range")),
                    }
                    b.pool.tuple(&fields)
                }
                _ => return Ok(()),
            };
            let refined = b.pool.set_secret(refined, b.pool.is_secret(container_type));
            if refined != container_type {
                tracing::trace!(?container, "refined container type");
                refine_access_chain(b, container, refined)?;
            }
        }
        _ => {}
    }
    Ok(())
}
