//! Local declaration by assignment.
//!
//! A plain `x = value` (or `for x = ...`) declares `x` when no enclosing
//! scope already has that name. Declaring these up front lets code that
//! reads `x` before the binder reaches the assignment, such as the top of
//! a loop body, wait for the variable's type instead of for its name.

use rune_ir::{BlockId, ExprKind, FuncKind, Program, StmtKind};

pub(crate) fn declare_assigned_variables(program: &mut Program) {
    let functions: Vec<_> = program
        .function_ids()
        .filter(|&function| {
            let record = program.function(function);
            !record.destroyed && !record.is_builtin() && record.kind != FuncKind::Transformer
        })
        .collect();
    let mut declared = 0usize;
    for function in functions {
        let block = program.function(function).sub_block;
        declared += declare_in_block(program, block);
    }
    tracing::debug!(declared, "declared assigned variables");
}

fn declare_in_block(program: &mut Program, block: BlockId) -> usize {
    let mut declared = 0;
    for statement in program.block(block).statements.clone() {
        let record = program.statement(statement);
        let (kind, expr, sub_block, span) = (record.kind, record.expr, record.sub_block, record.span);
        if matches!(kind, StmtKind::Assign | StmtKind::Foreach) {
            let target = expr
                .filter(|&expr| program.expr(expr).kind == ExprKind::Equals)
                .and_then(|expr| program.first_child(expr))
                .filter(|&target| program.expr(target).kind == ExprKind::Ident)
                .and_then(|target| program.expr_name(target));
            if let Some(name) = target {
                if program.find_ident(block, name).is_none() {
                    program.add_local(block, name, false, span);
                    declared += 1;
                }
            }
        }
        if let Some(sub_block) = sub_block {
            declared += declare_in_block(program, sub_block);
        }
    }
    declared
}
