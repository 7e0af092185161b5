//! Iterator inlining.
//!
//! After binding, a loop `for x = it(args) { body }` over a user iterator
//! is replaced by a copy of the iterator's bound body:
//!
//! ```text
//! for x = it(a) { body }      p = a
//!                        =>   ...iterator statements...
//!                             x = <yielded value>
//!                             body
//!                             ...iterator statements...
//! ```
//!
//! Parameters become locals assigned from the arguments, renamed where they
//! would clash with a name already in scope. Each `yield` becomes an
//! assignment to the loop variable followed by the loop body, and each
//! `typeswitch` collapses to the case selected while binding.

use rune_diagnostic::Diagnostic;
use rune_ir::{
    BlockId, ExprId, ExprKind, FuncKind, Literal, Name, SignatureId, StatementId, StmtKind,
    VarKind, VariableId,
};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::binder::{internal_error, Binder};

/// Loops inside inlined iterator bodies are inlined by later rounds.
const MAX_ROUNDS: usize = 16;

pub(crate) fn inline_iterators(b: &mut Binder<'_>) -> Result<(), Diagnostic> {
    for _ in 0..MAX_ROUNDS {
        let loops = collect_iterator_loops(b);
        if loops.is_empty() {
            return Ok(());
        }
        for (statement, signature) in loops {
            inline_loop(b, statement, signature)?;
        }
    }
    tracing::debug!("stopped inlining nested iterator loops");
    Ok(())
}

/// `foreach` statements in bound code whose source calls a user iterator.
fn collect_iterator_loops(b: &Binder<'_>) -> Vec<(StatementId, SignatureId)> {
    let mut visited = FxHashSet::default();
    let mut loops = Vec::new();
    for signature in b.program.signature_ids() {
        if !b.program.signature(signature).instantiated {
            continue;
        }
        let block = b.program.signature_block(signature);
        if visited.insert(block) {
            collect_in_block(b, block, &mut loops);
        }
    }
    loops
}

fn collect_in_block(b: &Binder<'_>, block: BlockId, loops: &mut Vec<(StatementId, SignatureId)>) {
    if b.program.block(block).destroyed {
        return;
    }
    for &statement in &b.program.block(block).statements {
        let record = b.program.statement(statement);
        if record.kind == StmtKind::Foreach {
            if let Some(signature) = record.expr.and_then(|expr| iterator_signature(b, expr)) {
                loops.push((statement, signature));
                continue;
            }
        }
        if let Some(sub_block) = record.sub_block {
            collect_in_block(b, sub_block, loops);
        }
    }
}

fn iterator_signature(b: &Binder<'_>, assignment: ExprId) -> Option<SignatureId> {
    let call = b.program.child(assignment, 1)?;
    let signature = b.program.expr(call).signature?;
    let function = b.program.signature(signature).function;
    let record = b.program.function(function);
    (record.kind == FuncKind::Iterator && !record.is_builtin()).then_some(signature)
}

fn inline_loop(b: &mut Binder<'_>, statement: StatementId, signature: SignatureId) -> Result<(), Diagnostic> {
    let Some(assignment) = b.program.statement(statement).expr else {
        return Err(internal_error("foreach without an assignment"));
    };
    let (Some(target), Some(call)) = (b.program.child(assignment, 0), b.program.child(assignment, 1))
    else {
        return Err(internal_error("malformed foreach assignment"));
    };
    let scope = b.program.scope_block(b.program.statement(statement).block);
    let source = b.program.signature_block(signature);
    let copy = b.program.copy_block(source);
    let renames = localize_variables(b, source, copy, scope);
    rename_references(b, copy, &renames);
    assign_parameters(b, copy, signature, call)?;

    let body = b.program.statement(statement).sub_block;
    let mut yields = Vec::new();
    collect_yields(b, copy, &mut yields);
    for (index, &yield_statement) in yields.iter().enumerate() {
        expand_yield(b, yield_statement, target, body, index + 1 == yields.len());
    }
    collapse_typeswitches(b, copy);

    b.program.move_block_statements_after(copy, statement);
    b.program.destroy_statement(statement);
    b.report.inlined_loops += 1;
    tracing::debug!(
        ?statement,
        iterator = b.program.function_name(b.program.signature(signature).function),
        "inlined iterator loop"
    );
    Ok(())
}

/// Give the copied variables their bound facts, turn parameters into
/// locals and rename those that clash with names visible at the loop.
fn localize_variables(
    b: &mut Binder<'_>,
    source: BlockId,
    copy: BlockId,
    scope: BlockId,
) -> FxHashMap<Name, Name> {
    let pairs: Vec<(VariableId, VariableId)> = b
        .program
        .block(source)
        .variables
        .iter()
        .copied()
        .zip(b.program.block(copy).variables.iter().copied())
        .collect();
    let mut renames = FxHashMap::default();
    for (original, variable) in pairs {
        let facts = b.program.variable(original).clone();
        {
            let record = b.program.variable_mut(variable);
            record.datatype = facts.datatype;
            record.is_type = facts.is_type;
            record.instantiated = facts.instantiated;
            record.kind = VarKind::Local;
        }
        if b.program.find_ident(scope, facts.name).is_none() {
            continue;
        }
        let fresh = fresh_name(b, scope, facts.name);
        if let Some(&ident) = b.program.block(copy).idents.get(&facts.name) {
            b.program.rename_ident(ident, fresh);
        }
        renames.insert(facts.name, fresh);
    }
    renames
}

fn fresh_name(b: &Binder<'_>, scope: BlockId, name: Name) -> Name {
    let base = b.program.name_str(name);
    (1..)
        .map(|n| b.program.intern(&format!("{base}_{n}")))
        .find(|&candidate| b.program.find_ident(scope, candidate).is_none())
        .unwrap_or(name)
}

fn rename_references(b: &mut Binder<'_>, block: BlockId, renames: &FxHashMap<Name, Name>) {
    if renames.is_empty() {
        return;
    }
    for statement in b.program.block(block).statements.clone() {
        if let Some(expr) = b.program.statement(statement).expr {
            rename_in_expr(b, expr, renames);
        }
        if let Some(sub_block) = b.program.statement(statement).sub_block {
            rename_references(b, sub_block, renames);
        }
    }
}

fn rename_in_expr(b: &mut Binder<'_>, expr: ExprId, renames: &FxHashMap<Name, Name>) {
    let children = b.program.expr(expr).children.clone();
    let is_dot = b.program.expr(expr).kind == ExprKind::Dot;
    for (index, &child) in children.iter().enumerate() {
        // Member names are resolved in the object's scope.
        if is_dot && index == 1 {
            continue;
        }
        rename_in_expr(b, child, renames);
    }
    if let Literal::Name(name) = b.program.expr(expr).literal {
        if let Some(&fresh) = renames.get(&name) {
            b.program.expr_mut(expr).literal = Literal::Name(fresh);
        }
    }
}

/// Prefix the copy with `param = argument` for each parameter.
fn assign_parameters(
    b: &mut Binder<'_>,
    copy: BlockId,
    signature: SignatureId,
    call: ExprId,
) -> Result<(), Diagnostic> {
    let [access, list] = b.program.expr(call).children[..] else {
        return Err(internal_error("iterator call without an argument list"));
    };
    let params = b.program.signature(signature).params.clone();
    let mut values: Vec<Option<ExprId>> = vec![None; params.len()];
    let mut next = 0;
    let receiver = (b.program.expr(access).kind == ExprKind::Dot)
        .then(|| b.program.first_child(access))
        .flatten()
        .filter(|&object| !b.program.expr(object).is_type);
    if let (Some(object), Some(slot)) = (receiver, values.first_mut()) {
        if b.program.is_method_signature(signature) {
            *slot = Some(object);
            next = 1;
        }
    }
    for arg in b.program.expr(list).children.clone() {
        if b.program.expr(arg).kind == ExprKind::NamedParam {
            let name = b.program.first_child(arg).and_then(|n| b.program.expr_name(n));
            let index = params
                .iter()
                .position(|param| Some(b.program.variable(param.variable).name) == name);
            if let (Some(index), Some(value)) = (index, b.program.child(arg, 1)) {
                values[index] = Some(value);
            }
        } else if let Some(slot) = values.get_mut(next) {
            *slot = Some(arg);
            next += 1;
        }
    }

    let copy_params: Vec<VariableId> = b.program.block(copy).variables.clone();
    for (position, (param, value)) in params.iter().zip(values).enumerate() {
        let value = match value.or(b.program.variable(param.variable).initializer) {
            Some(value) => b.program.copy_expr(value),
            None => return Err(internal_error("iterator parameter without a value")),
        };
        let Some(&variable) = copy_params.get(position) else {
            return Err(internal_error("iterator copy lost a parameter"));
        };
        let record = b.program.variable(variable);
        let (name, datatype, span) = (record.name, record.datatype, record.span);
        let target = b.program.name_expr(name, span);
        b.program.expr_mut(target).datatype = datatype;
        let assignment = b.program.new_expr(ExprKind::Equals, &[target, value], span);
        b.program.expr_mut(assignment).datatype = datatype;
        let statement = b
            .program
            .insert_statement(copy, position, StmtKind::Assign, Some(assignment), span);
        b.program.statement_mut(statement).generated = true;
    }
    Ok(())
}

fn collect_yields(b: &Binder<'_>, block: BlockId, yields: &mut Vec<StatementId>) {
    for &statement in &b.program.block(block).statements {
        let record = b.program.statement(statement);
        if record.kind == StmtKind::Yield {
            yields.push(statement);
        }
        if let Some(sub_block) = record.sub_block {
            collect_yields(b, sub_block, yields);
        }
    }
}

/// `yield v` becomes `x = v` followed by the loop body. The last yield
/// takes the body itself; earlier ones take copies.
fn expand_yield(
    b: &mut Binder<'_>,
    yield_statement: StatementId,
    target: ExprId,
    body: Option<BlockId>,
    is_last: bool,
) {
    let loop_target = b.program.copy_expr(target);
    let value = b.program.statement(yield_statement).expr;
    let assignment = match value {
        Some(value) => {
            let (datatype, span) = (b.program.expr(value).datatype, b.program.expr(value).span);
            let assignment = b.program.new_expr(ExprKind::Equals, &[loop_target, value], span);
            b.program.expr_mut(assignment).datatype = datatype;
            Some(assignment)
        }
        None => None,
    };
    b.program.statement_mut(yield_statement).kind = StmtKind::Assign;
    b.program.set_statement_expr(yield_statement, assignment);
    if let Some(body) = body {
        let body = if is_last { body } else { b.program.copy_block(body) };
        b.program.move_block_statements_after(body, yield_statement);
    }
}

/// Replace each `typeswitch` by the statements of the case it selected.
fn collapse_typeswitches(b: &mut Binder<'_>, block: BlockId) {
    for statement in b.program.block(block).statements.clone() {
        let Some(sub_block) = b.program.statement(statement).sub_block else {
            continue;
        };
        if b.program.statement(statement).kind != StmtKind::Typeswitch {
            collapse_typeswitches(b, sub_block);
            continue;
        }
        let selected = b
            .program
            .block(sub_block)
            .statements
            .iter()
            .copied()
            .find(|&case| b.program.statement(case).instantiated);
        if let Some(body) = selected.and_then(|case| b.program.statement(case).sub_block) {
            collapse_typeswitches(b, body);
            b.program.move_block_statements_after(body, statement);
        }
        b.program.destroy_statement(statement);
    }
}
