//! Transformer execution.
//!
//! A `relation Generator Parent Child ...` statement runs the body of a
//! transformer function when its binding completes. The body is evaluated,
//! not bound: its variables hold compile-time [`Value`]s, `if` chains pick
//! statements by value, and `appendcode`/`prependcode` statements splice a
//! copy of their block into a destination block after expanding `$name`
//! fragments.
//!
//! Everything the body generates is recorded on the relation so that it
//! can be destroyed with it.

mod expand;

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{
    BlockId, BlockOwner, ExprId, ExprKind, FuncKind, FunctionId, IdentTarget, Literal, Name,
    RelationId, StatementId, StmtKind, TemplateId, VarKind,
};
use rustc_hash::FxHashMap;

use crate::binder::Binder;

/// A compile-time value of a transformer variable.
#[derive(Clone, Debug, PartialEq)]
enum Value {
    Int(u64),
    Bool(bool),
    Str(String),
    Float(f64),
    Function(FunctionId),
    Template(TemplateId),
}

struct Generator {
    statement: StatementId,
    relation: RelationId,
    env: FxHashMap<Name, Value>,
}

/// Run the transformer a `relation` statement names.
pub(crate) fn execute_relation(b: &mut Binder<'_>, statement: StatementId) -> Result<(), Diagnostic> {
    if b.program.statement(statement).executed {
        return Ok(());
    }
    let Some(expr) = b.program.statement(statement).expr else {
        return Err(b.error_at_span(
            ErrorCode::E4001,
            b.program.statement(statement).span,
            "relation needs a transformer call",
        ));
    };
    let [callee, list] = b.program.expr(expr).children[..] else {
        return Err(b.error_at(ErrorCode::E4001, expr, "relation needs a transformer call"));
    };
    let scope = b.program.statement(statement).block;
    let generator = match eval(b, &FxHashMap::default(), scope, callee)? {
        Value::Function(function) if b.program.function(function).kind == FuncKind::Transformer => {
            function
        }
        _ => {
            return Err(b.error_at(
                ErrorCode::E4001,
                callee,
                "relation must name a transformer",
            ))
        }
    };
    let args = b.program.expr(list).children.to_vec();
    let env = bind_parameters(b, expr, scope, generator, &args)?;
    let parameters = parameter_names(b, generator);
    let template_arg = |index: usize| {
        parameters
            .get(index)
            .and_then(|name| env.get(name))
            .and_then(|value| match *value {
                Value::Template(template) => Some(template),
                _ => None,
            })
    };
    let (Some(parent), Some(child)) = (template_arg(0), template_arg(1)) else {
        return Err(b.error_at(
            ErrorCode::E4001,
            expr,
            "the first two transformer arguments must be classes",
        ));
    };
    let cascade = matches!(lookup(b, &env, "cascade"), Some(Value::Bool(true)));
    let parent_label = text_value(b, &env, "parentLabel");
    let child_label = text_value(b, &env, "childLabel");

    import_constructors(b, parent, child);
    let relation = b
        .program
        .create_relation(generator, parent, child, parent_label, child_label, cascade);
    let mut context = Generator {
        statement,
        relation,
        env,
    };
    let body = b.program.function(generator).sub_block;
    execute_block(b, &mut context, body)?;

    b.program.statement_mut(statement).executed = true;
    b.report.directives += 1;
    b.wake_defined_idents();
    tracing::debug!(
        generator = b.program.function_name(generator),
        parent = b.program.template_name(parent),
        child = b.program.template_name(child),
        cascade,
        "executed relation"
    );
    Ok(())
}

fn parameter_names(b: &Binder<'_>, generator: FunctionId) -> Vec<Name> {
    let block = b.program.function(generator).sub_block;
    b.program
        .block(block)
        .variables
        .iter()
        .map(|&v| b.program.variable(v))
        .filter(|var| var.kind == VarKind::Parameter)
        .map(|var| var.name)
        .collect()
}

/// Bind generator parameters from positional and named arguments, then
/// default values.
fn bind_parameters(
    b: &Binder<'_>,
    call: ExprId,
    scope: BlockId,
    generator: FunctionId,
    args: &[ExprId],
) -> Result<FxHashMap<Name, Value>, Diagnostic> {
    let block = b.program.function(generator).sub_block;
    let parameters: Vec<_> = b
        .program
        .block(block)
        .variables
        .iter()
        .copied()
        .filter(|&v| b.program.variable(v).kind == VarKind::Parameter)
        .collect();
    let mut values: Vec<Option<Value>> = vec![None; parameters.len()];
    let mut next = 0;
    for &arg in args {
        let (index, value_expr) = if b.program.expr(arg).kind == ExprKind::NamedParam {
            let name = b.program.first_child(arg).and_then(|n| b.program.expr_name(n));
            let index = name.and_then(|name| {
                parameters
                    .iter()
                    .position(|&v| b.program.variable(v).name == name)
            });
            let (Some(index), Some(value)) = (index, b.program.child(arg, 1)) else {
                return Err(b.error_at(ErrorCode::E4001, arg, "transformer has no parameter of that name"));
            };
            (index, value)
        } else {
            next += 1;
            (next - 1, arg)
        };
        let Some(slot) = values.get_mut(index) else {
            return Err(b.error_at(ErrorCode::E4001, arg, "too many transformer arguments"));
        };
        *slot = Some(eval(b, &FxHashMap::default(), scope, value_expr)?);
    }
    let mut env = FxHashMap::default();
    for (variable, value) in parameters.into_iter().zip(values) {
        let value = match (value, b.program.variable(variable).initializer) {
            (Some(value), _) => value,
            (None, Some(initializer)) => eval(b, &env, block, initializer)?,
            (None, None) => {
                return Err(b.error_at(
                    ErrorCode::E4001,
                    call,
                    format!(
                        "missing transformer argument `{}`",
                        b.program.variable_name(variable)
                    ),
                ))
            }
        };
        env.insert(b.program.variable(variable).name, value);
    }
    Ok(env)
}

fn lookup<'e>(b: &Binder<'_>, env: &'e FxHashMap<Name, Value>, name: &str) -> Option<&'e Value> {
    let name = b.program.interner().get(name)?;
    env.get(&name)
}

fn text_value(b: &Binder<'_>, env: &FxHashMap<Name, Value>, name: &str) -> String {
    match lookup(b, env, name) {
        Some(value) => render(b, value),
        None => String::new(),
    }
}

/// Text a value contributes to a `$name` expansion.
fn render(b: &Binder<'_>, value: &Value) -> String {
    match value {
        Value::Int(value) => value.to_string(),
        Value::Bool(value) => value.to_string(),
        Value::Str(text) => text.clone(),
        Value::Float(value) => value.to_string(),
        Value::Function(function) => b.program.function_name(*function).to_owned(),
        Value::Template(template) => b.program.template_name(*template).to_owned(),
    }
}

/// Make each template's constructor visible from the other's module.
fn import_constructors(b: &mut Binder<'_>, parent: TemplateId, child: TemplateId) {
    let module_of = |b: &Binder<'_>, template: TemplateId| {
        let constructor = b.program.template(template).function;
        let declared_in = b
            .program
            .function(constructor)
            .block
            .unwrap_or_else(|| b.program.root_block());
        (constructor, b.program.module_block(declared_in))
    };
    let (parent_constructor, parent_module) = module_of(&*b, parent);
    let (child_constructor, child_module) = module_of(&*b, child);
    if parent_module == child_module {
        return;
    }
    for (module, constructor) in [(parent_module, child_constructor), (child_module, parent_constructor)] {
        let name = b.program.function(constructor).name;
        if b.program.find_ident_in_block(module, name).is_none() {
            b.program.add_function_ident(module, constructor, name, true);
        }
    }
}

// === Evaluation ===

fn eval(
    b: &Binder<'_>,
    env: &FxHashMap<Name, Value>,
    scope: BlockId,
    expr: ExprId,
) -> Result<Value, Diagnostic> {
    let record = b.program.expr(expr);
    match (record.kind, &record.literal) {
        (ExprKind::Integer, Literal::Integer { value, .. }) => Ok(Value::Int(*value)),
        (ExprKind::Bool, Literal::Bool(value)) => Ok(Value::Bool(*value)),
        (ExprKind::String, Literal::Str(text)) => Ok(Value::Str(text.clone())),
        (ExprKind::Float, Literal::Float { bits, .. }) => Ok(Value::Float(f64::from_bits(*bits))),
        (ExprKind::Ident, Literal::Name(name)) => {
            if let Some(value) = env.get(name) {
                return Ok(value.clone());
            }
            let target = b.program.find_ident(scope, *name).map(|ident| b.program.ident(ident).target);
            match target {
                Some(IdentTarget::Function(function)) => Ok(function_value(b, function)),
                _ => Err(b.error_at(
                    ErrorCode::E4001,
                    expr,
                    format!("`{}` has no value in a transformer", b.program.name_str(*name)),
                )),
            }
        }
        (ExprKind::Dot, _) => {
            let [object, member] = record.children[..] else {
                return Err(b.error_at(ErrorCode::E9001, expr, "malformed member access"));
            };
            let block = match eval(b, env, scope, object)? {
                Value::Template(template) => {
                    b.program.function(b.program.template(template).function).sub_block
                }
                Value::Function(function) => b.program.function(function).sub_block,
                _ => return Err(b.error_at(ErrorCode::E4001, object, "value has no members")),
            };
            let found = b
                .program
                .expr_name(member)
                .and_then(|name| b.program.find_ident_in_block(block, name))
                .and_then(|ident| b.program.ident_function(ident));
            match found {
                Some(function) => Ok(function_value(b, function)),
                None => Err(b.error_at(ErrorCode::E4001, member, "no such function")),
            }
        }
        (ExprKind::Not, _) => match eval_children(b, env, scope, expr)?.as_slice() {
            [Value::Bool(value)] => Ok(Value::Bool(!value)),
            _ => Err(b.error_at(ErrorCode::E4003, expr, "`!` needs a bool")),
        },
        (ExprKind::Equal | ExprKind::NotEqual, _) => {
            let values = eval_children(b, env, scope, expr)?;
            let equal = values.first() == values.get(1);
            Ok(Value::Bool(equal == (record.kind == ExprKind::Equal)))
        }
        (ExprKind::And | ExprKind::Or | ExprKind::Xor, _) => {
            match eval_children(b, env, scope, expr)?.as_slice() {
                [Value::Bool(left), Value::Bool(right)] => Ok(Value::Bool(match record.kind {
                    ExprKind::And => *left && *right,
                    ExprKind::Or => *left || *right,
                    _ => left != right,
                })),
                _ => Err(b.error_at(ErrorCode::E4003, expr, "logical operators need bools")),
            }
        }
        (ExprKind::Add, _) => match eval_children(b, env, scope, expr)?.as_slice() {
            [Value::Int(left), Value::Int(right)] => Ok(Value::Int(left.wrapping_add(*right))),
            [Value::Str(left), Value::Str(right)] => Ok(Value::Str(format!("{left}{right}"))),
            _ => Err(b.error_at(ErrorCode::E4001, expr, "cannot add these transformer values")),
        },
        _ => Err(b.error_at(
            ErrorCode::E4001,
            expr,
            format!("{:?} cannot be evaluated in a transformer", record.kind),
        )),
    }
}

fn eval_children(
    b: &Binder<'_>,
    env: &FxHashMap<Name, Value>,
    scope: BlockId,
    expr: ExprId,
) -> Result<Vec<Value>, Diagnostic> {
    b.program
        .expr(expr)
        .children
        .iter()
        .map(|&child| eval(b, env, scope, child))
        .collect()
}

fn function_value(b: &Binder<'_>, function: FunctionId) -> Value {
    match b.program.function(function).template {
        Some(template) if b.program.function(function).kind == FuncKind::Constructor => {
            Value::Template(template)
        }
        _ => Value::Function(function),
    }
}

// === Statements ===

fn execute_block(b: &mut Binder<'_>, context: &mut Generator, block: BlockId) -> Result<(), Diagnostic> {
    // Whether a branch of the current `if` chain already ran.
    let mut chain_taken = false;
    for statement in b.program.block(block).statements.clone() {
        let record = b.program.statement(statement);
        let (kind, expr, sub_block) = (record.kind, record.expr, record.sub_block);
        match kind {
            StmtKind::If | StmtKind::ElseIf | StmtKind::Else => {
                if kind == StmtKind::If {
                    chain_taken = false;
                }
                if chain_taken {
                    continue;
                }
                let run = match expr {
                    Some(condition) => condition_value(b, context, block, condition)?,
                    None => true,
                };
                if run {
                    chain_taken = true;
                    if let Some(body) = sub_block {
                        execute_block(b, context, body)?;
                    }
                }
            }
            StmtKind::Assign => {
                let Some(expr) = expr else {
                    continue;
                };
                assign(b, context, block, expr)?;
            }
            StmtKind::AppendCode | StmtKind::Prependcode => {
                splice(b, context, statement, kind == StmtKind::Prependcode)?;
            }
            _ => {
                return Err(b.error_at_span(
                    ErrorCode::E4002,
                    b.program.statement(statement).span,
                    format!("{kind:?} statements are not allowed in a transformer"),
                ))
            }
        }
    }
    Ok(())
}

fn condition_value(
    b: &Binder<'_>,
    context: &Generator,
    scope: BlockId,
    condition: ExprId,
) -> Result<bool, Diagnostic> {
    match eval(b, &context.env, scope, condition)? {
        Value::Bool(value) => Ok(value),
        _ => Err(b.error_at(
            ErrorCode::E4003,
            condition,
            "transformer condition must be a bool",
        )),
    }
}

/// `name = value` on a generator variable.
fn assign(b: &Binder<'_>, context: &mut Generator, scope: BlockId, expr: ExprId) -> Result<(), Diagnostic> {
    let record = b.program.expr(expr);
    let target_name = b.program.first_child(expr).and_then(|target| b.program.expr_name(target));
    let (ExprKind::Equals, Some(name), Some(value)) = (record.kind, target_name, b.program.child(expr, 1))
    else {
        return Err(b.error_at(
            ErrorCode::E4002,
            expr,
            "transformers may only assign to their own variables",
        ));
    };
    let value = eval(b, &context.env, scope, value)?;
    context.env.insert(name, value);
    Ok(())
}

/// Copy an `appendcode`/`prependcode` block into its destination.
fn splice(
    b: &mut Binder<'_>,
    context: &mut Generator,
    statement: StatementId,
    prepend: bool,
) -> Result<(), Diagnostic> {
    let Some(source) = b.program.statement(statement).sub_block else {
        return Ok(());
    };
    let scope = b.program.statement(statement).block;
    let dest = match b.program.statement(statement).expr {
        None => b.program.root_block(),
        Some(expr) => match eval(b, &context.env, scope, expr)? {
            Value::Template(template) => {
                b.program.function(b.program.template(template).function).sub_block
            }
            Value::Function(function) => b.program.function(function).sub_block,
            _ => {
                return Err(b.error_at(
                    ErrorCode::E4001,
                    expr,
                    "code can only be added to a class or function",
                ))
            }
        },
    };

    let copy = b.program.copy_block(source);
    expand_block(b, context, copy)?;
    let statements = b.program.block(copy).statements.clone();
    let functions = b.program.block(copy).functions.clone();
    for &generated in &statements {
        let record = b.program.statement_mut(generated);
        record.generated = true;
        record.relation = Some(context.relation);
    }
    for &function in &functions {
        let record = b.program.function_mut(function);
        record.generated = true;
        record.relation = Some(context.relation);
    }
    {
        let relation = b.program.relation_mut(context.relation);
        relation.statements.extend(statements.iter().copied());
        relation.functions.extend(functions);
    }
    if prepend {
        b.program.prepend_block_to_block(copy, dest);
    } else {
        b.program.append_block_to_block(copy, dest);
    }
    tracing::trace!(?dest, count = statements.len(), prepend, "spliced generated code");
    queue_generated(b, dest, &statements);
    Ok(())
}

/// Statements added to a function that is already being bound in place
/// are bound with it.
fn queue_generated(b: &mut Binder<'_>, dest: BlockId, statements: &[StatementId]) {
    let BlockOwner::Function(owner) = b.program.block(b.program.scope_block(dest)).owner else {
        return;
    };
    if !b.program.function(owner).kind.is_unique() {
        return;
    }
    let Some(&signature) = b.program.function(owner).signatures.first() else {
        return;
    };
    let instantiated = b.program.signature(signature).instantiated;
    for &statement in statements {
        b.queue_statement(Some(signature), statement, instantiated);
    }
}

// === `$name` expansion ===

fn expand_block(b: &mut Binder<'_>, context: &Generator, block: BlockId) -> Result<(), Diagnostic> {
    let mut idents: Vec<_> = b.program.block(block).idents.values().copied().collect();
    idents.sort_unstable();
    for ident in idents {
        let name = b.program.ident(ident).name;
        if let Some(expanded) = expand_name(b, context, b.program.name_str(name))? {
            let expanded = b.program.intern(&expanded);
            b.program.rename_ident(ident, expanded);
        }
    }
    for variable in b.program.block(block).variables.clone() {
        let record = b.program.variable(variable);
        for expr in record.type_expr.into_iter().chain(record.initializer) {
            expand_expr(b, context, expr)?;
        }
    }
    for statement in b.program.block(block).statements.clone() {
        if let Some(expr) = b.program.statement(statement).expr {
            expand_expr(b, context, expr)?;
        }
        if let Some(sub_block) = b.program.statement(statement).sub_block {
            expand_block(b, context, sub_block)?;
        }
    }
    for function in b.program.block(block).functions.clone() {
        if let Some(type_expr) = b.program.function(function).type_expr {
            expand_expr(b, context, type_expr)?;
        }
        let sub_block = b.program.function(function).sub_block;
        expand_block(b, context, sub_block)?;
    }
    Ok(())
}

fn expand_expr(b: &mut Binder<'_>, context: &Generator, expr: ExprId) -> Result<(), Diagnostic> {
    let literal = match &b.program.expr(expr).literal {
        Literal::Name(name) => expand_name(b, context, b.program.name_str(*name))?
            .map(|text| Literal::Name(b.program.intern(&text))),
        Literal::Str(text) => expand_name(b, context, text)?.map(Literal::Str),
        _ => None,
    };
    if let Some(literal) = literal {
        b.program.expr_mut(expr).literal = literal;
    }
    for child in b.program.expr(expr).children.clone() {
        expand_expr(b, context, child)?;
    }
    Ok(())
}

fn expand_name(b: &Binder<'_>, context: &Generator, text: &str) -> Result<Option<String>, Diagnostic> {
    expand::expand_text(text, |fragment| {
        lookup(b, &context.env, fragment).map(|value| render(b, value))
    })
    .map_err(|missing| {
        b.error_at_span(
            ErrorCode::E4001,
            b.program.statement(context.statement).span,
            format!("`${missing}` does not name a transformer variable"),
        )
    })
}

#[cfg(test)]
mod tests;
