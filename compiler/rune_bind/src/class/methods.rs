//! Generated `toString` and `show` methods.
//!
//! Each template gets both methods the first time one of its classes is
//! bound, unless it declares its own. `toString` renders the members the
//! program declared; `show` also renders generated members and prints the
//! object's reference number.

use rune_diagnostic::Diagnostic;
use rune_ir::{
    BlockId, ClassId, ExprId, ExprKind, FuncKind, FunctionId, Linkage, Name, Span, StmtKind,
    TypeId,
};
use rune_types::Tag;

use crate::binder::Binder;

pub(super) fn generate_default_methods(b: &mut Binder<'_>, class: ClassId) -> Result<(), Diagnostic> {
    let template = b.program.class(class).template;
    let constructor = b.program.template(template).function;
    let block = b.program.function(constructor).sub_block;
    let already = std::mem::replace(&mut b.program.class_mut(class).default_methods_generated, true);
    if already {
        return Ok(());
    }

    let declared = members(b, class, true);
    let all = members(b, class, false);
    if !has_method(b, block, "toString") {
        let function = add_method(b, block, "toString");
        build_to_string(b, function, &declared);
    }
    let show = match find_method(b, block, "show") {
        Some(show) => show,
        None => {
            let function = add_method(b, block, "show");
            build_show(b, function, constructor, &all);
            function
        }
    };
    tracing::debug!(
        template = b.program.template_name(template),
        "generated default methods"
    );

    if b.options.debug_mode {
        let class_type = b.pool.class(class, template);
        let params = vec![Some(class_type)];
        let signature = match b.program.lookup_signature(show, &params) {
            Some(signature) => signature,
            None => {
                let span = b.program.function(show).span;
                let caller = b.current_signature();
                b.program.create_signature(show, params, span, caller, None)
            }
        };
        b.program.signature_mut(signature).instantiated = true;
        b.queue_signature(signature)?;
    }
    Ok(())
}

/// Members with a printable type, in declaration order.
fn members(b: &Binder<'_>, class: ClassId, declared_only: bool) -> Vec<Name> {
    let block = b.program.class(class).sub_block;
    b.program
        .block(block)
        .variables
        .iter()
        .map(|&v| b.program.variable(v))
        .filter(|var| !(declared_only && var.generated))
        .filter(|var| {
            var.datatype.is_some_and(|datatype| {
                datatype != TypeId::NONE
                    && b.pool.is_concrete(datatype)
                    && !matches!(b.pool.tag(datatype), Tag::Function | Tag::Template | Tag::EnumClass)
            })
        })
        .map(|var| var.name)
        .collect()
}

fn find_method(b: &Binder<'_>, block: BlockId, name: &str) -> Option<FunctionId> {
    let name = b.program.interner().get(name)?;
    let ident = b.program.find_ident_in_block(block, name)?;
    b.program.ident_function(ident)
}

fn has_method(b: &Binder<'_>, block: BlockId, name: &str) -> bool {
    find_method(b, block, name).is_some()
}

fn add_method(b: &mut Binder<'_>, block: BlockId, name: &str) -> FunctionId {
    let span = b.program.block(block).span;
    let function = b.program.add_function(block, name, FuncKind::Plain, Linkage::Module, span);
    b.program.function_mut(function).generated = true;
    b.program.add_parameter(function, "self", span);
    function
}

/// `if isnull(self) { return "null" }` then
/// `return "{" + "a = " + self.a.toString() + ", " + ... + "}"`.
fn build_to_string(b: &mut Binder<'_>, function: FunctionId, members: &[Name]) {
    let block = b.program.function(function).sub_block;
    let span = b.program.function(function).span;
    let null_text = b.program.string_expr("null", span);
    add_null_guard(b, block, StmtKind::Return, null_text, span);
    let body = render_members(b, members, span);
    b.program.add_statement(block, StmtKind::Return, Some(body), span);
}

/// `if isnull(self) { println "null"; return }` then
/// `println "Name(" + (<u32>self).toString() + ") = " + body`.
fn build_show(b: &mut Binder<'_>, function: FunctionId, constructor: FunctionId, members: &[Name]) {
    let block = b.program.function(function).sub_block;
    let span = b.program.function(function).span;
    let null_text = b.program.string_expr("null\n", span);
    let null_args = b.program.new_expr(ExprKind::List, &[null_text], span);
    let guard = add_null_guard(b, block, StmtKind::Print, null_args, span);
    b.program.add_statement(guard, StmtKind::Return, None, span);

    let header = format!("{}(", b.program.function_name(constructor));
    let header = b.program.string_expr(&header, span);
    let self_ref = self_expr(b, span);
    let width = b.program.width_type_expr(ExprKind::UintType, rune_ir::DEFAULT_REF_WIDTH, span);
    let reference = b.program.new_expr(ExprKind::Cast, &[width, self_ref], span);
    let reference = to_string_call(b, reference, span);
    let separator = b.program.string_expr(") = ", span);
    let body = render_members(b, members, span);
    let newline = b.program.string_expr("\n", span);
    let text = concat(b, &[header, reference, separator, body, newline], span);
    let args = b.program.new_expr(ExprKind::List, &[text], span);
    b.program.add_statement(block, StmtKind::Print, Some(args), span);
}

/// Adds `if isnull(self) { <kind> <expr> }`, returning the guarded block.
fn add_null_guard(b: &mut Binder<'_>, block: BlockId, kind: StmtKind, expr: ExprId, span: Span) -> BlockId {
    let self_ref = self_expr(b, span);
    let condition = b.program.new_expr(ExprKind::Isnull, &[self_ref], span);
    let (_, guard) = b.program.add_compound_statement(block, StmtKind::If, Some(condition), span);
    b.program.add_statement(guard, kind, Some(expr), span);
    guard
}

fn render_members(b: &mut Binder<'_>, members: &[Name], span: Span) -> ExprId {
    let mut parts = vec![b.program.string_expr("{", span)];
    for (index, &member) in members.iter().enumerate() {
        let label = if index == 0 {
            format!("{} = ", b.program.name_str(member))
        } else {
            format!(", {} = ", b.program.name_str(member))
        };
        parts.push(b.program.string_expr(&label, span));
        let object = self_expr(b, span);
        let field = b.program.name_expr(member, span);
        let access = b.program.new_expr(ExprKind::Dot, &[object, field], span);
        parts.push(to_string_call(b, access, span));
    }
    parts.push(b.program.string_expr("}", span));
    concat(b, &parts, span)
}

fn self_expr(b: &mut Binder<'_>, span: Span) -> ExprId {
    b.program.ident_expr("self", span)
}

fn to_string_call(b: &mut Binder<'_>, object: ExprId, span: Span) -> ExprId {
    let method = b.program.ident_expr("toString", span);
    let access = b.program.new_expr(ExprKind::Dot, &[object, method], span);
    let args = b.program.new_expr(ExprKind::List, &[], span);
    b.program.new_expr(ExprKind::Call, &[access, args], span)
}

/// Left-nested `+` over `parts`.
fn concat(b: &mut Binder<'_>, parts: &[ExprId], span: Span) -> ExprId {
    let mut iter = parts.iter().copied();
    let Some(mut result) = iter.next() else {
        return b.program.string_expr("", span);
    };
    for part in iter {
        result = b.program.new_expr(ExprKind::Add, &[result, part], span);
    }
    result
}
