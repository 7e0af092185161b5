//! Member access, indexing, slicing and template instantiation.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{BlockId, ExprId, ExprKind, FunctionId, IdentTarget, Literal, TypeId};
use rune_types::{Tag, TypeData};

use super::identifiers::bind_resolved_ident;
use super::operators::{binary_operands, require_public_uint};
use crate::binder::Binder;
use crate::class;
use crate::error::{BindResult, Progress};
use crate::graph::Event;

/// Where the right side of `a.b` is looked up.
pub(super) struct MemberScope {
    pub block: BlockId,
    /// Set for enumerations, whose entries are typed by the enum.
    pub enumeration: Option<FunctionId>,
    /// No member can be added to this scope later.
    pub closed: bool,
}

/// Scope that members of a value of `datatype` live in.
pub(super) fn member_scope(
    b: &Binder<'_>,
    at: ExprId,
    datatype: TypeId,
) -> Result<MemberScope, Diagnostic> {
    let open = |block| MemberScope {
        block,
        enumeration: None,
        closed: false,
    };
    match *b.pool.data(datatype) {
        TypeData::Class { class, .. } => Ok(open(b.program.class(class).sub_block)),
        TypeData::Template(template) if !b.pool.is_nullable(datatype) => {
            let constructor = b.program.template(template).function;
            Ok(open(b.program.function(constructor).sub_block))
        }
        TypeData::Function(function) => Ok(open(b.program.function(function).sub_block)),
        TypeData::EnumClass(function) => Ok(MemberScope {
            block: b.program.function(function).sub_block,
            enumeration: Some(function),
            closed: true,
        }),
        _ => {
            let tag = b.pool.tag(datatype);
            let template = tag
                .builtin_template_name()
                .and_then(|name| b.program.interner().get(name))
                .and_then(|name| b.program.find_ident_in_block(b.program.root_block(), name))
                .and_then(|ident| b.program.ident_function(ident));
            match template {
                Some(constructor) => Ok(MemberScope {
                    block: b.program.function(constructor).sub_block,
                    enumeration: None,
                    closed: true,
                }),
                None => Err(b.error_at(
                    ErrorCode::E3008,
                    at,
                    format!("`{}` has no members", b.type_name(datatype)),
                )),
            }
        }
    }
}

/// `a.b`. A nullable object is accessed as if it were not null.
pub(super) fn bind_dot(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let left_type = b.expr_type(left)?;
    let Some(name) = b.program.expr_name(right) else {
        return Err(b.error_at(ErrorCode::E9001, right, "member name must be an identifier"));
    };
    let scope = member_scope(b, left, left_type)?;
    let Some(ident) = b.program.find_ident_in_block(scope.block, name) else {
        if scope.closed {
            return Err(b.error_at(
                ErrorCode::E3008,
                right,
                format!(
                    "`{}` has no member `{}`",
                    b.type_name(left_type),
                    b.program.name_str(name)
                ),
            ));
        }
        let ident = b.program.create_undefined_ident(scope.block, name);
        b.program.expr_mut(right).ident = Some(ident);
        return b.suspend(Event::IdentifierDefined(ident));
    };

    if let (Some(enumeration), IdentTarget::Variable(_)) =
        (scope.enumeration, b.program.ident(ident).target)
    {
        let datatype = b.pool.enum_of(b.program, enumeration);
        b.program.expr_mut(right).ident = Some(ident);
        b.program.expr_mut(right).is_const = true;
        b.program.expr_mut(expr).is_const = true;
        b.set_type(right, datatype)?;
        return b.set_type(expr, datatype);
    }

    let progress = bind_resolved_ident(b, right, ident)?;
    if progress != Progress::Done {
        return Ok(progress);
    }
    let member = b.program.expr(right);
    let (datatype, is_type, is_const) = (member.datatype, member.is_type, member.is_const);
    let record = b.program.expr_mut(expr);
    record.is_type = is_type;
    record.is_const = is_const;
    record.datatype = datatype;
    Ok(Progress::Done)
}

/// `a[i]`: arrays and strings take a public unsigned index; tuples and
/// structs take a constant.
pub(super) fn bind_index(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let (left, right) = binary_operands(b, expr)?;
    let left_type = b.expr_type(left)?;
    let secret = b.pool.is_secret(left_type);
    match b.pool.tag(left_type) {
        Tag::Array | Tag::String => {
            require_public_uint(b, right, "index")?;
            let element = match b.pool.element(left_type) {
                Some(element) => element,
                None => b.pool.set_secret(TypeId::U8, secret),
            };
            b.set_type(expr, element)
        }
        Tag::Tuple | Tag::Struct => {
            let Literal::Integer { value, .. } = b.program.expr(right).literal else {
                return Err(b.error_at(
                    ErrorCode::E2007,
                    right,
                    "tuple and struct indexes must be constant integers",
                ));
            };
            let fields = b.pool.type_list(left_type);
            let field = usize::try_from(value).ok().and_then(|index| fields.get(index)).copied();
            let Some(field) = field else {
                return Err(b.error_at(
                    ErrorCode::E2007,
                    right,
                    format!(
                        "index {value} is out of range for `{}`",
                        b.type_name(left_type)
                    ),
                ));
            };
            b.set_type(expr, field)
        }
        _ => Err(b.error_at(
            ErrorCode::E2007,
            left,
            format!("cannot index a value of type `{}`", b.type_name(left_type)),
        )),
    }
}

/// `a[lo:hi]` on arrays and strings.
pub(super) fn bind_slice(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let [container, low, high] = b.program.expr(expr).children[..] else {
        return Err(b.error_at(ErrorCode::E9001, expr, "slice needs a value and two bounds"));
    };
    let datatype = b.expr_type(container)?;
    if !matches!(b.pool.tag(datatype), Tag::Array | Tag::String) {
        return Err(b.error_at(
            ErrorCode::E2007,
            container,
            format!("cannot slice a value of type `{}`", b.type_name(datatype)),
        ));
    }
    require_public_uint(b, low, "slice bound")?;
    require_public_uint(b, high, "slice bound")?;
    b.set_type(expr, datatype)
}

/// `Name<A, B>`: the class of a template for explicit parameter types.
pub(super) fn bind_template_inst(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let children = b.program.expr(expr).children.to_vec();
    let Some((&name, params)) = children.split_first() else {
        return Err(b.error_at(ErrorCode::E9001, expr, "empty template instantiation"));
    };
    let datatype = b.expr_type(name)?;
    let TypeData::Template(template) = *b.pool.data(datatype) else {
        return Err(b.error_at(
            ErrorCode::E3010,
            name,
            format!("`{}` is not a template", b.type_name(datatype)),
        ));
    };
    let constructor = b.program.template(template).function;
    let expected = b
        .program
        .block(b.program.function(constructor).sub_block)
        .variables
        .iter()
        .filter(|&&v| b.program.variable(v).in_template_signature)
        .count();
    if expected != params.len() {
        return Err(b.error_at(
            ErrorCode::E3010,
            expr,
            format!(
                "`{}` takes {expected} template parameter(s), but {} were given",
                b.program.template_name(template),
                params.len()
            ),
        ));
    }
    let mut types = Vec::with_capacity(params.len());
    for &param in params {
        types.push(b.expr_type(param)?);
    }
    let concrete = class::class_for(b, template, types);
    let class_type = b.pool.class(concrete, template);
    if b.program.expr(name).kind == ExprKind::Ident {
        b.program.expr_mut(name).is_type = true;
    }
    b.set_type_value(expr, class_type)
}
