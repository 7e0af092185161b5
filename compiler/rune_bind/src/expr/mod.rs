//! Expression binding rules.
//!
//! [`bind_expression`] computes the datatype of one expression node whose
//! children are already bound. A rule either finishes the node, suspends
//! the current binding on an event, or asks for the statement to be
//! rebound after rewriting its tree.
//!
//! # Rule Modules
//!
//! - `literals`: constants, type keywords, tuples and arrays
//! - `identifiers`: names and named call parameters
//! - `operators`: arithmetic, comparison, logic, shifts, ranges
//! - `overload`: operators implemented by class methods
//! - `conversions`: casts, secrecy, null and type-valued operators
//! - `access`: `a.b`, indexing, slicing, template instantiation
//! - `calls`: function, constructor, method and function pointer calls
//! - `assign`: `=` and compound assignment
//! - `modint`: modular arithmetic subtrees

mod access;
mod assign;
mod calls;
mod conversions;
mod identifiers;
mod literals;
mod modint;
mod operators;
mod overload;

use rune_ir::{ExprId, ExprKind};

use crate::binder::Binder;
use crate::error::BindResult;

/// Bind one expression node.
pub(crate) fn bind_expression(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let kind = b.program.expr(expr).kind;
    tracing::trace!(?expr, ?kind, "binding expression");
    if let Some(modular) = modint::preset_modular_type(b, expr) {
        return modint::bind_modular_node(b, expr, modular);
    }
    if kind.is_overloadable() {
        if let Some(progress) = overload::bind_operator_overload(b, expr, kind)? {
            return Ok(progress);
        }
    }
    bind_node(b, expr, kind)
}

/// Apply the built-in rule for `kind`, ignoring overloads.
fn bind_node(b: &mut Binder<'_>, expr: ExprId, kind: ExprKind) -> BindResult {
    use ExprKind as K;
    match kind {
        K::Integer => literals::bind_integer(b, expr),
        K::Float => literals::bind_float(b, expr),
        K::Bool => b.set_type(expr, rune_ir::TypeId::BOOL),
        K::String => b.set_type(expr, rune_ir::TypeId::STRING),
        K::Randuint => literals::bind_randuint(b, expr),
        K::UintType
        | K::IntType
        | K::FloatType
        | K::StringType
        | K::BoolType
        | K::NoneType => literals::bind_type_keyword(b, expr, kind),
        K::Tuple => literals::bind_tuple(b, expr),
        K::Array => literals::bind_array(b, expr),
        K::List => b.set_type(expr, rune_ir::TypeId::NONE),

        K::Ident => identifiers::bind_ident(b, expr),
        K::NamedParam => identifiers::bind_named_param(b, expr),

        K::Add
        | K::Sub
        | K::Mul
        | K::Div
        | K::AddTrunc
        | K::SubTrunc
        | K::MulTrunc
        | K::BitAnd
        | K::BitOr
        | K::BitXor => operators::bind_arithmetic(b, expr, kind),
        K::Mod => operators::bind_mod(b, expr),
        K::And | K::Or | K::Xor => operators::bind_logical(b, expr),
        K::Shl | K::Shr | K::Rotl | K::Rotr => operators::bind_shift(b, expr),
        K::Exp => operators::bind_exponent(b, expr),
        K::Lt | K::Le | K::Gt | K::Ge => operators::bind_relational(b, expr),
        K::Equal | K::NotEqual => operators::bind_equality(b, expr),
        K::Negate | K::NegateTrunc | K::BitNot | K::Not => operators::bind_unary(b, expr, kind),
        K::Select => operators::bind_select(b, expr),
        K::In => operators::bind_in(b, expr),
        K::DotDotDot => operators::bind_range(b, expr),

        K::Cast | K::CastTrunc => conversions::bind_cast(b, expr),
        K::Signed | K::Unsigned => conversions::bind_sign_change(b, expr, kind == K::Signed),
        K::Secret | K::Reveal => conversions::bind_secrecy(b, expr, kind == K::Secret),
        K::Null => conversions::bind_null(b, expr),
        K::NotNull => conversions::bind_not_null(b, expr),
        K::Isnull => conversions::bind_isnull(b, expr),
        K::Typeof => conversions::bind_typeof(b, expr),
        K::Arrayof => conversions::bind_arrayof(b, expr),
        K::Widthof => b.set_type(expr, rune_ir::TypeId::U32),
        K::FuncAddr => conversions::bind_funcaddr(b, expr),

        K::Dot => access::bind_dot(b, expr),
        K::Index => access::bind_index(b, expr),
        K::Slice => access::bind_slice(b, expr),
        K::TemplateInst => access::bind_template_inst(b, expr),
        K::Call => calls::bind_call(b, expr),

        K::Modint => modint::bind_modint(b, expr),

        _ if kind.is_assignment() => assign::bind_assignment(b, expr, kind),
        _ => Err(b.error_at(
            rune_diagnostic::ErrorCode::E9001,
            expr,
            format!("no binding rule for {kind:?} expressions"),
        )),
    }
}
