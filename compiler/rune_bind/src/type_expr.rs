//! Matching datatypes against source-level type constraints.
//!
//! Constraint expressions are bound like any other expression, without
//! instantiation, so every node already carries its datatype. Matching
//! walks the bound tree:
//!
//! | Constraint | Matches |
//! |---|---|
//! | `A \| B` | either side |
//! | `u1 ... u32` | unsigned integers of a width in range |
//! | `secret(T)` | secret values whose public type matches `T` |
//! | `null(T)` | the non-null type matching `T` |
//! | `[T]`, `(A, B)` | arrays and tuples of matching members |
//! | class name | any class of that template |
//! | struct or enum name | values of that struct or enum |
//! | type keyword | that type, secret or not |

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, FuncKind, Literal, TypeId};
use rune_types::{Tag, TypeData};

use crate::binder::Binder;

/// True if `datatype` satisfies the bound constraint expression `expr`.
pub(crate) fn matches_type_expr(
    binder: &mut Binder<'_>,
    datatype: TypeId,
    expr: ExprId,
) -> Result<bool, Diagnostic> {
    let kind = binder.program.expr(expr).kind;
    let children = binder.program.expr(expr).children.clone();
    let secret = binder.pool.is_secret(datatype);
    match kind {
        ExprKind::BitOr => {
            for child in children {
                if matches_type_expr(binder, datatype, child)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        ExprKind::Array => {
            let Some(element) = binder.pool.element(datatype) else {
                return Ok(false);
            };
            match children.first() {
                Some(&child) => matches_type_expr(binder, element, child),
                None => Ok(true),
            }
        }
        ExprKind::Tuple => {
            if binder.pool.tag(datatype) != Tag::Tuple {
                return Ok(false);
            }
            let fields = binder.pool.type_list(datatype).to_vec();
            if fields.len() != children.len() {
                return Ok(false);
            }
            for (field, child) in fields.into_iter().zip(children) {
                if !matches_type_expr(binder, field, child)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        ExprKind::Secret => {
            if !secret {
                return Ok(false);
            }
            let public = binder.pool.set_secret(datatype, false);
            match children.first() {
                Some(&child) => matches_type_expr(binder, public, child),
                None => Ok(false),
            }
        }
        ExprKind::Reveal => Err(binder.error_at(
            ErrorCode::E2003,
            expr,
            "reveal is not allowed in type constraints",
        )),
        ExprKind::Null => {
            let non_null = binder.pool.set_nullable(datatype, false).unwrap_or(datatype);
            match children.first() {
                Some(&child) => matches_type_expr(binder, non_null, child),
                None => Ok(false),
            }
        }
        ExprKind::DotDotDot => Ok(matches_width_range(binder, datatype, &children)),
        ExprKind::UintType
        | ExprKind::IntType
        | ExprKind::FloatType
        | ExprKind::StringType
        | ExprKind::BoolType
        | ExprKind::NoneType => {
            let keyword = binder.expr_type(expr)?;
            Ok(binder.pool.set_secret(keyword, secret) == datatype)
        }
        ExprKind::Ident | ExprKind::Dot | ExprKind::Typeof | ExprKind::TemplateInst => {
            matches_named_type(binder, datatype, expr)
        }
        _ => Err(binder.error_at(
            ErrorCode::E2003,
            expr,
            "invalid type constraint expression",
        )),
    }
}

/// `u<lo> ... u<hi>` or `i<lo> ... i<hi>`.
fn matches_width_range(binder: &Binder<'_>, datatype: TypeId, children: &[ExprId]) -> bool {
    let [low, high] = children else {
        return false;
    };
    let wanted = match binder.program.expr(*low).kind {
        ExprKind::UintType => Tag::Uint,
        _ => Tag::Int,
    };
    if binder.pool.tag(datatype) != wanted {
        return false;
    }
    let width_of = |expr: ExprId| match binder.program.expr(expr).literal {
        Literal::Width(width) => Some(width),
        _ => None,
    };
    match (width_of(*low), width_of(*high), binder.pool.width(datatype)) {
        (Some(low), Some(high), Some(width)) => low <= width && width <= high,
        _ => false,
    }
}

/// A name or computed type: classes match by template, structs and enums
/// by function, type-valued variables exactly.
fn matches_named_type(
    binder: &mut Binder<'_>,
    datatype: TypeId,
    expr: ExprId,
) -> Result<bool, Diagnostic> {
    let constraint = binder.expr_type(expr)?;
    if constraint == datatype {
        return Ok(true);
    }
    match binder.pool.data(constraint).clone() {
        TypeData::Template(template) => {
            if binder.pool.is_nullable(datatype) {
                return Ok(false);
            }
            Ok(binder.pool.tag(datatype) == Tag::Class
                && binder.pool.template_of(datatype) == Some(template))
        }
        TypeData::Class { template, .. } => Ok(binder.pool.tag(datatype) == Tag::Class
            && binder.pool.template_of(datatype) == Some(template)
            && !binder.pool.is_nullable(datatype)),
        TypeData::EnumClass(function) => Ok(binder.pool.tag(datatype) == Tag::Enum
            && binder.pool.function_of(datatype) == Some(function)),
        TypeData::Function(function) => {
            if binder.program.function(function).kind != FuncKind::Struct {
                return Err(binder.error_at(
                    ErrorCode::E2010,
                    expr,
                    format!(
                        "`{}` is a function, not a type",
                        binder.program.function_name(function)
                    ),
                ));
            }
            Ok(binder.pool.tag(datatype) == Tag::Struct
                && binder.pool.function_of(datatype) == Some(function))
        }
        _ => {
            if !binder.program.expr(expr).is_type {
                return Err(binder.error_at(
                    ErrorCode::E2010,
                    expr,
                    "constraint is a value, not a type",
                ));
            }
            let secret = binder.pool.is_secret(datatype);
            Ok(binder.pool.set_secret(constraint, secret) == datatype)
        }
    }
}
