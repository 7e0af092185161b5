//! Format strings and print arguments.
//!
//! `"format" % args` and `raise Error.code, "format", args` check each
//! `%` directive of a constant format string against its argument:
//!
//! | Directive | Argument |
//! |-----------|----------|
//! | `%d` `%i` | signed integer |
//! | `%u` `%c` | unsigned integer |
//! | `%x`      | any integer |
//! | `%s`      | string |
//! | `%f`      | float |
//! | `%b`      | bool |
//! | `%%`      | none |
//!
//! A directive may carry a decimal width, as in `%08x`.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{ExprId, ExprKind, Literal, TypeId};
use rune_types::Tag;

use crate::binder::Binder;

/// Check `format % args` when the format is a string literal. A tuple
/// supplies one argument per element.
pub(crate) fn verify_format_expr(
    b: &Binder<'_>,
    expr: ExprId,
    format_expr: ExprId,
    args_expr: ExprId,
) -> Result<(), Diagnostic> {
    let Literal::Str(format) = &b.program.expr(format_expr).literal else {
        return Ok(());
    };
    let args_type = b.expr_type(args_expr)?;
    let args = if b.program.expr(args_expr).kind == ExprKind::Tuple {
        b.pool.type_list(args_type).to_vec()
    } else {
        vec![args_type]
    };
    verify_format(b, expr, format, &args)
}

/// Check every directive of `format` against `args`, in order.
fn verify_format(
    b: &Binder<'_>,
    at: ExprId,
    format: &str,
    args: &[TypeId],
) -> Result<(), Diagnostic> {
    let mut remaining = args.iter().copied();
    let mut chars = format.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        while chars.next_if(char::is_ascii_digit).is_some() {}
        let Some(directive) = chars.next() else {
            return Err(format_error(b, at, "format string ends inside a `%` directive"));
        };
        if directive == '%' {
            continue;
        }
        let Some(datatype) = remaining.next() else {
            return Err(format_error(
                b,
                at,
                format!("not enough arguments for `%{directive}`"),
            ));
        };
        let tag = b.pool.tag(datatype);
        let accepted = match directive {
            'd' | 'i' => tag == Tag::Int,
            'u' | 'c' => tag == Tag::Uint,
            'x' => tag.is_integer(),
            's' => tag == Tag::String,
            'f' => tag == Tag::Float,
            'b' => tag == Tag::Bool,
            _ => {
                return Err(format_error(
                    b,
                    at,
                    format!("unknown format directive `%{directive}`"),
                ))
            }
        };
        if !accepted {
            return Err(format_error(
                b,
                at,
                format!(
                    "`%{directive}` does not accept an argument of type `{}`",
                    b.type_name(datatype)
                ),
            ));
        }
    }
    let extra = remaining.count();
    if extra > 0 {
        return Err(format_error(
            b,
            at,
            format!("{extra} more argument(s) than format directives"),
        ));
    }
    Ok(())
}

fn format_error(b: &Binder<'_>, at: ExprId, message: impl Into<String>) -> Diagnostic {
    b.error_at(ErrorCode::E2008, at, message)
}

/// Arguments of `print`, `println` and `raise`. Secret values may not be
/// printed. `raise` takes an enum value first, then an optional format
/// string and its arguments.
pub(crate) fn verify_print_arguments(b: &Binder<'_>, list: ExprId, is_raise: bool) -> Result<(), Diagnostic> {
    let args = b.program.expr(list).children.to_vec();
    for &arg in &args {
        let datatype = b.expr_type(arg)?;
        if b.pool.is_secret(datatype) {
            return Err(b.error_at(ErrorCode::E2005, arg, "cannot print a secret value"));
        }
    }
    if !is_raise {
        return Ok(());
    }
    let Some((&code, rest)) = args.split_first() else {
        return Err(b.error_at(ErrorCode::E2002, list, "raise needs an enum value"));
    };
    if b.tag(code)? != Tag::Enum {
        let found = b.expr_type(code)?;
        return Err(b.error_at(
            ErrorCode::E2002,
            code,
            format!("raise needs an enum value first, found `{}`", b.type_name(found)),
        ));
    }
    let Some((&format_expr, format_args)) = rest.split_first() else {
        return Ok(());
    };
    let Literal::Str(format) = &b.program.expr(format_expr).literal else {
        return Ok(());
    };
    let mut types = Vec::with_capacity(format_args.len());
    for &arg in format_args {
        types.push(b.expr_type(arg)?);
    }
    verify_format(b, format_expr, format, &types)
}

#[cfg(test)]
mod tests;
