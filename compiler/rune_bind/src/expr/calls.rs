//! Calls.
//!
//! A call `f(args)` is the tree `Call(access, List(args))`. Binding it
//! builds the parameter type tuple, then finds or creates the signature of
//! the callee for that tuple:
//!
//! 1. A `Funcptr` callee is checked directly against its parameter types
//! 2. A dot call on an object passes the object as `self`
//! 3. Positional arguments fill parameters left to right
//! 4. Named arguments fill the parameter of that name
//! 5. Parameters left empty must have a default value
//! 6. Constructors pick the class for their template parameter types
//!
//! The call's type is the signature's return type, which may not be known
//! until the signature finishes binding.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{
    ClassId, ExprId, ExprKind, FuncKind, FunctionId, Linkage, SignatureId, TypeId, VarKind,
    VariableId,
};
use rune_types::{Tag, TypeData};

use crate::binder::Binder;
use crate::error::BindResult;
use crate::graph::Event;
use crate::{builtins, class};

pub(super) fn bind_call(b: &mut Binder<'_>, expr: ExprId) -> BindResult {
    let [access, list] = b.program.expr(expr).children[..] else {
        return Err(b.error_at(ErrorCode::E9001, expr, "call without an argument list"));
    };
    let args: Vec<ExprId> = b.program.expr(list).children.to_vec();
    let callee_type = b.expr_type(access)?;
    if b.pool.tag(callee_type) == Tag::Funcptr {
        return bind_funcptr_call(b, expr, callee_type, &args);
    }
    let function = match *b.pool.data(callee_type) {
        TypeData::Function(function) => function,
        TypeData::Template(template) => b.program.template(template).function,
        _ => {
            return Err(b.error_at(
                ErrorCode::E3005,
                access,
                format!("`{}` is not callable", b.type_name(callee_type)),
            ))
        }
    };
    check_callable(b, expr, function)?;
    let receiver = method_receiver(b, access, function)?;

    if b.program.function(function).is_builtin() {
        if b.program.function(function).kind == FuncKind::Constructor {
            return Err(b.error_at(
                ErrorCode::E3006,
                access,
                format!(
                    "builtin class `{}` cannot be constructed",
                    b.program.function_name(function)
                ),
            ));
        }
        return builtins::bind_builtin_method(b, expr, function, receiver, &args);
    }

    let parameters = parameter_variables(b, function);
    let is_constructor = b.program.function(function).kind == FuncKind::Constructor;
    let has_self = is_constructor
        && parameters
            .first()
            .is_some_and(|&v| b.program.variable_name(v) == "self");
    let mut slots = CallSlots::new(parameters.len());
    if has_self {
        slots.skip_first();
    } else if let Some(receiver) = receiver {
        slots.fill_receiver(receiver);
    }
    slots.fill_args(b, expr, function, &parameters, &args)?;
    let (mut params, arg_exprs) = slots.finish(b, expr, function, &parameters, has_self)?;

    let mut class = None;
    if is_constructor {
        let Some(template) = b.program.function(function).template else {
            return Err(b.error_at(ErrorCode::E9001, expr, "constructor without a template"));
        };
        let template_params: Vec<TypeId> = (0..parameters.len())
            .filter(|&index| b.program.variable(parameters[index]).in_template_signature)
            .filter_map(|index| params[index])
            .collect();
        let concrete = class::class_for(b, template, template_params);
        if has_self {
            params[0] = Some(b.pool.class(concrete, template));
        }
        class = Some(concrete);
    }
    bind_signature_call(b, expr, function, params, class, &arg_exprs)
}

/// Find or create the signature for `params` and type `expr` with its
/// return type, suspending until that type is known.
pub(super) fn bind_signature_call(
    b: &mut Binder<'_>,
    expr: ExprId,
    function: FunctionId,
    params: Vec<Option<TypeId>>,
    class: Option<ClassId>,
    args: &[Option<ExprId>],
) -> BindResult {
    let signature = match b.program.lookup_signature(function, &params) {
        Some(signature) => signature,
        None => {
            let caller = b.current_signature();
            let statement = b.program.expr_statement(expr);
            let span = b.program.expr(expr).span;
            let signature = b.program.create_signature(function, params, span, caller, statement);
            if let Some(class) = class {
                b.program.signature_mut(signature).class = Some(class);
                b.program.class_mut(class).signatures.push(signature);
            }
            tracing::debug!(
                ?signature,
                function = b.program.function_name(function),
                "created signature"
            );
            signature
        }
    };
    b.program.expr_mut(expr).signature = Some(signature);
    if b.program.expr(expr).instantiating {
        b.program.signature_mut(signature).instantiated = true;
    }
    b.queue_signature(signature)?;

    let record = b.program.signature(signature);
    if !record.bound {
        return b.suspend(Event::ReturnTypeKnown(signature));
    }
    let datatype = record.return_type.unwrap_or(TypeId::NONE);
    check_passed_arguments(b, expr, signature, args)?;
    b.set_type(expr, datatype)
}

/// A `var` parameter must be passed a non-const variable, and a parameter
/// whose value the callee reads cannot be passed a type.
fn check_passed_arguments(
    b: &Binder<'_>,
    expr: ExprId,
    signature: SignatureId,
    args: &[Option<ExprId>],
) -> Result<(), Diagnostic> {
    let instantiating = b.program.expr(expr).instantiating;
    let params = &b.program.signature(signature).params;
    for (param, arg) in params.iter().zip(args) {
        let Some(arg) = *arg else {
            continue;
        };
        let value = passed_value(b, arg);
        if !b.program.variable(param.variable).is_const && !is_mutable_variable(b, value) {
            return Err(b.error_at(
                ErrorCode::E3012,
                value,
                format!(
                    "parameter `{}` must be passed a non-const variable",
                    b.program.variable_name(param.variable)
                ),
            ));
        }
        if instantiating && param.instantiated && b.program.expr(arg).is_type {
            return Err(b.error_at(
                ErrorCode::E3004,
                arg,
                format!(
                    "Parameter {} cannot be a type since its value is used",
                    b.program.variable_name(param.variable)
                ),
            ));
        }
    }
    Ok(())
}

/// The value of a `name = value` argument, or the argument itself.
fn passed_value(b: &Binder<'_>, arg: ExprId) -> ExprId {
    if b.program.expr(arg).kind == ExprKind::NamedParam {
        return b.program.child(arg, 1).unwrap_or(arg);
    }
    arg
}

fn is_mutable_variable(b: &Binder<'_>, expr: ExprId) -> bool {
    let record = b.program.expr(expr);
    if record.kind != ExprKind::Ident {
        return false;
    }
    record
        .ident
        .and_then(|ident| b.program.ident_variable(ident))
        .is_some_and(|variable| !b.program.variable(variable).is_const)
}

fn bind_funcptr_call(b: &mut Binder<'_>, expr: ExprId, callee: TypeId, args: &[ExprId]) -> BindResult {
    let expected = b.pool.type_list(callee).to_vec();
    if expected.len() != args.len() {
        return Err(b.error_at(
            ErrorCode::E3001,
            expr,
            format!(
                "function pointer takes {} argument(s), but {} were passed",
                expected.len(),
                args.len()
            ),
        ));
    }
    for (&arg, &want) in args.iter().zip(&expected) {
        let found = b.expr_type(arg)?;
        let autocast = b.program.expr(arg).autocast && b.pool.is_integer(found) && b.pool.is_integer(want);
        if found != want && !autocast {
            return Err(b.mismatch(arg, "function pointer argument", want, found));
        }
    }
    let datatype = b.pool.funcptr_return(callee).unwrap_or(TypeId::NONE);
    b.set_type(expr, datatype)
}

/// Package-linkage functions may only be called from inside a package.
fn check_callable(b: &Binder<'_>, expr: ExprId, function: FunctionId) -> Result<(), Diagnostic> {
    if b.program.function(function).linkage != Linkage::Package {
        return Ok(());
    }
    let module = b.program.module_block(b.scope());
    let from_package = b
        .program
        .owning_function(module)
        .is_some_and(|caller| b.program.function(caller).kind == FuncKind::Package);
    if from_package {
        return Ok(());
    }
    Err(b.error_at(
        ErrorCode::E3006,
        expr,
        format!(
            "`{}` is only callable from within its package",
            b.program.function_name(function)
        ),
    ))
}

/// The object a method is called on, as the type of its `self` argument.
fn method_receiver(
    b: &mut Binder<'_>,
    access: ExprId,
    function: FunctionId,
) -> Result<Option<TypeId>, Diagnostic> {
    if b.program.expr(access).kind != ExprKind::Dot {
        return Ok(None);
    }
    let Some(object) = b.program.first_child(access) else {
        return Ok(None);
    };
    if b.program.expr(object).is_type {
        return Ok(None);
    }
    let datatype = b.expr_type(object)?;
    let is_method = match b.pool.tag(datatype) {
        Tag::Class => true,
        Tag::Template | Tag::Function | Tag::EnumClass => false,
        _ => b.program.function(function).is_builtin(),
    };
    if !is_method {
        return Ok(None);
    }
    let receiver = b.pool.set_nullable(datatype, false).unwrap_or(datatype);
    Ok(Some(receiver))
}

pub(super) fn parameter_variables(b: &Binder<'_>, function: FunctionId) -> Vec<VariableId> {
    let block = b.program.function(function).sub_block;
    b.program
        .block(block)
        .variables
        .iter()
        .copied()
        .filter(|&v| b.program.variable(v).kind == VarKind::Parameter)
        .collect()
}

/// Parameter types and argument expressions, by parameter position.
struct CallSlots {
    types: Vec<Option<TypeId>>,
    arg_exprs: Vec<Option<ExprId>>,
    filled: Vec<bool>,
    next: usize,
}

impl CallSlots {
    fn new(count: usize) -> Self {
        CallSlots {
            types: vec![None; count],
            arg_exprs: vec![None; count],
            filled: vec![false; count],
            next: 0,
        }
    }

    /// The constructor fills `self` itself.
    fn skip_first(&mut self) {
        if let Some(first) = self.filled.first_mut() {
            *first = true;
        }
        self.next = 1;
    }

    fn fill_receiver(&mut self, receiver: TypeId) {
        if let Some(first) = self.types.first_mut() {
            *first = Some(receiver);
            self.filled[0] = true;
            self.next = 1;
        }
    }

    fn fill_args(
        &mut self,
        b: &mut Binder<'_>,
        expr: ExprId,
        function: FunctionId,
        parameters: &[VariableId],
        args: &[ExprId],
    ) -> Result<(), Diagnostic> {
        for &arg in args {
            let index = if b.program.expr(arg).kind == ExprKind::NamedParam {
                named_index(b, arg, function, parameters)?
            } else {
                let index = self.next;
                self.next += 1;
                index
            };
            if index >= parameters.len() {
                return Err(b.error_at(
                    ErrorCode::E3001,
                    expr,
                    format!(
                        "`{}` takes {} argument(s), but more were passed",
                        b.program.function_name(function),
                        parameters.len()
                    ),
                ));
            }
            if self.filled[index] {
                return Err(b.error_at(
                    ErrorCode::E3002,
                    arg,
                    format!(
                        "parameter `{}` is passed more than once",
                        b.program.variable_name(parameters[index])
                    ),
                ));
            }
            self.filled[index] = true;
            self.types[index] = Some(b.expr_type(arg)?);
            self.arg_exprs[index] = Some(arg);
        }
        Ok(())
    }

    /// Every parameter not passed must have a default value.
    fn finish(
        self,
        b: &Binder<'_>,
        expr: ExprId,
        function: FunctionId,
        parameters: &[VariableId],
        has_self: bool,
    ) -> Result<(Vec<Option<TypeId>>, Vec<Option<ExprId>>), Diagnostic> {
        for (index, &variable) in parameters.iter().enumerate() {
            let is_self = has_self && index == 0;
            if !self.filled[index] && !is_self && b.program.variable(variable).initializer.is_none() {
                return Err(b.error_at(
                    ErrorCode::E3001,
                    expr,
                    format!(
                        "missing argument for parameter `{}` of `{}`",
                        b.program.variable_name(variable),
                        b.program.function_name(function)
                    ),
                ));
            }
        }
        Ok((self.types, self.arg_exprs))
    }
}

/// Position of the parameter a named argument names. Types the name
/// expression, which is not queued with the call.
fn named_index(
    b: &mut Binder<'_>,
    arg: ExprId,
    function: FunctionId,
    parameters: &[VariableId],
) -> Result<usize, Diagnostic> {
    let name_expr = b.program.first_child(arg);
    let name = name_expr.and_then(|name| b.program.expr_name(name));
    let index = name.and_then(|name| {
        parameters
            .iter()
            .position(|&v| b.program.variable(v).name == name)
    });
    let (Some(name_expr), Some(index)) = (name_expr, index) else {
        return Err(b.error_at(
            ErrorCode::E3003,
            arg,
            format!(
                "`{}` has no parameter of that name",
                b.program.function_name(function)
            ),
        ));
    };
    let datatype = b.expr_type(arg)?;
    b.program.expr_mut(name_expr).datatype = Some(datatype);
    Ok(index)
}
