//! Completing a signature once its last binding finishes.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{BlockId, FuncKind, SignatureId, TypeId};

use crate::binder::Binder;
use crate::class;
use crate::type_expr::matches_type_expr;

impl Binder<'_> {
    /// Record per-parameter facts and settle the return type.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn finish_signature(&mut self, signature: SignatureId) -> Result<(), Diagnostic> {
        let function = self.program.signature(signature).uniquified;
        let block = self.program.signature_block(signature);
        self.verify_switch_cases(block)?;
        self.verify_type_variables(block)?;
        self.update_paramspecs(signature);

        let kind = self.program.function(function).kind;
        let is_extern = self.program.function(function).is_extern();
        if kind == FuncKind::Struct {
            let Some(datatype) = self.pool.struct_of(self.program, function) else {
                return Err(self.error_at_span(
                    ErrorCode::E2011,
                    self.program.signature(signature).span,
                    format!(
                        "fields of struct `{}` must have concrete types",
                        self.program.function_name(function)
                    ),
                ));
            };
            self.set_return_type(signature, datatype);
        } else if kind == FuncKind::Constructor {
            class::finish_constructor(self, signature)?;
        } else if is_extern {
            self.verify_extern_parameters(signature)?;
            if self.program.function(function).type_expr.is_none() {
                self.set_return_type(signature, TypeId::NONE);
            }
        }

        let record = self.program.signature(signature);
        match record.return_type {
            // Only `throw`, or no return statement at all.
            None => self.set_return_type(signature, TypeId::NONE),
            Some(_) if !record.bound => self.mark_bound(signature),
            Some(_) => {}
        }
        self.verify_return_constraint(signature)
    }

    fn update_paramspecs(&mut self, signature: SignatureId) {
        let is_destructor = {
            let function = self.program.signature(signature).function;
            self.program.function(function).kind == FuncKind::Destructor
        };
        let count = self.program.signature(signature).params.len();
        for index in 0..count {
            let variable = self.program.signature(signature).params[index].variable;
            let is_type = self.program.variable(variable).is_type;
            let instantiated =
                self.program.variable(variable).instantiated || (is_destructor && index == 0);
            let param = &mut self.program.signature_mut(signature).params[index];
            param.is_type = is_type;
            param.instantiated = instantiated;
        }
    }

    /// A variable holding a type has no runtime value to read.
    fn verify_type_variables(&self, block: BlockId) -> Result<(), Diagnostic> {
        for &variable in &self.program.block(block).variables {
            let record = self.program.variable(variable);
            if record.is_type && record.instantiated {
                return Err(self.error_at_span(
                    ErrorCode::E2010,
                    record.span,
                    format!(
                        "`{}` holds a type but is used as a runtime value",
                        self.program.variable_name(variable)
                    ),
                ));
            }
        }
        Ok(())
    }

    fn verify_extern_parameters(&self, signature: SignatureId) -> Result<(), Diagnostic> {
        for param in &self.program.signature(signature).params {
            let Some(datatype) = param.datatype else {
                continue;
            };
            if !self.pool.is_concrete(datatype) {
                return Err(self.error_at_span(
                    ErrorCode::E2011,
                    self.program.variable(param.variable).span,
                    format!(
                        "extern function parameter `{}` has non-concrete type `{}`",
                        self.program.variable_name(param.variable),
                        self.type_name(datatype)
                    ),
                ));
            }
        }
        Ok(())
    }

    fn verify_return_constraint(&mut self, signature: SignatureId) -> Result<(), Diagnostic> {
        let function = self.program.signature(signature).uniquified;
        let (Some(type_expr), Some(datatype)) = (
            self.program.function(function).type_expr,
            self.program.signature(signature).return_type,
        ) else {
            return Ok(());
        };
        if self.program.expr(type_expr).datatype.is_none() || matches_type_expr(self, datatype, type_expr)? {
            return Ok(());
        }
        Err(self.error_at(
            ErrorCode::E2003,
            type_expr,
            format!(
                "`{}` returns `{}`, which does not match its return type constraint",
                self.program.function_name(function),
                self.type_name(datatype)
            ),
        ))
    }
}
