//! Work done once a binding's expressions are all bound.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{
    BlockId, ExprId, ExprKind, FuncKind, FunctionId, SignatureId, StatementId, StmtKind, TypeId,
    VariableId,
};
use rune_types::Tag;

use crate::binder::Binder;
use crate::graph::{BindingId, BindingKind};
use crate::type_expr::matches_type_expr;
use crate::{printf, transformer};

impl Binder<'_> {
    pub(super) fn post_process(&mut self, id: BindingId) -> Result<(), Diagnostic> {
        let binding = self.graph.binding(id);
        let signature = binding.signature;
        let instantiating = binding.instantiating;
        match binding.kind {
            BindingKind::Statement(statement) => {
                self.post_process_statement(id, statement, signature, instantiating)
            }
            BindingKind::DefaultValue(variable) => self.finish_default_value(variable),
            BindingKind::VarConstraint(variable) => self.finish_variable_constraint(variable),
            BindingKind::FuncConstraint(function) => {
                self.finish_return_constraint(id, function, signature)
            }
        }
    }

    fn post_process_statement(
        &mut self,
        id: BindingId,
        statement: StatementId,
        signature: Option<SignatureId>,
        instantiating: bool,
    ) -> Result<(), Diagnostic> {
        let kind = self.program.statement(statement).kind;
        let expr = self.program.statement(statement).expr;
        match kind {
            StmtKind::Return | StmtKind::Yield => {
                let Some(signature) = signature else {
                    return Ok(());
                };
                let function = self.program.signature(signature).uniquified;
                let is_iterator = self.program.function(function).kind == FuncKind::Iterator;
                let datatype = match expr {
                    Some(expr) => self.expr_type(expr)?,
                    // A bare return ends an iterator; it yields nothing.
                    None if is_iterator => return Ok(()),
                    None => TypeId::NONE,
                };
                self.update_return_type(signature, datatype, self.binding_span(id))
            }
            StmtKind::Typeswitch => {
                let Some(expr) = expr else {
                    return Ok(());
                };
                self.select_typeswitch_case(statement, expr, signature, instantiating)
            }
            StmtKind::Switch => match expr {
                Some(expr) if self.program.expr(expr).is_type => Err(self.error_at(
                    ErrorCode::E2009,
                    expr,
                    "cannot switch on a type, use typeswitch",
                )),
                _ => Ok(()),
            },
            StmtKind::If | StmtKind::ElseIf | StmtKind::While => match expr {
                Some(expr) => self.require_bool_condition(expr),
                None => Ok(()),
            },
            StmtKind::For => {
                let condition = expr.and_then(|list| self.program.child(list, 1));
                match condition {
                    Some(condition) => self.require_bool_condition(condition),
                    None => Ok(()),
                }
            }
            StmtKind::Print | StmtKind::Raise => match expr {
                Some(expr) => printf::verify_print_arguments(self, expr, kind == StmtKind::Raise),
                None => Ok(()),
            },
            StmtKind::Ref | StmtKind::Unref => match expr {
                Some(expr) if self.tag(expr)? != Tag::Class => Err(self.error_at(
                    ErrorCode::E2002,
                    expr,
                    "ref and unref take an object reference",
                )),
                _ => Ok(()),
            },
            StmtKind::Relation => transformer::execute_relation(self, statement),
            _ => Ok(()),
        }
    }

    fn require_bool_condition(&self, expr: ExprId) -> Result<(), Diagnostic> {
        if self.tag(expr)? == Tag::Bool {
            return Ok(());
        }
        let found = self.expr_type(expr)?;
        Err(self.error_at(
            ErrorCode::E2002,
            expr,
            format!("condition must be bool, found `{}`", self.type_name(found)),
        ))
    }

    /// Queue the body of the first case whose type matches the switched
    /// expression, falling back to `default`.
    fn select_typeswitch_case(
        &mut self,
        statement: StatementId,
        expr: ExprId,
        signature: Option<SignatureId>,
        instantiating: bool,
    ) -> Result<(), Diagnostic> {
        let datatype = self.expr_type(expr)?;
        let Some(cases) = self.program.statement(statement).sub_block else {
            return Ok(());
        };
        let mut selected = None;
        let mut default = None;
        'cases: for case in self.program.block(cases).statements.clone() {
            match self.program.statement(case).kind {
                StmtKind::Case => {
                    let Some(list) = self.program.statement(case).expr else {
                        continue;
                    };
                    for type_expr in self.program.expr(list).children.clone() {
                        if matches_type_expr(self, datatype, type_expr)? {
                            selected = Some(case);
                            break 'cases;
                        }
                    }
                }
                StmtKind::Default => default = default.or(Some(case)),
                _ => {}
            }
        }
        let Some(case) = selected.or(default) else {
            return Err(self.error_at(
                ErrorCode::E3011,
                expr,
                format!("no typeswitch case matches `{}`", self.type_name(datatype)),
            ));
        };
        tracing::trace!(?statement, ?case, "selected typeswitch case");
        self.program.statement_mut(case).instantiated = instantiating;
        if let Some(body) = self.program.statement(case).sub_block {
            self.queue_block(signature, body, instantiating);
        }
        Ok(())
    }

    fn finish_default_value(&mut self, variable: VariableId) -> Result<(), Diagnostic> {
        let Some(initializer) = self.program.variable(variable).initializer else {
            return Ok(());
        };
        let datatype = self.expr_type(initializer)?;
        if self.program.expr(initializer).is_type {
            self.program.variable_mut(variable).is_type = true;
        }
        self.update_variable(variable, datatype, initializer)?;
        self.check_variable_constraint(variable)
    }

    /// The variable may not have a type yet; the default value binding
    /// checks the constraint again once it does.
    fn finish_variable_constraint(&mut self, variable: VariableId) -> Result<(), Diagnostic> {
        if self.program.variable(variable).datatype.is_none() {
            return Ok(());
        }
        self.check_variable_constraint(variable)
    }

    /// Check a typed variable against its constraint, if the constraint is
    /// bound.
    pub(crate) fn check_variable_constraint(&mut self, variable: VariableId) -> Result<(), Diagnostic> {
        let record = self.program.variable(variable);
        let (Some(type_expr), Some(datatype)) = (record.type_expr, record.datatype) else {
            return Ok(());
        };
        if self.program.expr(type_expr).datatype.is_none() {
            return Ok(());
        }
        if matches_type_expr(self, datatype, type_expr)? {
            return Ok(());
        }
        Err(self.error_at(
            ErrorCode::E2003,
            type_expr,
            format!(
                "variable `{}` expected to have type matching its constraint, got `{}`",
                self.program.variable_name(variable),
                self.type_name(datatype)
            ),
        ))
    }

    fn finish_return_constraint(
        &mut self,
        id: BindingId,
        function: FunctionId,
        signature: Option<SignatureId>,
    ) -> Result<(), Diagnostic> {
        let (Some(type_expr), Some(signature)) = (self.program.function(function).type_expr, signature)
        else {
            return Ok(());
        };
        let constraint = self.expr_type(type_expr)?;
        if self.program.function(function).is_extern() {
            let Some(concrete) = self.pool.find_unique_concrete(self.program, constraint) else {
                return Err(self.error_at(
                    ErrorCode::E2011,
                    type_expr,
                    format!(
                        "extern function return type `{}` must be concrete",
                        self.type_name(constraint)
                    ),
                ));
            };
            self.set_return_type(signature, concrete);
            return Ok(());
        }
        let is_range = matches!(
            self.program.expr(type_expr).kind,
            ExprKind::BitOr | ExprKind::DotDotDot
        );
        if !is_range && self.pool.is_concrete(constraint) {
            self.update_return_type(signature, constraint, self.binding_span(id))?;
        }
        Ok(())
    }

    /// Every case value of a value `switch` must have the switched type.
    pub(super) fn verify_switch_cases(&mut self, block: BlockId) -> Result<(), Diagnostic> {
        for statement in self.program.block(block).statements.clone() {
            let record = self.program.statement(statement);
            let (kind, expr, sub_block) = (record.kind, record.expr, record.sub_block);
            let Some(sub_block) = sub_block else {
                continue;
            };
            if kind == StmtKind::Switch {
                if let Some(expr) = expr {
                    self.verify_case_values(expr, sub_block)?;
                }
            }
            self.verify_switch_cases(sub_block)?;
        }
        Ok(())
    }

    fn verify_case_values(&mut self, switched: ExprId, cases: BlockId) -> Result<(), Diagnostic> {
        let Some(expected) = self.program.expr(switched).datatype else {
            return Ok(());
        };
        for case in self.program.block(cases).statements.clone() {
            let Some(list) = self.program.statement(case).expr else {
                continue;
            };
            for value in self.program.expr(list).children.clone() {
                let Some(found) = self.program.expr(value).datatype else {
                    continue;
                };
                let autocast = self.program.expr(value).autocast
                    && self.pool.is_integer(expected)
                    && self.pool.is_integer(found);
                if found != expected && !autocast && self.unify(expected, found).is_err() {
                    return Err(self.error_at(
                        ErrorCode::E2009,
                        value,
                        format!(
                            "case has type `{}`, but the switch is on `{}`",
                            self.type_name(found),
                            self.type_name(expected)
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}
