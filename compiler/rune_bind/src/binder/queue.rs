//! Turning statements, blocks and signatures into bindings.
//!
//! Expressions are queued children first so that a rule always sees bound
//! operands. A few kinds pull children back out of the queue because their
//! rule binds them against a computed scope:
//!
//! - `=` binds its identifier or dot target itself
//! - `.` binds its right-hand identifier in the left operand's scope
//! - a named parameter binds its name against the callee's block

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{
    BlockId, ExprKind, FuncKind, FunctionId, SignatureId, StatementId, StmtKind,
    UnreachableStatement, VarKind, VariableId,
};

use super::Binder;
use crate::graph::{BindingId, BindingKind};

impl Binder<'_> {
    /// Queue `expr` and its subtree on `binding`.
    pub(crate) fn queue_expression(
        &mut self,
        binding: BindingId,
        expr: rune_ir::ExprId,
        instantiating: bool,
        lhs: bool,
    ) {
        {
            let record = self.program.expr_mut(expr);
            record.instantiating = instantiating;
            record.lhs = lhs;
        }
        let kind = self.program.expr(expr).kind;
        let children = self.program.expr(expr).children.clone();

        if kind == ExprKind::Modint {
            // The modulus is bound first so the modular type exists before
            // the value tree is bound.
            if let [value, modulus] = children[..] {
                self.queue_expression(binding, modulus, instantiating, false);
                self.graph.binding_mut(binding).queue.push_back(expr);
                self.queue_expression(binding, value, instantiating, false);
            }
            return;
        }

        for (index, &child) in children.iter().enumerate() {
            let child_instantiating =
                instantiating && (index > 0 || !kind.uses_first_child_as_type());
            let child_lhs = (kind == ExprKind::Equals && index == 0) || lhs;
            self.queue_expression(binding, child, child_instantiating, child_lhs);
        }
        self.graph.binding_mut(binding).queue.push_back(expr);

        let unqueue = match kind {
            ExprKind::Equals => children.first().copied().filter(|&target| {
                matches!(self.program.expr(target).kind, ExprKind::Ident | ExprKind::Dot)
            }),
            ExprKind::Dot => children.last().copied(),
            ExprKind::NamedParam => children.first().copied(),
            _ => None,
        };
        if let Some(child) = unqueue {
            self.graph.binding_mut(binding).queue.retain(|&queued| queued != child);
        }
    }

    /// Create a fresh binding for `statement` and queue its nested block.
    pub(crate) fn queue_statement(
        &mut self,
        signature: Option<SignatureId>,
        statement: StatementId,
        instantiating: bool,
    ) {
        let kind = self.program.statement(statement).kind;
        if kind.is_import() || matches!(kind, StmtKind::AppendCode | StmtKind::Prependcode) {
            return;
        }
        if let Some(previous) = self.graph.statement_binding(statement) {
            self.graph.remove(previous);
        }
        self.program.statement_mut(statement).instantiated = instantiating;
        let binding = self
            .graph
            .create(BindingKind::Statement(statement), signature, instantiating);
        if kind.is_directive() {
            // Run by the transformer executor once the binding completes.
            return;
        }
        if let Some(expr) = self.program.statement(statement).expr {
            self.queue_expression(binding, expr, instantiating, false);
        }
        let Some(sub_block) = self.program.statement(statement).sub_block else {
            return;
        };
        if kind == StmtKind::Typeswitch {
            self.queue_typeswitch_cases(binding, sub_block);
        } else {
            self.queue_block(signature, sub_block, instantiating);
        }
    }

    /// Case type expressions are bound with the typeswitch itself so the
    /// matching case can be chosen once that binding finishes. Case bodies
    /// are only queued once selected.
    fn queue_typeswitch_cases(&mut self, binding: BindingId, cases: BlockId) {
        for statement in self.program.block(cases).statements.clone() {
            if self.program.statement(statement).kind != StmtKind::Case {
                continue;
            }
            let Some(list) = self.program.statement(statement).expr else {
                continue;
            };
            for type_expr in self.program.expr(list).children.clone() {
                self.queue_expression(binding, type_expr, false, false);
            }
        }
    }

    pub(crate) fn queue_block(
        &mut self,
        signature: Option<SignatureId>,
        block: BlockId,
        instantiating: bool,
    ) {
        for statement in self.program.block(block).statements.clone() {
            self.queue_statement(signature, statement, instantiating);
        }
    }

    /// Queue everything needed to bind a signature. Does nothing if it is
    /// already queued, or bound and only used for its type.
    #[tracing::instrument(level = "debug", skip(self))]
    pub(crate) fn queue_signature(&mut self, signature: SignatureId) -> Result<(), Diagnostic> {
        let record = self.program.signature(signature);
        if record.queued || (record.bound && !record.instantiated) {
            return Ok(());
        }
        self.program.signature_mut(signature).queued = true;
        self.report.signatures += 1;

        let block = self.program.signature_block(signature);
        let function = self.program.signature(signature).uniquified;
        self.program
            .compute_reachability(block)
            .map_err(|UnreachableStatement(statement)| {
                self.error_at_span(
                    ErrorCode::E3007,
                    self.program.statement(statement).span,
                    "statement is unreachable",
                )
            })?;
        let record = self.program.function(function);
        let needs_return = self.program.block(block).can_continue
            && !record.is_builtin()
            && !record.is_extern()
            && !matches!(record.kind, FuncKind::Iterator | FuncKind::Struct);
        if needs_return {
            self.add_return_if_missing(function, block);
        }

        self.bind_signature_parameters(signature);
        self.queue_local_constraints(signature, block);
        if let Some(type_expr) = self.program.function(function).type_expr {
            let binding = self.graph.create(
                BindingKind::FuncConstraint(function),
                Some(signature),
                false,
            );
            self.queue_expression(binding, type_expr, false, false);
        }
        self.queue_block(Some(signature), block, true);
        if self.graph.pending_bindings(signature) == 0 {
            self.finish_signature(signature)?;
        }
        Ok(())
    }

    /// Passed parameter types go straight onto the parameter variables;
    /// parameters left out by the caller bind their default value.
    fn bind_signature_parameters(&mut self, signature: SignatureId) {
        let params: Vec<(VariableId, Option<rune_ir::TypeId>)> = self
            .program
            .signature(signature)
            .params
            .iter()
            .map(|param| (param.variable, param.datatype))
            .collect();
        for (variable, datatype) in params {
            match datatype {
                Some(datatype) => self.program.variable_mut(variable).datatype = Some(datatype),
                None => {
                    if let Some(initializer) = self.program.variable(variable).initializer {
                        let binding = self.graph.create(
                            BindingKind::DefaultValue(variable),
                            Some(signature),
                            true,
                        );
                        self.queue_expression(binding, initializer, true, false);
                    }
                }
            }
            if let Some(type_expr) = self.program.variable(variable).type_expr {
                self.queue_variable_constraint(Some(signature), variable, type_expr);
            }
        }
    }

    /// Constraints on locals are checked whenever the local is assigned;
    /// binding them up front lets the first assignment see them.
    fn queue_local_constraints(&mut self, signature: SignatureId, block: BlockId) {
        let constrained: Vec<(VariableId, rune_ir::ExprId)> = self
            .program
            .block(block)
            .variables
            .iter()
            .filter(|&&v| self.program.variable(v).kind == VarKind::Local)
            .filter_map(|&v| self.program.variable(v).type_expr.map(|expr| (v, expr)))
            .collect();
        for (variable, type_expr) in constrained {
            self.queue_variable_constraint(Some(signature), variable, type_expr);
        }
    }

    pub(crate) fn queue_variable_constraint(
        &mut self,
        signature: Option<SignatureId>,
        variable: VariableId,
        type_expr: rune_ir::ExprId,
    ) {
        let binding = self
            .graph
            .create(BindingKind::VarConstraint(variable), signature, false);
        self.queue_expression(binding, type_expr, false, false);
    }

    /// Bodies that fall off their end get an explicit return: `main`
    /// returns `0u32`, constructors return `self`.
    fn add_return_if_missing(&mut self, function: FunctionId, block: BlockId) {
        let last = self.program.block(block).statements.last().copied();
        if last.is_some_and(|s| self.program.statement(s).kind == StmtKind::Return) {
            return;
        }
        let span = match last {
            Some(statement) => self.program.statement(statement).span,
            None => self.program.block(block).span,
        };
        let expr = if block == self.program.root_block() {
            Some(self.program.int_expr(0, Some(32), false, span))
        } else if self.program.function(function).kind == FuncKind::Constructor {
            self.program
                .block(block)
                .variables
                .first()
                .copied()
                .map(|self_var| {
                    let name = self.program.variable(self_var).name;
                    self.program.name_expr(name, span)
                })
        } else {
            None
        };
        let statement = self.program.add_statement(block, StmtKind::Return, expr, span);
        self.program.statement_mut(statement).generated = true;
    }
}
