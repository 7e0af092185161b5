//! The binder context.
//!
//! [`Binder`] carries everything a binding rule touches: the program graph,
//! the datatype pool, the binding graph and the binding currently running.
//! Rules are free functions in [`crate::expr`] taking `&mut Binder<'_>`.
//!
//! # Architecture
//!
//! ```text
//! Binder
//! ├── Program (entity graph, mutated in place)
//! ├── Pool (datatype interner)
//! ├── BindingGraph (ready queue, events)
//! └── current (binding whose expression queue is being drained)
//! ```

mod queue;

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{
    BlockId, ExprId, FuncKind, FunctionId, Program, SignatureId, Span, TypeId, VariableId,
};
use rune_types::{Pool, Tag, UnifyEngine, UnifyError};

use crate::driver::BindReport;
use crate::error::{BindResult, Progress};
use crate::graph::{BindingGraph, BindingId, BindingKind, Event};
use crate::options::BindOptions;

/// Mutable state shared by every binding rule.
pub(crate) struct Binder<'a> {
    pub program: &'a mut Program,
    pub pool: &'a mut Pool,
    pub graph: BindingGraph,
    pub options: &'a BindOptions,
    /// Binding whose queue is being drained.
    pub current: Option<BindingId>,
    pub report: BindReport,
}

impl<'a> Binder<'a> {
    pub fn new(program: &'a mut Program, pool: &'a mut Pool, options: &'a BindOptions) -> Self {
        Binder {
            program,
            pool,
            graph: BindingGraph::new(),
            options,
            current: None,
            report: BindReport::default(),
        }
    }

    // === Current binding ===

    pub fn current_binding(&self) -> Result<BindingId, Diagnostic> {
        self.current
            .ok_or_else(|| internal_error("expression bound outside of a binding"))
    }

    pub fn current_signature(&self) -> Option<SignatureId> {
        self.current.and_then(|id| self.graph.binding(id).signature)
    }

    /// True while binding a variable or return type constraint.
    pub fn in_type_constraint(&self) -> bool {
        self.current.is_some_and(|id| {
            matches!(
                self.graph.binding(id).kind,
                BindingKind::VarConstraint(_) | BindingKind::FuncConstraint(_)
            )
        })
    }

    /// Block that expressions of the current binding resolve names in.
    pub fn scope(&self) -> BlockId {
        match self.current.map(|id| self.graph.binding(id).kind) {
            Some(kind) => self.binding_scope(kind),
            None => self.program.root_block(),
        }
    }

    pub fn binding_scope(&self, kind: BindingKind) -> BlockId {
        match kind {
            BindingKind::Statement(statement) => self.program.statement(statement).block,
            BindingKind::DefaultValue(variable) | BindingKind::VarConstraint(variable) => {
                self.program.variable(variable).block
            }
            BindingKind::FuncConstraint(function) => self.program.function(function).sub_block,
        }
    }

    // === Events ===

    /// Park the current binding until `event` fires.
    pub fn suspend(&mut self, event: Event) -> BindResult {
        let id = self.current_binding()?;
        self.graph.suspend(id, event);
        Ok(Progress::Blocked)
    }

    pub fn fire(&mut self, event: Event) {
        self.graph.wake(event);
    }

    /// Wake bindings waiting on identifiers that have since been declared.
    pub fn wake_defined_idents(&mut self) {
        for ident in self.program.take_newly_defined() {
            self.fire(Event::IdentifierDefined(ident));
        }
    }

    // === Expression types ===

    /// Datatype of an already bound expression.
    pub fn expr_type(&self, expr: ExprId) -> Result<TypeId, Diagnostic> {
        self.program
            .expr(expr)
            .datatype
            .ok_or_else(|| self.error_at(ErrorCode::E9001, expr, "operand was not bound"))
    }

    pub fn set_type(&mut self, expr: ExprId, datatype: TypeId) -> BindResult {
        self.program.expr_mut(expr).datatype = Some(datatype);
        Ok(Progress::Done)
    }

    /// Mark `expr` as a type expression of `datatype`.
    pub fn set_type_value(&mut self, expr: ExprId, datatype: TypeId) -> BindResult {
        self.program.expr_mut(expr).is_type = true;
        self.set_type(expr, datatype)
    }

    pub fn type_name(&self, datatype: TypeId) -> String {
        self.pool.format_type(self.program, datatype)
    }

    pub fn tag(&self, expr: ExprId) -> Result<Tag, Diagnostic> {
        Ok(self.pool.tag(self.expr_type(expr)?))
    }

    // === Diagnostics ===

    /// Error labelled at `expr`, annotated with the call path of the
    /// signature being bound.
    pub fn error_at(&self, code: ErrorCode, expr: ExprId, message: impl Into<String>) -> Diagnostic {
        self.error_at_span(code, self.program.expr(expr).span, message)
    }

    pub fn error_at_span(&self, code: ErrorCode, span: Span, message: impl Into<String>) -> Diagnostic {
        let diagnostic = Diagnostic::error(code)
            .with_message(message)
            .with_label(span, "in this expression");
        match self.current_signature() {
            Some(signature) => diagnostic.with_note(self.signature_path(signature)),
            None => diagnostic,
        }
    }

    /// `expected`/`found` mismatch at `expr`.
    pub fn mismatch(&self, expr: ExprId, message: &str, expected: TypeId, found: TypeId) -> Diagnostic {
        self.error_at(
            ErrorCode::E2001,
            expr,
            format!(
                "{message}: expected `{}`, found `{}`",
                self.type_name(expected),
                self.type_name(found)
            ),
        )
    }

    /// "while binding f(u32) called from g() called from main()".
    pub fn signature_path(&self, signature: SignatureId) -> String {
        let mut path = format!("while binding {}", self.signature_text(signature));
        let mut caller = self.program.signature(signature).caller;
        let mut depth = 0;
        while let Some(sig) = caller {
            path.push_str(" called from ");
            path.push_str(&self.signature_text(sig));
            caller = self.program.signature(sig).caller;
            depth += 1;
            if depth > 32 {
                path.push_str(" ...");
                break;
            }
        }
        path
    }

    fn signature_text(&self, signature: SignatureId) -> String {
        let record = self.program.signature(signature);
        let params: Vec<String> = record
            .params
            .iter()
            .map(|param| match param.datatype {
                Some(datatype) => self.type_name(datatype),
                None => "_".to_owned(),
            })
            .collect();
        format!("{}({})", self.program.function_name(record.function), params.join(", "))
    }

    // === Type updates ===

    pub fn unify(&mut self, a: TypeId, b: TypeId) -> Result<TypeId, UnifyError> {
        UnifyEngine::new(self.pool).unify(a, b)
    }

    /// Datatype of a function used as a value.
    pub fn function_type(&mut self, function: FunctionId) -> TypeId {
        let record = self.program.function(function);
        match (record.kind, record.template) {
            (FuncKind::Constructor, Some(template)) => self.pool.template(template),
            (FuncKind::Enum, _) => self.pool.enum_class(function),
            _ => self.pool.function(function),
        }
    }

    /// Join `datatype` into a variable's type. Fires the variable's event
    /// when its type becomes concrete.
    pub fn update_variable(
        &mut self,
        variable: VariableId,
        datatype: TypeId,
        at: ExprId,
    ) -> Result<(), Diagnostic> {
        let old = self.program.variable(variable).datatype;
        let joined = match old {
            Some(old) if old != datatype => self.unify(old, datatype).map_err(|_| {
                self.error_at(
                    ErrorCode::E2001,
                    at,
                    format!(
                        "assigning a different type to `{}` than a prior assignment:{}",
                        self.program.variable_name(variable),
                        self.pool.format_old_vs_new(self.program, old, datatype)
                    ),
                )
            })?,
            _ => datatype,
        };
        self.program.variable_mut(variable).datatype = Some(joined);
        if old != Some(joined) && self.pool.is_concrete(joined) {
            tracing::trace!(?variable, datatype = %self.type_name(joined), "variable type known");
            self.fire(Event::VariableTypeKnown(variable));
        }
        Ok(())
    }

    /// Join `datatype` into a signature's return type. The signature becomes
    /// bound when its return type first becomes concrete.
    pub fn update_return_type(
        &mut self,
        signature: SignatureId,
        datatype: TypeId,
        span: Span,
    ) -> Result<(), Diagnostic> {
        let old = self.program.signature(signature).return_type;
        let joined = match old {
            Some(old) if old != datatype => self.unify(old, datatype).map_err(|_| {
                self.error_at_span(
                    ErrorCode::E2013,
                    span,
                    format!(
                        "returning a different type than a prior return statement:{}",
                        self.pool.format_old_vs_new(self.program, old, datatype)
                    ),
                )
            })?,
            _ => datatype,
        };
        self.program.signature_mut(signature).return_type = Some(joined);
        let was_concrete = old.is_some_and(|old| self.pool.is_concrete(old));
        if !was_concrete && self.pool.is_concrete(joined) {
            self.mark_bound(signature);
        }
        Ok(())
    }

    /// Record that a signature's return type is final and wake its callers.
    pub fn mark_bound(&mut self, signature: SignatureId) {
        self.program.signature_mut(signature).bound = true;
        tracing::debug!(
            signature = %self.signature_text(signature),
            "signature bound"
        );
        self.fire(Event::ReturnTypeKnown(signature));
    }

    /// Set a final return type, bypassing unification.
    pub fn set_return_type(&mut self, signature: SignatureId, datatype: TypeId) {
        self.program.signature_mut(signature).return_type = Some(datatype);
        self.mark_bound(signature);
    }
}

/// An invariant of the binder itself was violated.
#[cold]
pub(crate) fn internal_error(message: &str) -> Diagnostic {
    Diagnostic::error(ErrorCode::E9001).with_message(format!("internal binder error: {message}"))
}
