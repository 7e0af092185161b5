//! The binding driver.
//!
//! [`bind_program`] binds a parsed program in place. Binding starts from
//! the signature of `main` (and unit tests in test mode) and spreads
//! through calls: every call site creates or reuses a signature of its
//! callee, which queues that signature's body.
//!
//! # Phases
//!
//! 1. Declare the builtin classes and variables assigned before being read
//! 2. Queue the entry signatures
//! 3. Drain the ready queue ([`Binder::bind_all`])
//! 4. Destroy templates no signature reached, then report what is still
//!    waiting on an event
//! 5. Check the relation graph for reference-counted loops
//! 6. Inline iterator loops

mod post;
mod signature;

use rune_diagnostic::Diagnostic;
use rune_ir::{FuncKind, Program, Span};
use rune_types::Pool;

use crate::binder::{internal_error, Binder};
use crate::error::{BindErrors, Progress};
use crate::graph::{BindingId, BindingKind};
use crate::options::BindOptions;
use crate::{builtins, cleanup, create_vars, expr, iterator, relation_check};

/// Counters describing what a successful bind did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BindReport {
    /// Signatures queued for binding.
    pub signatures: usize,
    /// Concrete classes materialized.
    pub classes: usize,
    /// Bindings run to completion.
    pub bindings: usize,
    /// Transformer directives executed.
    pub directives: usize,
    /// Templates whose contents were destroyed because nothing used them.
    pub destroyed_templates: usize,
    /// `for` loops replaced by the body of their iterator.
    pub inlined_loops: usize,
}

/// Bind every expression reachable from `main`.
///
/// On success every reachable expression carries a datatype and the
/// program has been rewritten in place (default methods generated,
/// transformer output spliced, iterator loops inlined, unused templates
/// emptied). On failure the returned errors carry every diagnostic, in
/// report order.
#[tracing::instrument(level = "info", skip_all)]
pub fn bind_program(
    program: &mut Program,
    pool: &mut Pool,
    options: &BindOptions,
) -> Result<BindReport, BindErrors> {
    let mut binder = Binder::new(program, pool, options);
    binder.run().map_err(BindErrors::single)?;
    cleanup::destroy_unused_templates(&mut binder);
    cleanup::report_unresolved(&binder)?;
    relation_check::check_relation_loops(&binder).map_err(BindErrors::single)?;
    iterator::inline_iterators(&mut binder).map_err(BindErrors::single)?;
    tracing::info!(report = ?binder.report, "binding complete");
    Ok(binder.report)
}

impl Binder<'_> {
    fn run(&mut self) -> Result<(), Diagnostic> {
        builtins::declare_builtins(self.program);
        create_vars::declare_assigned_variables(self.program);
        self.queue_entry_points()?;
        self.bind_all()
    }

    /// `main`, plus every unit test when running in test mode.
    fn queue_entry_points(&mut self) -> Result<(), Diagnostic> {
        let mut entries = vec![self.program.main_function()];
        if self.options.test_mode {
            entries.extend(self.program.function_ids().filter(|&function| {
                let record = self.program.function(function);
                record.kind == FuncKind::Unittest && !record.destroyed
            }));
        }
        for function in entries {
            let span = self.program.function(function).span;
            let signature = self.program.create_signature(function, Vec::new(), span, None, None);
            self.program.signature_mut(signature).instantiated = true;
            self.queue_signature(signature)?;
        }
        Ok(())
    }

    /// Run ready bindings until none are left.
    pub(crate) fn bind_all(&mut self) -> Result<(), Diagnostic> {
        while let Some(id) = self.graph.pop_ready() {
            self.current = Some(id);
            let result = self.run_binding(id);
            self.current = None;
            result?;
        }
        Ok(())
    }

    /// Bind the front of the binding's queue until it empties or blocks.
    fn run_binding(&mut self, id: BindingId) -> Result<(), Diagnostic> {
        while let Some(&front) = self.graph.binding(id).queue.front() {
            let progress = expr::bind_expression(self, front)?;
            self.wake_defined_idents();
            match progress {
                Progress::Done => {
                    self.graph.binding_mut(id).queue.pop_front();
                }
                Progress::Blocked => return Ok(()),
                Progress::Rebind => self.rebind(id)?,
            }
        }
        self.post_process(id)?;
        self.wake_defined_idents();
        self.report.bindings += 1;
        if let Some(signature) = self.graph.complete(id) {
            self.finish_signature(signature)?;
        }
        Ok(())
    }

    /// The statement's expression tree changed shape; bind it from scratch.
    fn rebind(&mut self, id: BindingId) -> Result<(), Diagnostic> {
        let BindingKind::Statement(statement) = self.graph.binding(id).kind else {
            return Err(internal_error("only statement bindings can be rebound"));
        };
        tracing::debug!(?id, ?statement, "rebinding statement");
        let instantiating = self.graph.binding(id).instantiating;
        self.graph.binding_mut(id).queue.clear();
        if let Some(expr) = self.program.statement(statement).expr {
            self.queue_expression(id, expr, instantiating, false);
        }
        Ok(())
    }

    /// Span of the binding's root expression or statement.
    pub(crate) fn binding_span(&self, id: BindingId) -> Span {
        match self.graph.binding(id).kind {
            BindingKind::Statement(statement) => self.program.statement(statement).span,
            BindingKind::DefaultValue(variable) | BindingKind::VarConstraint(variable) => {
                self.program.variable(variable).span
            }
            BindingKind::FuncConstraint(function) => self.program.function(function).span,
        }
    }
}

#[cfg(test)]
mod tests;
