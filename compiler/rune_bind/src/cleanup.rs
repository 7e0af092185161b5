//! Work left over once the ready queue drains.
//!
//! Templates that no signature reached are emptied so that later passes
//! never see their unbound code. Bindings that are still suspended after
//! that point can never wake, and each one is reported.

use rune_diagnostic::{undefined_identifier, Diagnostic, DiagnosticQueue, ErrorCode};
use rune_ir::Program;

use crate::binder::Binder;
use crate::error::BindErrors;
use crate::graph::{Binding, BindingId, BindingKind, Event};

/// Destroy the contents of every template that has no class, or whose
/// only class was never constructed, then drop bindings of dead code.
pub(crate) fn destroy_unused_templates(b: &mut Binder<'_>) {
    let templates: Vec<_> = b.program.template_ids().rev().collect();
    for template in templates {
        let record = b.program.template(template);
        if record.builtin {
            continue;
        }
        let unused = match record.classes[..] {
            [] => true,
            [class] => b.program.class(class).signatures.is_empty(),
            _ => false,
        };
        if !unused {
            continue;
        }
        b.program.destroy_template_contents(template);
        b.report.destroyed_templates += 1;
        tracing::debug!(
            template = b.program.template_name(template),
            "destroyed unused template"
        );
    }

    let program = &*b.program;
    let removed = b.graph.retain(|binding| binding_is_live(program, binding));
    if removed > 0 {
        tracing::debug!(removed, "dropped bindings of destroyed code");
    }
}

fn binding_is_live(program: &Program, binding: &Binding) -> bool {
    match binding.kind {
        BindingKind::Statement(statement) => program.statement_is_live(statement),
        BindingKind::DefaultValue(variable) | BindingKind::VarConstraint(variable) => {
            !program.variable(variable).destroyed
        }
        BindingKind::FuncConstraint(function) => !program.function(function).destroyed,
    }
}

/// Report every event that still has waiters. Undefined identifiers come
/// first, then variables and return types whose type was never found.
pub(crate) fn report_unresolved(b: &Binder<'_>) -> Result<(), BindErrors> {
    let mut events = b.graph.waiting_events();
    if events.is_empty() {
        return Ok(());
    }
    events.sort_by_key(|&(event, _)| match event {
        Event::IdentifierDefined(_) => 0,
        Event::VariableTypeKnown(_) => 1,
        Event::ReturnTypeKnown(_) => 2,
    });

    let mut queue = DiagnosticQueue::with_limit(b.options.error_limit);
    for (event, binding) in events {
        let diagnostic = unresolved_diagnostic(b, event, binding);
        let diagnostic = match b.graph.binding(binding).signature {
            Some(signature) => diagnostic.with_note(b.signature_path(signature)),
            None => diagnostic,
        };
        if !queue.add(diagnostic) && queue.limit_reached() {
            break;
        }
    }
    tracing::debug!(errors = queue.error_count(), "unresolved events reported");
    Err(BindErrors {
        diagnostics: queue.flush(),
    })
}

fn unresolved_diagnostic(
    b: &Binder<'_>,
    event: Event,
    binding: BindingId,
) -> Diagnostic {
    match event {
        Event::IdentifierDefined(ident) => {
            let span = b
                .graph
                .binding(binding)
                .queue
                .front()
                .map_or_else(|| b.binding_span(binding), |&expr| b.program.expr(expr).span);
            let name = b.program.name_str(b.program.ident(ident).name);
            undefined_identifier(span, name)
        }
        Event::VariableTypeKnown(variable) => {
            let record = b.program.variable(variable);
            Diagnostic::error(ErrorCode::E5002)
                .with_message(format!(
                    "could not determine the type of `{}`",
                    b.program.name_str(record.name)
                ))
                .with_label(record.span, "type never became known")
        }
        Event::ReturnTypeKnown(signature) => {
            let record = b.program.signature(signature);
            Diagnostic::error(ErrorCode::E5003)
                .with_message(format!(
                    "could not determine the return type of `{}`",
                    b.program.function_name(record.function)
                ))
                .with_label(record.span, "return type never became known")
        }
    }
}
