//! Ownership loops in the relation graph.
//!
//! A template with a cascade-delete parent is owned: its objects die with
//! that parent. Every other template is reference-counted, and a
//! reference-counted object that can reach itself through child relations
//! or class-typed members would never be freed. The search starts at each
//! reference-counted template and reports the first path leading back to it.

use rune_diagnostic::{Diagnostic, ErrorCode};
use rune_ir::{Program, TemplateId};
use rustc_hash::FxHashSet;

use crate::binder::Binder;

pub(crate) fn check_relation_loops(b: &Binder<'_>) -> Result<(), Diagnostic> {
    for template in b.program.template_ids() {
        if !is_ref_counted(b.program, template) {
            continue;
        }
        let mut visited = FxHashSet::default();
        let mut path = vec![template];
        if reaches(b, template, template, &mut visited, &mut path) {
            path.push(template);
            return Err(loop_error(b.program, &path));
        }
    }
    Ok(())
}

fn is_ref_counted(program: &Program, template: TemplateId) -> bool {
    !program
        .template(template)
        .parent_relations
        .iter()
        .any(|&relation| program.relation(relation).cascade)
}

/// Depth-first search from `template` for `target`. On success `path` holds
/// the templates from `target` up to the one that links back to it.
fn reaches(
    b: &Binder<'_>,
    target: TemplateId,
    template: TemplateId,
    visited: &mut FxHashSet<TemplateId>,
    path: &mut Vec<TemplateId>,
) -> bool {
    visited.insert(template);
    for child in children(b, template) {
        if child == target {
            return true;
        }
        if visited.contains(&child) {
            continue;
        }
        path.push(child);
        if reaches(b, target, child, visited, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Child templates of every relation, cascade or not, followed by the
/// templates of class-typed members.
fn children(b: &Binder<'_>, template: TemplateId) -> Vec<TemplateId> {
    let record = b.program.template(template);
    let relations = record
        .child_relations
        .iter()
        .map(|&relation| b.program.relation(relation).child);
    let members = record.classes.iter().flat_map(|&class| {
        b.program
            .class(class)
            .member_relations
            .iter()
            .map(|member| b.program.class(member.child).template)
    });
    relations.chain(members).collect()
}

fn loop_error(program: &Program, cycle: &[TemplateId]) -> Diagnostic {
    let names: Vec<&str> = cycle.iter().map(|&t| program.template_name(t)).collect();
    let span = cycle
        .first()
        .map_or_else(rune_ir::Span::default, |&t| program.template(t).span);
    Diagnostic::error(ErrorCode::E4004)
        .with_message(format!(
            "relation loop contains reference-counted class `{}`: {}",
            names.first().copied().unwrap_or_default(),
            names.join(" -> ")
        ))
        .with_label(span, "reference-counted class on the loop")
        .with_note("give one relation on the loop `cascade` so the class is owned by its parent")
}

#[cfg(test)]
mod tests;
