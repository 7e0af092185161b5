//! Concrete classes.
//!
//! A template has one class per distinct tuple of template parameter types
//! it is constructed with. Members live in the class block: they are
//! declared by the constructor assigning `self.member`, and methods resolve
//! through the class block back to the constructor's block.

mod methods;

use rune_diagnostic::Diagnostic;
use rune_ir::{ClassId, MemberRelation, SignatureId, TemplateId, TypeId, VarKind};

use crate::binder::Binder;

/// Class of `template` for `params`, created on first use.
pub(crate) fn class_for(b: &mut Binder<'_>, template: TemplateId, params: Vec<TypeId>) -> ClassId {
    if let Some(class) = b.program.find_class(template, &params) {
        return class;
    }
    let class = b.program.create_class(template, params);
    let block = b.program.class(class).sub_block;
    let span = b.program.template(template).span;
    let ref_width = b.program.template(template).ref_width;
    let next_free = b.program.intern("nextFree");
    let variable = b.program.add_local(block, next_free, true, span);
    b.program.variable_mut(variable).datatype = Some(b.pool.uint(ref_width));
    b.report.classes += 1;
    tracing::debug!(
        template = b.program.template_name(template),
        number = b.program.class(class).number,
        "created class"
    );
    class
}

/// The constructor returns its class. Once it is bound the class gets its
/// default methods.
pub(crate) fn finish_constructor(b: &mut Binder<'_>, signature: SignatureId) -> Result<(), Diagnostic> {
    let Some(class) = b.program.signature(signature).class else {
        return Ok(());
    };
    let template = b.program.class(class).template;
    let class_type = b.pool.class(class, template);
    if b.program.signature(signature).return_type != Some(class_type) {
        b.set_return_type(signature, class_type);
    }
    if !b.program.class(class).bound {
        record_member_relations(b, class);
    }
    b.program.class_mut(class).bound = true;
    methods::generate_default_methods(b, class)
}

/// Members whose type is already a class when the constructor first binds.
/// Null placeholders refined later do not count.
fn record_member_relations(b: &mut Binder<'_>, class: ClassId) {
    let block = b.program.class(class).sub_block;
    let relations: Vec<MemberRelation> = b
        .program
        .block(block)
        .variables
        .iter()
        .filter_map(|&variable| {
            let record = b.program.variable(variable);
            if record.kind != VarKind::Local || record.generated || record.destroyed {
                return None;
            }
            let child = b.pool.class_of(record.datatype?)?;
            Some(MemberRelation { variable, child })
        })
        .collect();
    b.program.class_mut(class).member_relations = relations;
}

#[cfg(test)]
mod tests;
