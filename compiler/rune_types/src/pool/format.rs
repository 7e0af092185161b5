//! Type formatting for error messages and tracing output.

#![allow(clippy::format_push_string)] // Diagnostic formatting prioritizes clarity over allocation

use rune_ir::{Program, TypeId};

use crate::{Pool, TypeData};

impl Pool {
    /// Format a type as it would be written in source.
    pub fn format_type(&self, program: &Program, id: TypeId) -> String {
        let mut buf = String::new();
        self.format_type_into(program, id, &mut buf);
        buf
    }

    /// Format a type into an existing string buffer.
    pub fn format_type_into(&self, program: &Program, id: TypeId, buf: &mut String) {
        if self.is_secret(id) {
            buf.push_str("secret(");
            let public = self.lookup_variant(id, false);
            self.format_shape(program, public.unwrap_or(id), buf);
            buf.push(')');
        } else {
            self.format_shape(program, id, buf);
        }
    }

    /// Look up the public variant without interning it.
    fn lookup_variant(&self, id: TypeId, secret: bool) -> Option<TypeId> {
        let mut modifiers = self.flags(id).modifiers();
        modifiers.set(crate::TypeFlags::SECRET, secret);
        self.table.get(&(self.data(id).clone(), modifiers)).copied()
    }

    fn format_shape(&self, program: &Program, id: TypeId, buf: &mut String) {
        match self.data(id) {
            TypeData::None => buf.push_str("none"),
            TypeData::Bool => buf.push_str("bool"),
            TypeData::String => buf.push_str("string"),
            TypeData::Uint(width) => buf.push_str(&format!("u{width}")),
            TypeData::Int(width) => buf.push_str(&format!("i{width}")),
            TypeData::Float(width) => buf.push_str(&format!("f{width}")),
            TypeData::Modint { width, .. } => buf.push_str(&format!("modint(u{width})")),
            TypeData::Array(element) => {
                buf.push('[');
                self.format_type_into(program, *element, buf);
                buf.push(']');
            }
            TypeData::Tuple(fields) => {
                buf.push('(');
                self.format_list(program, fields, buf);
                buf.push(')');
            }
            TypeData::Struct { function, fields } => {
                buf.push_str(program.function_name(*function));
                buf.push('(');
                self.format_list(program, fields, buf);
                buf.push(')');
            }
            TypeData::EnumClass(function) => {
                buf.push_str("enum ");
                buf.push_str(program.function_name(*function));
            }
            TypeData::Enum { function, .. } => buf.push_str(program.function_name(*function)),
            TypeData::Funcptr { ret, params } => {
                buf.push_str("func(");
                self.format_list(program, params, buf);
                buf.push_str(") -> ");
                self.format_type_into(program, *ret, buf);
            }
            TypeData::Function(function) => {
                buf.push_str("func ");
                buf.push_str(program.function_name(*function));
            }
            TypeData::Template(template) => {
                if self.is_nullable(id) {
                    buf.push_str(&format!("null({})", program.template_name(*template)));
                } else {
                    buf.push_str(program.template_name(*template));
                }
            }
            TypeData::Class { class, template } => {
                buf.push_str(program.template_name(*template));
                let params = &program.class(*class).template_params;
                if !params.is_empty() {
                    buf.push('(');
                    self.format_list(program, params, buf);
                    buf.push(')');
                }
            }
        }
    }

    fn format_list(&self, program: &Program, ids: &[TypeId], buf: &mut String) {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            self.format_type_into(program, id, buf);
        }
    }

    /// Two types on separate lines, for "was X, now Y" messages.
    pub fn format_old_vs_new(&self, program: &Program, old: TypeId, new: TypeId) -> String {
        format!(
            "\n    old: {}\n    new: {}",
            self.format_type(program, old),
            self.format_type(program, new)
        )
    }
}
