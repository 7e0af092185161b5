//! Resolving partially specified types to the one concrete type they
//! can denote.

use rune_ir::{FuncKind, FunctionId, Program, TypeId, VarKind};

use crate::{Pool, TypeData};

/// Width of enum values whose first entry has no integer type.
const DEFAULT_ENUM_WIDTH: u16 = 32;

impl Pool {
    /// The concrete type `id` stands for, if there is exactly one.
    ///
    /// Templates without template parameters resolve to their single class,
    /// struct functions to the struct of their parameter types, and enum
    /// classes to their value type.
    pub fn find_unique_concrete(&mut self, program: &Program, id: TypeId) -> Option<TypeId> {
        if self.is_concrete(id) {
            return Some(id);
        }
        let modifiers = self.flags(id).modifiers();
        let found = match self.data(id).clone() {
            TypeData::Array(element) => {
                let element = self.find_unique_concrete(program, element)?;
                self.array(element)
            }
            TypeData::Tuple(fields) => {
                let fields = fields
                    .iter()
                    .map(|&field| self.find_unique_concrete(program, field))
                    .collect::<Option<Vec<_>>>()?;
                self.tuple(&fields)
            }
            TypeData::Template(template) => {
                let class = program.default_class(template)?;
                self.class(class, template)
            }
            TypeData::Function(function) if program.function(function).kind == FuncKind::Struct => {
                self.struct_of(program, function)?
            }
            TypeData::EnumClass(function) => self.enum_of(program, function),
            _ => return None,
        };
        Some(self.with_modifiers(found, modifiers | self.flags(found).modifiers()))
    }

    /// Struct value type built from the concrete parameter types of a
    /// struct function.
    pub fn struct_of(&mut self, program: &Program, function: FunctionId) -> Option<TypeId> {
        let block = program.function(function).sub_block;
        let params: Vec<Option<TypeId>> = program
            .block(block)
            .variables
            .iter()
            .filter(|&&v| program.variable(v).kind == VarKind::Parameter)
            .map(|&v| program.variable(v).datatype)
            .collect();
        let mut fields = Vec::with_capacity(params.len());
        for param in params {
            fields.push(self.find_unique_concrete(program, param?)?);
        }
        self.struct_type(function, &fields).ok()
    }

    /// Value type of an enum: as wide as the type of its first entry.
    pub fn enum_of(&mut self, program: &Program, function: FunctionId) -> TypeId {
        let block = program.function(function).sub_block;
        let width = program
            .block(block)
            .variables
            .first()
            .and_then(|&v| program.variable(v).datatype)
            .and_then(|ty| self.width(ty))
            .unwrap_or(DEFAULT_ENUM_WIDTH);
        self.enum_type(function, width)
    }
}
