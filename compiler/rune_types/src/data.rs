//! Structural shape of a datatype.

use rune_ir::{ClassId, ExprId, FunctionId, TemplateId, TypeId};

use crate::Tag;

/// The shape of a datatype, without its modifier bits.
///
/// Child types are stored as ids into the same pool, so shapes are flat
/// and cheap to hash.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeData {
    None,
    Bool,
    String,
    Uint(u16),
    Int(u16),
    Float(u16),
    /// Integer reduced modulo the value of `modulus`.
    Modint {
        modulus: ExprId,
        width: u16,
    },
    Array(TypeId),
    Tuple(Box<[TypeId]>),
    /// Value of a struct function: its parameters are the fields.
    Struct {
        function: FunctionId,
        fields: Box<[TypeId]>,
    },
    EnumClass(FunctionId),
    Enum {
        function: FunctionId,
        width: u16,
    },
    Funcptr {
        ret: TypeId,
        params: Box<[TypeId]>,
    },
    /// A function used as a value, including struct and enum callables.
    Function(FunctionId),
    Template(TemplateId),
    Class {
        class: ClassId,
        template: TemplateId,
    },
}

impl TypeData {
    pub fn tag(&self) -> Tag {
        match self {
            TypeData::None => Tag::None,
            TypeData::Bool => Tag::Bool,
            TypeData::String => Tag::String,
            TypeData::Uint(_) => Tag::Uint,
            TypeData::Int(_) => Tag::Int,
            TypeData::Float(_) => Tag::Float,
            TypeData::Modint { .. } => Tag::Modint,
            TypeData::Array(_) => Tag::Array,
            TypeData::Tuple(_) => Tag::Tuple,
            TypeData::Struct { .. } => Tag::Struct,
            TypeData::EnumClass(_) => Tag::EnumClass,
            TypeData::Enum { .. } => Tag::Enum,
            TypeData::Funcptr { .. } => Tag::Funcptr,
            TypeData::Function(_) => Tag::Function,
            TypeData::Template(_) => Tag::Template,
            TypeData::Class { .. } => Tag::Class,
        }
    }

    /// Child types, in declaration order.
    pub fn children(&self) -> &[TypeId] {
        match self {
            TypeData::Array(element) => std::slice::from_ref(element),
            TypeData::Tuple(fields) | TypeData::Struct { fields, .. } => fields,
            TypeData::Funcptr { params, .. } => params,
            _ => &[],
        }
    }
}
