//! The datatype pool.
//!
//! Datatypes are interned into a flat vector. Each entry keeps its shape
//! and its [`TypeFlags`]; the lookup table is keyed by shape plus modifier
//! bits, so the same shape with a different `secret`/`nullable` setting is
//! a different id.

mod concrete;
mod construct;
mod format;

use rune_ir::{ClassId, ExprId, FunctionId, TemplateId, TypeId};
use rustc_hash::FxHashMap;

use crate::{Tag, TypeData, TypeFlags};

/// One interned datatype.
#[derive(Clone, Debug)]
struct Item {
    data: TypeData,
    flags: TypeFlags,
}

/// Hash-consing store of every datatype in a compilation.
pub struct Pool {
    items: Vec<Item>,
    table: FxHashMap<(TypeData, TypeFlags), TypeId>,
}

impl Pool {
    /// Create a pool holding the pre-interned primitives at the ids
    /// [`TypeId`] names.
    pub fn new() -> Self {
        let mut pool = Pool {
            items: Vec::with_capacity(256),
            table: FxHashMap::default(),
        };
        let primitives = [
            (TypeData::None, TypeId::NONE),
            (TypeData::Bool, TypeId::BOOL),
            (TypeData::String, TypeId::STRING),
            (TypeData::Uint(8), TypeId::U8),
            (TypeData::Uint(32), TypeId::U32),
            (TypeData::Uint(64), TypeId::U64),
            (TypeData::Int(32), TypeId::I32),
            (TypeData::Int(64), TypeId::I64),
            (TypeData::Float(32), TypeId::F32),
            (TypeData::Float(64), TypeId::F64),
        ];
        for (data, expected) in primitives {
            let id = pool.intern(data, TypeFlags::empty());
            debug_assert_eq!(id, expected);
        }
        pool
    }

    /// Return the unique id for `data` with the given modifier bits.
    pub fn intern(&mut self, data: TypeData, modifiers: TypeFlags) -> TypeId {
        let modifiers = modifiers.modifiers();
        let key = (data, modifiers);
        if let Some(&id) = self.table.get(&key) {
            return id;
        }
        let flags = self.derive_flags(&key.0) | modifiers;
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a program never interns u32::MAX distinct types"
        )]
        let id = TypeId::from_raw(self.items.len() as u32);
        tracing::trace!(?id, data = ?key.0, ?flags, "interned datatype");
        self.items.push(Item {
            data: key.0.clone(),
            flags,
        });
        self.table.insert(key, id);
        id
    }

    /// Facts that follow from the shape alone.
    fn derive_flags(&self, data: &TypeData) -> TypeFlags {
        let integer = TypeFlags::CONCRETE | TypeFlags::IS_INTEGER | TypeFlags::IS_NUMBER;
        match data {
            TypeData::None | TypeData::Bool => TypeFlags::CONCRETE,
            TypeData::String => TypeFlags::CONCRETE | TypeFlags::CONTAINS_ARRAY,
            TypeData::Uint(_) | TypeData::Int(_) | TypeData::Modint { .. } => integer,
            TypeData::Float(_) => TypeFlags::CONCRETE | TypeFlags::IS_NUMBER,
            TypeData::Array(element) => {
                let mut flags = TypeFlags::CONTAINS_ARRAY;
                if self.is_concrete(*element) {
                    flags |= TypeFlags::CONCRETE;
                }
                flags
            }
            TypeData::Tuple(fields) | TypeData::Struct { fields, .. } => {
                let mut flags = TypeFlags::CONCRETE;
                for &field in fields.iter() {
                    if !self.is_concrete(field) {
                        flags.remove(TypeFlags::CONCRETE);
                    }
                    if self.contains_array(field) {
                        flags |= TypeFlags::CONTAINS_ARRAY;
                    }
                }
                flags
            }
            TypeData::Enum { .. } | TypeData::Funcptr { .. } | TypeData::Class { .. } => {
                TypeFlags::CONCRETE
            }
            TypeData::EnumClass(_) | TypeData::Function(_) | TypeData::Template(_) => {
                TypeFlags::empty()
            }
        }
    }

    /// Re-intern `id`'s shape with different modifier bits.
    pub(crate) fn with_modifiers(&mut self, id: TypeId, modifiers: TypeFlags) -> TypeId {
        if self.flags(id).modifiers() == modifiers.modifiers() {
            return id;
        }
        let data = self.data(id).clone();
        self.intern(data, modifiers)
    }

    /// Number of interned datatypes.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    // === Queries ===

    #[inline]
    pub fn data(&self, id: TypeId) -> &TypeData {
        &self.items[id.index()].data
    }

    #[inline]
    pub fn tag(&self, id: TypeId) -> Tag {
        self.data(id).tag()
    }

    #[inline]
    pub fn flags(&self, id: TypeId) -> TypeFlags {
        self.items[id.index()].flags
    }

    #[inline]
    pub fn is_secret(&self, id: TypeId) -> bool {
        self.flags(id).is_secret()
    }

    #[inline]
    pub fn is_nullable(&self, id: TypeId) -> bool {
        self.flags(id).is_nullable()
    }

    #[inline]
    pub fn is_concrete(&self, id: TypeId) -> bool {
        self.flags(id).is_concrete()
    }

    #[inline]
    pub fn contains_array(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::CONTAINS_ARRAY)
    }

    #[inline]
    pub fn is_integer(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::IS_INTEGER)
    }

    #[inline]
    pub fn is_number(&self, id: TypeId) -> bool {
        self.flags(id).contains(TypeFlags::IS_NUMBER)
    }

    #[inline]
    pub fn is_float(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Float
    }

    /// A nullable template: the type of `null(T)` before `T` has a class.
    pub fn is_null_placeholder(&self, id: TypeId) -> bool {
        self.tag(id) == Tag::Template && self.is_nullable(id)
    }

    /// Bit width of numbers and enum values.
    pub fn width(&self, id: TypeId) -> Option<u16> {
        match *self.data(id) {
            TypeData::Uint(width)
            | TypeData::Int(width)
            | TypeData::Float(width)
            | TypeData::Modint { width, .. }
            | TypeData::Enum { width, .. } => Some(width),
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn element(&self, id: TypeId) -> Option<TypeId> {
        match *self.data(id) {
            TypeData::Array(element) => Some(element),
            _ => None,
        }
    }

    /// Tuple or struct fields, or function pointer parameters.
    pub fn type_list(&self, id: TypeId) -> &[TypeId] {
        self.data(id).children()
    }

    pub fn funcptr_return(&self, id: TypeId) -> Option<TypeId> {
        match *self.data(id) {
            TypeData::Funcptr { ret, .. } => Some(ret),
            _ => None,
        }
    }

    pub fn class_of(&self, id: TypeId) -> Option<ClassId> {
        match *self.data(id) {
            TypeData::Class { class, .. } => Some(class),
            _ => None,
        }
    }

    /// Template of a class or template type.
    pub fn template_of(&self, id: TypeId) -> Option<TemplateId> {
        match *self.data(id) {
            TypeData::Class { template, .. } | TypeData::Template(template) => Some(template),
            _ => None,
        }
    }

    /// Function behind struct, enum and function types.
    pub fn function_of(&self, id: TypeId) -> Option<FunctionId> {
        match *self.data(id) {
            TypeData::Struct { function, .. }
            | TypeData::EnumClass(function)
            | TypeData::Enum { function, .. }
            | TypeData::Function(function) => Some(function),
            _ => None,
        }
    }

    pub fn modulus(&self, id: TypeId) -> Option<ExprId> {
        match *self.data(id) {
            TypeData::Modint { modulus, .. } => Some(modulus),
            _ => None,
        }
    }

    /// Equal once the secret bit is ignored.
    pub fn equivalent(&self, a: TypeId, b: TypeId) -> bool {
        a == b
            || (self.data(a) == self.data(b)
                && self.flags(a).is_nullable() == self.flags(b).is_nullable())
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
