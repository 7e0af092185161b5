//! Datatype constructors and modifier setters.

use rune_ir::{ClassId, ExprId, FunctionId, TemplateId, TypeId};

use crate::{Pool, Tag, TypeData, TypeError, TypeFlags};

impl Pool {
    // === Scalars ===

    pub fn uint(&mut self, width: u16) -> TypeId {
        debug_assert_ne!(width, 0, "zero-width integer");
        self.intern(TypeData::Uint(width), TypeFlags::empty())
    }

    pub fn int(&mut self, width: u16) -> TypeId {
        debug_assert_ne!(width, 0, "zero-width integer");
        self.intern(TypeData::Int(width), TypeFlags::empty())
    }

    /// Only `f32` and `f64` exist.
    pub fn float(&mut self, width: u16) -> Result<TypeId, TypeError> {
        match width {
            32 => Ok(TypeId::F32),
            64 => Ok(TypeId::F64),
            _ => Err(TypeError::InvalidWidth {
                tag: Tag::Float,
                width,
            }),
        }
    }

    /// Integer modulo the value of `modulus`, as wide as the modulus type.
    pub fn modint(&mut self, modulus: ExprId, width: u16) -> TypeId {
        self.intern(TypeData::Modint { modulus, width }, TypeFlags::empty())
    }

    // === Aggregates ===

    /// Create an array type `[element]`.
    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element), TypeFlags::empty())
    }

    /// Create a tuple type `(fields...)`.
    pub fn tuple(&mut self, fields: &[TypeId]) -> TypeId {
        self.intern(TypeData::Tuple(fields.into()), TypeFlags::empty())
    }

    /// Create the value type of a struct function. Every field must be
    /// concrete.
    pub fn struct_type(
        &mut self,
        function: FunctionId,
        fields: &[TypeId],
    ) -> Result<TypeId, TypeError> {
        if let Some((index, &field)) = fields
            .iter()
            .enumerate()
            .find(|&(_, &field)| !self.is_concrete(field))
        {
            return Err(TypeError::NonConcreteField { index, field });
        }
        Ok(self.intern(
            TypeData::Struct {
                function,
                fields: fields.into(),
            },
            TypeFlags::empty(),
        ))
    }

    /// Create a function pointer type `func(params) -> ret`.
    pub fn funcptr(&mut self, ret: TypeId, params: &[TypeId]) -> TypeId {
        self.intern(
            TypeData::Funcptr {
                ret,
                params: params.into(),
            },
            TypeFlags::empty(),
        )
    }

    // === Enumerations ===

    pub fn enum_class(&mut self, function: FunctionId) -> TypeId {
        self.intern(TypeData::EnumClass(function), TypeFlags::empty())
    }

    pub fn enum_type(&mut self, function: FunctionId, width: u16) -> TypeId {
        self.intern(TypeData::Enum { function, width }, TypeFlags::empty())
    }

    // === Named types ===

    pub fn function(&mut self, function: FunctionId) -> TypeId {
        self.intern(TypeData::Function(function), TypeFlags::empty())
    }

    pub fn template(&mut self, template: TemplateId) -> TypeId {
        self.intern(TypeData::Template(template), TypeFlags::empty())
    }

    pub fn class(&mut self, class: ClassId, template: TemplateId) -> TypeId {
        self.intern(TypeData::Class { class, template }, TypeFlags::empty())
    }

    /// Type of `null(T)` before any class of `T` is known.
    pub fn null_placeholder(&mut self, template: TemplateId) -> TypeId {
        self.intern(TypeData::Template(template), TypeFlags::NULLABLE)
    }

    // === Modifiers ===

    /// Same shape with the secret bit set or cleared.
    pub fn set_secret(&mut self, id: TypeId, secret: bool) -> TypeId {
        let mut modifiers = self.flags(id).modifiers();
        modifiers.set(TypeFlags::SECRET, secret);
        self.with_modifiers(id, modifiers)
    }

    /// Same object type with the nullable bit set or cleared. Clearing it
    /// on a placeholder gives the plain template. Clearing is a no-op for
    /// non-object types; setting it is an error.
    pub fn set_nullable(&mut self, id: TypeId, nullable: bool) -> Result<TypeId, TypeError> {
        let tag = self.tag(id);
        if !tag.is_object() {
            if nullable {
                return Err(TypeError::NotNullable { ty: id, tag });
            }
            return Ok(id);
        }
        let mut modifiers = self.flags(id).modifiers();
        modifiers.set(TypeFlags::NULLABLE, nullable);
        Ok(self.with_modifiers(id, modifiers))
    }

    /// Switch an integer between `Uint` and `Int`, keeping width and secrecy.
    pub fn set_signed(&mut self, id: TypeId, signed: bool) -> Result<TypeId, TypeError> {
        let data = match *self.data(id) {
            TypeData::Uint(width) | TypeData::Int(width) => {
                if signed {
                    TypeData::Int(width)
                } else {
                    TypeData::Uint(width)
                }
            }
            _ => {
                return Err(TypeError::NotSignable {
                    ty: id,
                    tag: self.tag(id),
                })
            }
        };
        let modifiers = self.flags(id).modifiers();
        Ok(self.intern(data, modifiers))
    }
}
