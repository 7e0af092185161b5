//! Datatype kind tag.
//!
//! Tags are grouped so range checks answer the common questions:
//! - 0-2: value primitives
//! - 3-6: numbers (integers first)
//! - 7-11: aggregates
//! - 12-15: callables, templates and classes

use std::fmt;

/// Datatype kind discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[repr(u8)]
pub enum Tag {
    None = 0,
    Bool = 1,
    String = 2,

    // === Numbers ===
    Uint = 3,
    Int = 4,
    Modint = 5,
    Float = 6,

    // === Aggregates ===
    Array = 7,
    Tuple = 8,
    Struct = 9,
    /// The enumeration itself, used as a type.
    EnumClass = 10,
    /// A value of an enumeration.
    Enum = 11,

    // === Callables and objects ===
    Funcptr = 12,
    Function = 13,
    /// A class declaration; nullable when it stands for `null(T)`.
    Template = 14,
    Class = 15,
}

impl Tag {
    /// `Uint`, `Int` or `Modint`.
    #[inline]
    pub const fn is_integer(self) -> bool {
        matches!(self, Tag::Uint | Tag::Int | Tag::Modint)
    }

    /// Any integer or `Float`.
    #[inline]
    pub const fn is_number(self) -> bool {
        (self as u8) >= (Tag::Uint as u8) && (self as u8) <= (Tag::Float as u8)
    }

    /// Tags whose values are object references.
    #[inline]
    pub const fn is_object(self) -> bool {
        matches!(self, Tag::Class | Tag::Template)
    }

    /// Name of the builtin template that carries methods for this kind,
    /// such as `length` on arrays.
    pub const fn builtin_template_name(self) -> Option<&'static str> {
        Some(match self {
            Tag::Array => "Array",
            Tag::Funcptr => "Funcptr",
            Tag::Function => "Function",
            Tag::Bool => "Bool",
            Tag::String => "String",
            Tag::Uint => "Uint",
            Tag::Int => "Int",
            Tag::Modint => "Modint",
            Tag::Float => "Float",
            Tag::Tuple => "Tuple",
            Tag::Struct => "Struct",
            Tag::Enum | Tag::EnumClass => "Enum",
            Tag::None | Tag::Template | Tag::Class => return None,
        })
    }

    /// Lower-case kind name for diagnostics.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::None => "none",
            Tag::Bool => "bool",
            Tag::String => "string",
            Tag::Uint => "uint",
            Tag::Int => "int",
            Tag::Modint => "modint",
            Tag::Float => "float",
            Tag::Array => "array",
            Tag::Tuple => "tuple",
            Tag::Struct => "struct",
            Tag::EnumClass => "enum class",
            Tag::Enum => "enum",
            Tag::Funcptr => "funcptr",
            Tag::Function => "function",
            Tag::Template => "template",
            Tag::Class => "class",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
