//! Errors from datatype construction.

use rune_ir::TypeId;
use std::fmt;

use crate::Tag;

/// A datatype that cannot exist.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeError {
    /// Width not allowed for the kind, such as `f16` or `u0`.
    InvalidWidth { tag: Tag, width: u16 },
    /// Struct field types must be fully specified.
    NonConcreteField { index: usize, field: TypeId },
    /// Only object references may be nullable.
    NotNullable { ty: TypeId, tag: Tag },
    /// Sign changes apply to `Uint`/`Int` only.
    NotSignable { ty: TypeId, tag: Tag },
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWidth { tag, width } => {
                write!(f, "invalid width {width} for {tag} type")
            }
            Self::NonConcreteField { index, .. } => {
                write!(f, "struct field {index} does not have a concrete type")
            }
            Self::NotNullable { tag, .. } => {
                write!(f, "{tag} types cannot be nullable")
            }
            Self::NotSignable { tag, .. } => {
                write!(f, "cannot change the sign of a {tag}")
            }
        }
    }
}

impl std::error::Error for TypeError {}
