//! Interned datatype handle.
//!
//! The datatype pool lives in `rune_types`; the entity graph only stores
//! handles so that variables, expressions and signatures can carry types
//! without depending on the pool.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle of a hash-consed datatype.
///
/// Two handles are equal exactly when the datatypes are structurally equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
#[repr(transparent)]
pub struct TypeId(u32);

impl TypeId {
    // Pre-interned types, in pool creation order.
    pub const NONE: TypeId = TypeId(0);
    pub const BOOL: TypeId = TypeId(1);
    pub const STRING: TypeId = TypeId(2);
    pub const U8: TypeId = TypeId(3);
    pub const U32: TypeId = TypeId(4);
    pub const U64: TypeId = TypeId(5);
    pub const I32: TypeId = TypeId(6);
    pub const I64: TypeId = TypeId(7);
    pub const F32: TypeId = TypeId(8);
    pub const F64: TypeId = TypeId(9);

    /// First ID for types interned on demand.
    pub const FIRST_DYNAMIC: u32 = 10;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        TypeId(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is one of the pre-interned types.
    #[inline]
    pub const fn is_pre_interned(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

impl Hash for TypeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::NONE => write!(f, "TypeId::NONE"),
            Self::BOOL => write!(f, "TypeId::BOOL"),
            Self::STRING => write!(f, "TypeId::STRING"),
            _ => write!(f, "TypeId({})", self.0),
        }
    }
}
