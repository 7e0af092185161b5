//! Datatype modifiers and pre-computed facts.
//!
//! The two modifier bits (`SECRET`, `NULLABLE`) are part of a datatype's
//! identity. The remaining bits are derived from the shape when the type is
//! interned and never recomputed.

use bitflags::bitflags;

bitflags! {
    /// Per-type bits stored next to the shape in the pool.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u16 {
        // === Modifiers (bits 0-1) ===
        // Part of the hash-consing key.

        /// Confidential value; propagates through arithmetic.
        const SECRET = 1 << 0;
        /// Object reference that may be null. Only classes and templates.
        const NULLABLE = 1 << 1;

        // === Derived (bits 8-15) ===

        /// Fully specified: can be laid out at runtime.
        const CONCRETE = 1 << 8;
        /// Is or contains an array or string.
        const CONTAINS_ARRAY = 1 << 9;
        /// `Uint`, `Int` or `Modint`.
        const IS_INTEGER = 1 << 10;
        /// Any integer or float.
        const IS_NUMBER = 1 << 11;
    }
}

impl TypeFlags {
    /// Bits that distinguish otherwise equal shapes.
    pub const MODIFIER_MASK: Self =
        Self::from_bits_truncate(Self::SECRET.bits() | Self::NULLABLE.bits());

    /// Only the modifier bits of `self`.
    #[inline]
    pub const fn modifiers(self) -> Self {
        Self::from_bits_truncate(self.bits() & Self::MODIFIER_MASK.bits())
    }

    #[inline]
    pub const fn is_secret(self) -> bool {
        self.contains(Self::SECRET)
    }

    #[inline]
    pub const fn is_nullable(self) -> bool {
        self.contains(Self::NULLABLE)
    }

    #[inline]
    pub const fn is_concrete(self) -> bool {
        self.contains(Self::CONCRETE)
    }
}

impl Default for TypeFlags {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests;
