//! Typed arena handles for program entities.
//!
//! Each entity kind lives in its own arena inside [`Program`](crate::Program);
//! these newtypes keep the index spaces apart.

/// Define `u32` index newtypes for arena-allocated entities.
///
/// Each generated type has:
/// - `INVALID` sentinel and `Default` returning it
/// - `new()`, `index()`, `raw()`, `is_valid()`
/// - `Debug` printing `Name(n)` or `Name::INVALID`
#[macro_export]
macro_rules! define_id {
    ($($(#[$meta:meta])* $name:ident),* $(,)?) => { $(
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            pub const INVALID: $name = $name(u32::MAX);

            #[inline]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }

            /// Handle for the next slot of an arena of length `len`.
            #[inline]
            pub fn from_len(len: usize) -> Self {
                Self(u32::try_from(len).unwrap_or(u32::MAX))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl ::std::fmt::Debug for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                if self.is_valid() {
                    write!(f, "{}({})", stringify!($name), self.0)
                } else {
                    write!(f, "{}::INVALID", stringify!($name))
                }
            }
        }
    )* };
}

define_id!(
    /// A scope of statements, variables, functions and identifiers.
    BlockId,
    /// A function, constructor, iterator, struct, enum, module or transformer.
    FunctionId,
    /// A class declaration; owns its concrete classes.
    TemplateId,
    /// One concrete instantiation of a template.
    ClassId,
    VariableId,
    IdentId,
    StatementId,
    ExprId,
    /// A function specialized to a tuple of parameter types.
    SignatureId,
    /// A parent/child edge between two templates created by a relation directive.
    RelationId,
);
