//! Unification error types.

use rune_ir::TypeId;
use std::fmt;

/// Error from type unification.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum UnifyError {
    /// Types could not be unified.
    Mismatch {
        /// The type already recorded (the variable's or signature's).
        expected: TypeId,
        /// The type being merged in.
        found: TypeId,
        /// Where the mismatch occurred.
        context: UnifyContext,
    },

    /// Tuples of different lengths.
    ArityMismatch {
        expected: usize,
        found: usize,
        context: UnifyContext,
    },
}

impl UnifyError {
    /// Where in the two types unification failed.
    pub fn context(&self) -> UnifyContext {
        match self {
            Self::Mismatch { context, .. } | Self::ArityMismatch { context, .. } => *context,
        }
    }
}

/// Position inside the two types being unified.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum UnifyContext {
    /// Top-level unification (no specific context).
    #[default]
    TopLevel,

    /// In an array element type.
    ArrayElement,

    /// In a tuple element.
    TupleElement {
        /// Zero-based element index.
        index: usize,
    },
}

impl UnifyContext {
    /// Create a context for a tuple element.
    pub fn tuple_elem(index: usize) -> Self {
        Self::TupleElement { index }
    }

    /// Get a human-readable description of this context.
    pub fn description(&self) -> &'static str {
        match self {
            Self::TopLevel => "types",
            Self::ArrayElement => "array element type",
            Self::TupleElement { .. } => "tuple element",
        }
    }
}

impl fmt::Display for UnifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mismatch { context, .. } => {
                write!(f, "type mismatch in {}", context.description())
            }
            Self::ArityMismatch {
                expected,
                found,
                context,
            } => {
                write!(
                    f,
                    "tuple length mismatch in {}: expected {expected} elements, found {found}",
                    context.description()
                )
            }
        }
    }
}

impl std::error::Error for UnifyError {}
