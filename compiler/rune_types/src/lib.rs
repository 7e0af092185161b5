//! Datatypes for the Rune binder.
//!
//! Every datatype lives in a [`Pool`] and is addressed by a
//! [`TypeId`](rune_ir::TypeId). The pool hash-conses: building the same
//! shape twice yields the same id, so type equality throughout the binder
//! is an integer compare.
//!
//! # Layout
//!
//! - [`TypeData`]: the structural shape of a type
//! - [`Tag`]: the shape's discriminant, for cheap dispatch
//! - [`TypeFlags`]: the `secret`/`nullable` modifiers plus facts computed
//!   once at interning time (concreteness, array containment)
//! - [`UnifyEngine`]: the lattice join used for assignments and returns

mod data;
mod error;
mod flags;
mod pool;
mod tag;
mod unify;

pub use data::TypeData;
pub use error::TypeError;
pub use flags::TypeFlags;
pub use pool::Pool;
pub use tag::Tag;
pub use unify::{UnifyContext, UnifyEngine, UnifyError};
