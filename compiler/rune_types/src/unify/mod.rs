//! Type unification.
//!
//! Binder types carry no inference variables. Unification is the join used
//! when a variable or return type is assigned a second time: the two types
//! must describe the same runtime value, and the result keeps the weaker
//! guarantee of either side (nullable wins over non-null, secret over
//! public). The one open type is the `null(T)` placeholder, which joins with
//! any class of `T`.
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = UnifyEngine::new(&mut pool);
//! let joined = engine.unify(old_type, new_type)?;
//! ```

mod error;

pub use error::{UnifyContext, UnifyError};

use rune_ir::TypeId;

use crate::{Pool, Tag, TypeData};

/// The unification engine.
pub struct UnifyEngine<'pool> {
    pool: &'pool mut Pool,
}

impl<'pool> UnifyEngine<'pool> {
    /// Create a new unification engine.
    pub fn new(pool: &'pool mut Pool) -> Self {
        Self { pool }
    }

    /// Join two types. Commutative on success, and `unify(a, a) == a`.
    pub fn unify(&mut self, a: TypeId, b: TypeId) -> Result<TypeId, UnifyError> {
        self.unify_with_context(a, b, UnifyContext::TopLevel)
    }

    /// Join two types, reporting failures against `context`.
    pub fn unify_with_context(
        &mut self,
        a: TypeId,
        b: TypeId,
        context: UnifyContext,
    ) -> Result<TypeId, UnifyError> {
        if a == b {
            return Ok(a);
        }
        if self.pool.is_secret(a) || self.pool.is_secret(b) {
            let public_a = self.pool.set_secret(a, false);
            let public_b = self.pool.set_secret(b, false);
            let joined = self
                .unify_public(public_a, public_b, context)
                .map_err(|err| match err {
                    UnifyError::Mismatch { context: inner, .. } if inner == context => {
                        UnifyError::Mismatch {
                            expected: a,
                            found: b,
                            context,
                        }
                    }
                    other => other,
                })?;
            return Ok(self.pool.set_secret(joined, true));
        }
        self.unify_public(a, b, context)
    }

    /// Join two types whose top level is not secret.
    fn unify_public(
        &mut self,
        a: TypeId,
        b: TypeId,
        context: UnifyContext,
    ) -> Result<TypeId, UnifyError> {
        if a == b {
            return Ok(a);
        }
        let mismatch = UnifyError::Mismatch {
            expected: a,
            found: b,
            context,
        };
        if let Some(joined) = self.join_placeholder(a, b).or_else(|| self.join_placeholder(b, a)) {
            return Ok(joined);
        }
        if self.pool.tag(a) != self.pool.tag(b) {
            return Err(mismatch);
        }
        match (self.pool.data(a).clone(), self.pool.data(b).clone()) {
            (TypeData::Array(elem_a), TypeData::Array(elem_b)) => {
                let element = self.unify_with_context(elem_a, elem_b, UnifyContext::ArrayElement)?;
                Ok(self.pool.array(element))
            }
            (TypeData::Tuple(fields_a), TypeData::Tuple(fields_b)) => {
                if fields_a.len() != fields_b.len() {
                    return Err(UnifyError::ArityMismatch {
                        expected: fields_a.len(),
                        found: fields_b.len(),
                        context,
                    });
                }
                let mut fields = Vec::with_capacity(fields_a.len());
                for (index, (&field_a, &field_b)) in fields_a.iter().zip(fields_b.iter()).enumerate()
                {
                    fields.push(self.unify_with_context(
                        field_a,
                        field_b,
                        UnifyContext::tuple_elem(index),
                    )?);
                }
                Ok(self.pool.tuple(&fields))
            }
            (data_a, data_b) if data_a == data_b => {
                // Same object type, differing only in nullability.
                self.pool.set_nullable(a, true).map_err(|_| mismatch)
            }
            _ => Err(mismatch),
        }
    }

    /// `null(T)` joined with a class of `T` is that class, nullable.
    fn join_placeholder(&mut self, placeholder: TypeId, other: TypeId) -> Option<TypeId> {
        if !self.pool.is_null_placeholder(placeholder) || self.pool.tag(other) != Tag::Class {
            return None;
        }
        if self.pool.template_of(placeholder) != self.pool.template_of(other) {
            return None;
        }
        self.pool.set_nullable(other, true).ok()
    }
}

#[cfg(test)]
mod tests;
