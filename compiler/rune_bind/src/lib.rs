//! Rune Bind - event-driven type binder for the Rune compiler.
//!
//! Binding assigns a datatype to every expression reachable from `main`.
//! Functions are bound once per distinct argument-type tuple (a
//! *signature*); classes are created once per distinct tuple of template
//! parameter types. Expressions that need a fact not yet known (the return
//! type of a recursive call, the type of a variable assigned later, a name
//! that a transformer has yet to generate) suspend on an event and resume
//! when it fires.
//!
//! # Main Entry Points
//!
//! - [`bind_program`]: bind a parsed [`Program`](rune_ir::Program) in place
//! - [`BindOptions`]: test, unsafe and debug modes plus the error limit
//! - [`declare_builtins`]: declare the builtin classes and their methods
//!
//! # Module Organization
//!
//! - `graph`: bindings, the ready queue and event waiters
//! - `binder`: the shared binding context and expression queuing
//! - `driver`: the main loop and per-signature completion
//! - `expr`: one binding rule per expression kind
//! - `class`, `builtins`: class creation and builtin methods
//! - `transformer`: relation and code-splicing directives
//! - `cleanup`, `relation_check`, `iterator`: passes after the queue drains

mod binder;
mod builtins;
mod class;
mod cleanup;
mod create_vars;
mod driver;
mod error;
mod expr;
mod graph;
mod iterator;
mod options;
mod printf;
mod refine;
mod relation_check;
#[cfg(test)]
mod test_helpers;
mod tracing_setup;
mod transformer;
mod type_expr;

pub use builtins::declare_builtins;
pub use driver::{bind_program, BindReport};
pub use error::BindErrors;
pub use options::{BindOptions, OptionsError};
pub use tracing_setup::init_tracing;
