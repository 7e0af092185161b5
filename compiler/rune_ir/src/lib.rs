//! Rune IR - the program entity graph
//!
//! This crate holds everything the type binder reads and mutates:
//! - Spans for source locations
//! - Names for interned identifiers
//! - `TypeId` handles into the datatype pool (owned by `rune_types`)
//! - Typed ids and one arena per entity kind inside [`Program`]
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: Strings → Name(u32), Types → TypeId(u32)
//! - **Flatten Everything**: entities reference each other by id, never by
//!   pointer, so the graph may contain cycles (classes ↔ relations,
//!   signatures ↔ uniquified functions) without reference counting
//! - **Never Free**: destroyed entities are flagged and unlinked

mod ids;
mod interner;
mod kinds;
mod name;
pub mod program;
mod span;
mod type_id;

pub use ids::{
    BlockId, ClassId, ExprId, FunctionId, IdentId, RelationId, SignatureId, StatementId,
    TemplateId, VariableId,
};
pub use interner::StringInterner;
pub use kinds::{BlockKind, ExprKind, FuncKind, Linkage, StmtKind, VarKind};
pub use name::Name;
pub use program::{
    Block, BlockOwner, Class, Expr, ExprOwner, Function, Ident, IdentTarget, Literal, MemberRelation,
    Paramspec, Program, Relation, Signature, Statement, Template, UnreachableStatement, Variable,
    DEFAULT_REF_WIDTH,
};
pub use span::Span;
pub use type_id::TypeId;
