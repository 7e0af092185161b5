//! Entity records stored in the [`Program`](super::Program) arenas.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{
    BlockId, BlockKind, ClassId, ExprId, ExprKind, FuncKind, FunctionId, IdentId, Linkage, Name,
    RelationId, SignatureId, Span, StatementId, StmtKind, TemplateId, TypeId, VarKind, VariableId,
};

/// What owns a block.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum BlockOwner {
    Function(FunctionId),
    Class(ClassId),
    Statement(StatementId),
    /// Freshly copied block not yet spliced anywhere.
    Detached,
}

/// A scope: ordered statements plus the variables, functions and
/// identifiers declared in it.
#[derive(Clone, Debug)]
pub struct Block {
    pub kind: BlockKind,
    pub owner: BlockOwner,
    /// Enclosing lexical block.
    pub parent: Option<BlockId>,
    pub statements: Vec<StatementId>,
    pub variables: Vec<VariableId>,
    pub functions: Vec<FunctionId>,
    pub idents: FxHashMap<Name, IdentId>,
    pub can_continue: bool,
    pub can_return: bool,
    pub span: Span,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct Function {
    pub name: Name,
    pub kind: FuncKind,
    pub linkage: Linkage,
    /// Block the function is declared in.
    pub block: Option<BlockId>,
    pub sub_block: BlockId,
    pub template: Option<TemplateId>,
    /// Return type constraint.
    pub type_expr: Option<ExprId>,
    pub signatures: Vec<SignatureId>,
    /// Signature owning this function when it is a per-signature copy.
    pub uniquified_for: Option<SignatureId>,
    pub generated: bool,
    pub exported: bool,
    pub relation: Option<RelationId>,
    pub span: Span,
    pub destroyed: bool,
}

impl Function {
    pub fn is_extern(&self) -> bool {
        self.linkage.is_extern()
    }

    pub fn is_builtin(&self) -> bool {
        self.linkage == Linkage::Builtin
    }
}

/// A class declaration. Its constructor's parameters marked as template
/// parameters select which concrete class a call produces.
#[derive(Clone, Debug)]
pub struct Template {
    pub function: FunctionId,
    pub ref_width: u16,
    pub classes: Vec<ClassId>,
    pub builtin: bool,
    /// Has at least one template parameter.
    pub is_template: bool,
    pub parent_relations: Vec<RelationId>,
    pub child_relations: Vec<RelationId>,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Class {
    pub template: TemplateId,
    /// Sequential within the template, starting at 1.
    pub number: u32,
    pub sub_block: BlockId,
    /// Types of the constructor's template parameters.
    pub template_params: Vec<TypeId>,
    pub signatures: Vec<SignatureId>,
    pub bound: bool,
    pub default_methods_generated: bool,
    /// Class-typed members, recorded when the class is first bound.
    pub member_relations: Vec<MemberRelation>,
}

/// A member of class type, linking the class holding it to the member's class.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct MemberRelation {
    pub variable: VariableId,
    pub child: ClassId,
}

#[derive(Clone, Debug)]
pub struct Variable {
    pub name: Name,
    pub kind: VarKind,
    pub block: BlockId,
    pub datatype: Option<TypeId>,
    pub is_type: bool,
    pub instantiated: bool,
    pub is_const: bool,
    pub in_template_signature: bool,
    pub generated: bool,
    pub type_expr: Option<ExprId>,
    pub initializer: Option<ExprId>,
    pub span: Span,
    pub destroyed: bool,
}

/// What an identifier resolves to.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum IdentTarget {
    Variable(VariableId),
    Function(FunctionId),
    /// Referenced before any declaration; may be defined later.
    Undefined,
}

#[derive(Clone, Debug)]
pub struct Ident {
    pub name: Name,
    pub block: BlockId,
    pub target: IdentTarget,
    pub imported: bool,
}

#[derive(Clone, Debug)]
pub struct Statement {
    pub kind: StmtKind,
    pub block: BlockId,
    pub expr: Option<ExprId>,
    pub sub_block: Option<BlockId>,
    pub instantiated: bool,
    pub executed: bool,
    pub generated: bool,
    pub relation: Option<RelationId>,
    pub span: Span,
    pub destroyed: bool,
}

/// Literal payload of leaf expressions.
#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    None,
    Integer {
        value: u64,
        width: u16,
        signed: bool,
        /// The literal had no explicit width suffix.
        autocast: bool,
    },
    Float {
        bits: u64,
        width: u16,
    },
    Bool(bool),
    Str(String),
    Name(Name),
    /// Width of a `u<N>`/`i<N>`/`f<N>` type keyword.
    Width(u16),
}

/// Where an expression tree hangs.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ExprOwner {
    Statement(StatementId),
    /// Type constraint or initializer of a variable.
    Variable(VariableId),
    /// Return type constraint of a function.
    Function(FunctionId),
    None,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub children: SmallVec<[ExprId; 4]>,
    pub parent: Option<ExprId>,
    pub owner: ExprOwner,
    pub literal: Literal,
    pub span: Span,
    pub datatype: Option<TypeId>,
    pub ident: Option<IdentId>,
    pub signature: Option<SignatureId>,
    pub is_type: bool,
    pub is_const: bool,
    pub autocast: bool,
    pub instantiating: bool,
    pub lhs: bool,
}

/// Per-parameter facts recorded on a signature.
#[derive(Clone, Debug)]
pub struct Paramspec {
    /// Passed type; `None` when the parameter takes its default value.
    pub datatype: Option<TypeId>,
    pub variable: VariableId,
    pub instantiated: bool,
    pub is_type: bool,
}

#[derive(Clone, Debug)]
pub struct Signature {
    pub function: FunctionId,
    /// The copy of `function` this signature binds.
    pub uniquified: FunctionId,
    pub class: Option<ClassId>,
    pub params: Vec<Paramspec>,
    pub return_type: Option<TypeId>,
    pub bound: bool,
    pub instantiated: bool,
    pub queued: bool,
    pub called_by_funcptr: bool,
    pub number: u32,
    pub span: Span,
    pub caller: Option<SignatureId>,
    pub call_statement: Option<StatementId>,
}

#[derive(Clone, Debug)]
pub struct Relation {
    pub generator: FunctionId,
    pub parent: TemplateId,
    pub child: TemplateId,
    pub parent_label: String,
    pub child_label: String,
    pub cascade: bool,
    pub statements: Vec<StatementId>,
    pub functions: Vec<FunctionId>,
}
