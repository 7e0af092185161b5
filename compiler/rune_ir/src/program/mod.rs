//! The program entity graph.
//!
//! One arena per entity kind, addressed by the typed handles in
//! [`ids`](crate::ids). Entities are never freed; destruction marks them
//! dead and unlinks them from their owners, so stale handles held by the
//! binder stay valid to inspect.

mod build;
mod copy;
mod destroy;
mod entities;
mod reach;
mod scope;
mod signature;

pub use entities::{
    Block, BlockOwner, Class, Expr, ExprOwner, Function, Ident, IdentTarget, Literal,
    MemberRelation, Paramspec, Relation, Signature, Statement, Template, Variable,
};
pub use build::DEFAULT_REF_WIDTH;
pub use reach::UnreachableStatement;

use rustc_hash::FxHashMap;

use crate::{
    BlockId, ClassId, ExprId, FunctionId, IdentId, Name, RelationId, SignatureId, StatementId,
    StringInterner, TemplateId, TypeId, VariableId,
};

/// Key of the signature table: the function and its parameter types.
type SignatureKey = (FunctionId, Vec<Option<TypeId>>);

/// The whole program being bound.
pub struct Program {
    interner: StringInterner,
    blocks: Vec<Block>,
    functions: Vec<Function>,
    templates: Vec<Template>,
    classes: Vec<Class>,
    variables: Vec<Variable>,
    idents: Vec<Ident>,
    statements: Vec<Statement>,
    exprs: Vec<Expr>,
    signatures: Vec<Signature>,
    relations: Vec<Relation>,
    signature_table: FxHashMap<SignatureKey, SignatureId>,
    root_block: BlockId,
    main_function: FunctionId,
    /// Undefined identifiers that became defined since the last drain.
    newly_defined: Vec<IdentId>,
}

macro_rules! arena_accessors {
    ($($get:ident, $get_mut:ident, $field:ident, $id:ty, $ty:ty;)*) => { $(
        #[inline]
        pub fn $get(&self, id: $id) -> &$ty {
            &self.$field[id.index()]
        }

        #[inline]
        pub fn $get_mut(&mut self, id: $id) -> &mut $ty {
            &mut self.$field[id.index()]
        }
    )* };
}

impl Program {
    /// Create an empty program whose root block belongs to `main`.
    pub fn new() -> Self {
        let mut program = Program {
            interner: StringInterner::new(),
            blocks: Vec::new(),
            functions: Vec::new(),
            templates: Vec::new(),
            classes: Vec::new(),
            variables: Vec::new(),
            idents: Vec::new(),
            statements: Vec::new(),
            exprs: Vec::new(),
            signatures: Vec::new(),
            relations: Vec::new(),
            signature_table: FxHashMap::default(),
            root_block: BlockId::INVALID,
            main_function: FunctionId::INVALID,
            newly_defined: Vec::new(),
        };
        program.create_root();
        program
    }

    arena_accessors! {
        block, block_mut, blocks, BlockId, Block;
        function, function_mut, functions, FunctionId, Function;
        template, template_mut, templates, TemplateId, Template;
        class, class_mut, classes, ClassId, Class;
        variable, variable_mut, variables, VariableId, Variable;
        ident, ident_mut, idents, IdentId, Ident;
        statement, statement_mut, statements, StatementId, Statement;
        expr, expr_mut, exprs, ExprId, Expr;
        signature, signature_mut, signatures, SignatureId, Signature;
        relation, relation_mut, relations, RelationId, Relation;
    }

    #[inline]
    pub fn root_block(&self) -> BlockId {
        self.root_block
    }

    #[inline]
    pub fn main_function(&self) -> FunctionId {
        self.main_function
    }

    #[inline]
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    pub fn intern(&self, text: &str) -> Name {
        self.interner.intern(text)
    }

    pub fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub fn function_name(&self, function: FunctionId) -> &'static str {
        self.name_str(self.function(function).name)
    }

    pub fn variable_name(&self, variable: VariableId) -> &'static str {
        self.name_str(self.variable(variable).name)
    }

    pub fn template_name(&self, template: TemplateId) -> &'static str {
        self.function_name(self.template(template).function)
    }

    /// Templates in creation order.
    pub fn template_ids(&self) -> impl DoubleEndedIterator<Item = TemplateId> {
        (0..self.templates.len()).map(TemplateId::from_len)
    }

    pub fn function_ids(&self) -> impl DoubleEndedIterator<Item = FunctionId> {
        (0..self.functions.len()).map(FunctionId::from_len)
    }

    pub fn signature_ids(&self) -> impl DoubleEndedIterator<Item = SignatureId> {
        (0..self.signatures.len()).map(SignatureId::from_len)
    }

    pub fn relation_ids(&self) -> impl DoubleEndedIterator<Item = RelationId> {
        (0..self.relations.len()).map(RelationId::from_len)
    }

    // === Expression tree helpers ===

    pub fn child(&self, expr: ExprId, index: usize) -> Option<ExprId> {
        self.expr(expr).children.get(index).copied()
    }

    pub fn first_child(&self, expr: ExprId) -> Option<ExprId> {
        self.child(expr, 0)
    }

    pub fn last_child(&self, expr: ExprId) -> Option<ExprId> {
        self.expr(expr).children.last().copied()
    }

    /// Name carried by an identifier expression.
    pub fn expr_name(&self, expr: ExprId) -> Option<Name> {
        match self.expr(expr).literal {
            Literal::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Statement owning the expression tree, if any.
    pub fn expr_statement(&self, expr: ExprId) -> Option<StatementId> {
        let mut current = expr;
        while let Some(parent) = self.expr(current).parent {
            current = parent;
        }
        match self.expr(current).owner {
            ExprOwner::Statement(statement) => Some(statement),
            _ => None,
        }
    }

    // === Identifiers ===

    /// Drain identifiers that changed from undefined to defined.
    pub fn take_newly_defined(&mut self) -> Vec<IdentId> {
        std::mem::take(&mut self.newly_defined)
    }

    /// Variable the identifier names, if it names one.
    pub fn ident_variable(&self, ident: IdentId) -> Option<VariableId> {
        match self.ident(ident).target {
            IdentTarget::Variable(variable) => Some(variable),
            _ => None,
        }
    }

    pub fn ident_function(&self, ident: IdentId) -> Option<FunctionId> {
        match self.ident(ident).target {
            IdentTarget::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Create or upgrade an identifier. An existing undefined identifier of
    /// the same name is upgraded in place and recorded as newly defined;
    /// an existing defined one is returned unchanged.
    fn declare_ident(&mut self, block: BlockId, name: Name, target: IdentTarget) -> IdentId {
        if let Some(&existing) = self.block(block).idents.get(&name) {
            let ident = self.ident_mut(existing);
            if ident.target == IdentTarget::Undefined && target != IdentTarget::Undefined {
                ident.target = target;
                self.newly_defined.push(existing);
            }
            return existing;
        }
        let id = IdentId::from_len(self.idents.len());
        self.idents.push(Ident {
            name,
            block,
            target,
            imported: false,
        });
        self.block_mut(block).idents.insert(name, id);
        id
    }

    /// Create an undefined identifier so that binding can wait for it.
    pub fn create_undefined_ident(&mut self, block: BlockId, name: Name) -> IdentId {
        self.declare_ident(block, name, IdentTarget::Undefined)
    }

    /// Create an identifier for `function` in `block`. Function identifiers
    /// added to a constructor's block also become visible in every class of
    /// its template.
    pub fn add_function_ident(
        &mut self,
        block: BlockId,
        function: FunctionId,
        name: Name,
        imported: bool,
    ) -> IdentId {
        let ident = self.declare_ident(block, name, IdentTarget::Function(function));
        if imported {
            self.ident_mut(ident).imported = true;
        }
        if let BlockOwner::Function(owner) = self.block(block).owner {
            if let Some(template) = self.function(owner).template {
                if self.template(template).function == owner {
                    let class_blocks: Vec<BlockId> = self
                        .template(template)
                        .classes
                        .iter()
                        .map(|&class| self.class(class).sub_block)
                        .collect();
                    for class_block in class_blocks {
                        self.declare_ident(class_block, name, IdentTarget::Function(function));
                    }
                }
            }
        }
        ident
    }

    /// Rename an identifier, keeping the block's table consistent.
    pub fn rename_ident(&mut self, ident: IdentId, new_name: Name) {
        let (block, old_name) = {
            let record = self.ident(ident);
            (record.block, record.name)
        };
        if old_name == new_name {
            return;
        }
        let table = &mut self.block_mut(block).idents;
        table.remove(&old_name);
        table.insert(new_name, ident);
        self.ident_mut(ident).name = new_name;
        match self.ident(ident).target {
            IdentTarget::Variable(variable) => self.variable_mut(variable).name = new_name,
            IdentTarget::Function(function) => {
                if self.function(function).block == Some(block) {
                    self.function_mut(function).name = new_name;
                }
            }
            IdentTarget::Undefined => {}
        }
    }
}

impl Default for Program {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
