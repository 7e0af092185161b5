//! Construction API.
//!
//! Parsing is outside this crate; front ends and tests populate a
//! [`Program`] through these methods.

use smallvec::SmallVec;

use super::{
    Block, BlockOwner, Class, Expr, ExprOwner, Function, IdentTarget, Literal, Program,
    Relation, Statement, Template, Variable,
};
use crate::{
    BlockId, BlockKind, ClassId, ExprId, ExprKind, FuncKind, FunctionId, Linkage, Name,
    RelationId, Span, StatementId, StmtKind, TemplateId, VarKind, VariableId,
};

/// Width in bits of object references.
pub const DEFAULT_REF_WIDTH: u16 = 32;

impl Program {
    pub(super) fn create_root(&mut self) {
        let name = self.intern("main");
        let block = self.push_block(BlockKind::Function, BlockOwner::Detached, None, Span::DUMMY);
        let main = self.push_function(name, FuncKind::Module, Linkage::Module, None, block, Span::DUMMY);
        self.root_block = block;
        self.main_function = main;
    }

    pub(super) fn push_block(
        &mut self,
        kind: BlockKind,
        owner: BlockOwner,
        parent: Option<BlockId>,
        span: Span,
    ) -> BlockId {
        let id = BlockId::from_len(self.blocks.len());
        self.blocks.push(Block {
            kind,
            owner,
            parent,
            statements: Vec::new(),
            variables: Vec::new(),
            functions: Vec::new(),
            idents: rustc_hash::FxHashMap::default(),
            can_continue: true,
            can_return: false,
            span,
            destroyed: false,
        });
        id
    }

    pub(super) fn push_function(
        &mut self,
        name: Name,
        kind: FuncKind,
        linkage: Linkage,
        block: Option<BlockId>,
        sub_block: BlockId,
        span: Span,
    ) -> FunctionId {
        let id = FunctionId::from_len(self.functions.len());
        self.functions.push(Function {
            name,
            kind,
            linkage,
            block,
            sub_block,
            template: None,
            type_expr: None,
            signatures: Vec::new(),
            uniquified_for: None,
            generated: false,
            exported: false,
            relation: None,
            span,
            destroyed: false,
        });
        self.block_mut(sub_block).owner = BlockOwner::Function(id);
        id
    }

    pub(super) fn push_variable(
        &mut self,
        block: BlockId,
        name: Name,
        kind: VarKind,
        generated: bool,
        span: Span,
    ) -> VariableId {
        let id = VariableId::from_len(self.variables.len());
        self.variables.push(Variable {
            name,
            kind,
            block,
            datatype: None,
            is_type: false,
            instantiated: false,
            is_const: false,
            in_template_signature: false,
            generated,
            type_expr: None,
            initializer: None,
            span,
            destroyed: false,
        });
        let variables = &mut self.blocks[block.index()].variables;
        if kind == VarKind::Parameter {
            let position = variables
                .iter()
                .take_while(|&&v| self.variables[v.index()].kind == VarKind::Parameter)
                .count();
            variables.insert(position, id);
        } else {
            variables.push(id);
        }
        self.declare_ident(block, name, IdentTarget::Variable(id));
        id
    }

    // === Functions and templates ===

    /// Declare a function in `block`, with an empty body block.
    pub fn add_function(
        &mut self,
        block: BlockId,
        name: &str,
        kind: FuncKind,
        linkage: Linkage,
        span: Span,
    ) -> FunctionId {
        let name = self.intern(name);
        self.declare_function(block, name, kind, linkage, span)
    }

    pub(super) fn declare_function(
        &mut self,
        block: BlockId,
        name: Name,
        kind: FuncKind,
        linkage: Linkage,
        span: Span,
    ) -> FunctionId {
        let sub_block = self.push_block(BlockKind::Function, BlockOwner::Detached, Some(block), span);
        let id = self.push_function(name, kind, linkage, Some(block), sub_block, span);
        self.block_mut(block).functions.push(id);
        self.add_function_ident(block, id, name, false);
        id
    }

    /// Declare a class constructor and its template. Non-builtin templates
    /// get a generated `destroy` method taking `self`.
    pub fn add_constructor(&mut self, block: BlockId, name: &str, span: Span) -> FunctionId {
        let constructor = self.add_function(block, name, FuncKind::Constructor, Linkage::Module, span);
        self.create_template(constructor, false, span);
        self.add_destroy_method(constructor);
        constructor
    }

    /// Declare a builtin template such as the array or string classes.
    pub fn add_builtin_template(&mut self, block: BlockId, name: &str, span: Span) -> FunctionId {
        let constructor = self.add_function(block, name, FuncKind::Constructor, Linkage::Builtin, span);
        self.create_template(constructor, true, span);
        constructor
    }

    pub(super) fn create_template(
        &mut self,
        constructor: FunctionId,
        builtin: bool,
        span: Span,
    ) -> TemplateId {
        let id = TemplateId::from_len(self.templates.len());
        self.templates.push(Template {
            function: constructor,
            ref_width: DEFAULT_REF_WIDTH,
            classes: Vec::new(),
            builtin,
            is_template: false,
            parent_relations: Vec::new(),
            child_relations: Vec::new(),
            span,
        });
        self.function_mut(constructor).template = Some(id);
        id
    }

    fn add_destroy_method(&mut self, constructor: FunctionId) {
        let sub_block = self.function(constructor).sub_block;
        let span = self.function(constructor).span;
        let destroy = self.add_function(sub_block, "destroy", FuncKind::Destructor, Linkage::Module, span);
        self.function_mut(destroy).generated = true;
        let self_name = self.intern("self");
        let destroy_block = self.function(destroy).sub_block;
        self.push_variable(destroy_block, self_name, VarKind::Parameter, true, span);
    }

    /// Create a new concrete class of `template`, numbered sequentially.
    pub fn create_class(&mut self, template: TemplateId, template_params: Vec<crate::TypeId>) -> ClassId {
        let id = ClassId::from_len(self.classes.len());
        let constructor = self.template(template).function;
        let parent = self.function(constructor).block;
        let span = self.function(constructor).span;
        let sub_block = self.push_block(BlockKind::Class, BlockOwner::Class(id), parent, span);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "class count per template never approaches u32::MAX"
        )]
        let number = self.template(template).classes.len() as u32 + 1;
        self.classes.push(Class {
            template,
            number,
            sub_block,
            template_params,
            signatures: Vec::new(),
            bound: false,
            default_methods_generated: false,
            member_relations: Vec::new(),
        });
        self.template_mut(template).classes.push(id);
        id
    }

    /// Find the class of `template` for the given template parameter types.
    pub fn find_class(&self, template: TemplateId, params: &[crate::TypeId]) -> Option<ClassId> {
        let record = self.template(template);
        if !record.is_template {
            return record.classes.first().copied();
        }
        record
            .classes
            .iter()
            .copied()
            .find(|&class| self.class(class).template_params == params)
    }

    /// The single class of a template without template parameters.
    pub fn default_class(&self, template: TemplateId) -> Option<ClassId> {
        let record = self.template(template);
        if record.is_template {
            return None;
        }
        record.classes.first().copied()
    }

    /// Record a parent/child relation generated by `generator`.
    pub fn create_relation(
        &mut self,
        generator: FunctionId,
        parent: TemplateId,
        child: TemplateId,
        parent_label: String,
        child_label: String,
        cascade: bool,
    ) -> RelationId {
        let id = RelationId::from_len(self.relations.len());
        self.relations.push(Relation {
            generator,
            parent,
            child,
            parent_label,
            child_label,
            cascade,
            statements: Vec::new(),
            functions: Vec::new(),
        });
        self.template_mut(parent).child_relations.push(id);
        self.template_mut(child).parent_relations.push(id);
        id
    }

    // === Variables ===

    /// Append a parameter to `function`. Parameters are const unless
    /// marked with [`Program::set_var_parameter`].
    pub fn add_parameter(&mut self, function: FunctionId, name: &str, span: Span) -> VariableId {
        let name = self.intern(name);
        let block = self.function(function).sub_block;
        let variable = self.push_variable(block, name, VarKind::Parameter, false, span);
        self.variable_mut(variable).is_const = true;
        variable
    }

    /// Mark a parameter as `var`: the callee may write it, so callers must
    /// pass a variable.
    pub fn set_var_parameter(&mut self, variable: VariableId) {
        self.variable_mut(variable).is_const = false;
    }

    /// Mark a constructor parameter as a template parameter (`<name>`).
    pub fn set_template_parameter(&mut self, variable: VariableId) {
        self.variable_mut(variable).in_template_signature = true;
        if let BlockOwner::Function(function) = self.block(self.variable(variable).block).owner {
            if let Some(template) = self.function(function).template {
                self.template_mut(template).is_template = true;
            }
        }
    }

    /// Attach a type constraint expression to a variable.
    pub fn set_variable_constraint(&mut self, variable: VariableId, expr: ExprId) {
        self.expr_mut(expr).owner = ExprOwner::Variable(variable);
        self.variable_mut(variable).type_expr = Some(expr);
    }

    /// Attach a default value expression to a parameter.
    pub fn set_variable_initializer(&mut self, variable: VariableId, expr: ExprId) {
        self.expr_mut(expr).owner = ExprOwner::Variable(variable);
        self.variable_mut(variable).initializer = Some(expr);
    }

    /// Attach a return type constraint to a function.
    pub fn set_return_constraint(&mut self, function: FunctionId, expr: ExprId) {
        self.expr_mut(expr).owner = ExprOwner::Function(function);
        self.function_mut(function).type_expr = Some(expr);
    }

    /// Create a local variable in the scope enclosing `block`.
    pub fn add_local(&mut self, block: BlockId, name: Name, generated: bool, span: Span) -> VariableId {
        let scope = self.scope_block(block);
        self.push_variable(scope, name, VarKind::Local, generated, span)
    }

    // === Statements ===

    /// Append a statement to `block`.
    pub fn add_statement(
        &mut self,
        block: BlockId,
        kind: StmtKind,
        expr: Option<ExprId>,
        span: Span,
    ) -> StatementId {
        let position = self.block(block).statements.len();
        self.insert_statement(block, position, kind, expr, span)
    }

    /// Append a statement that owns a nested block.
    pub fn add_compound_statement(
        &mut self,
        block: BlockId,
        kind: StmtKind,
        expr: Option<ExprId>,
        span: Span,
    ) -> (StatementId, BlockId) {
        let statement = self.add_statement(block, kind, expr, span);
        let sub_block = self.add_sub_block(statement);
        (statement, sub_block)
    }

    /// Create a statement at `position` in `block`.
    pub fn insert_statement(
        &mut self,
        block: BlockId,
        position: usize,
        kind: StmtKind,
        expr: Option<ExprId>,
        span: Span,
    ) -> StatementId {
        let id = StatementId::from_len(self.statements.len());
        self.statements.push(Statement {
            kind,
            block,
            expr,
            sub_block: None,
            instantiated: false,
            executed: false,
            generated: false,
            relation: None,
            span,
            destroyed: false,
        });
        if let Some(expr) = expr {
            self.expr_mut(expr).owner = ExprOwner::Statement(id);
        }
        let statements = &mut self.block_mut(block).statements;
        let position = position.min(statements.len());
        statements.insert(position, id);
        id
    }

    /// Give a statement an empty nested block.
    pub fn add_sub_block(&mut self, statement: StatementId) -> BlockId {
        let parent = self.statement(statement).block;
        let span = self.statement(statement).span;
        let block = self.push_block(BlockKind::Statement, BlockOwner::Statement(statement), Some(parent), span);
        self.statement_mut(statement).sub_block = Some(block);
        block
    }

    /// Replace a statement's expression.
    pub fn set_statement_expr(&mut self, statement: StatementId, expr: Option<ExprId>) {
        if let Some(expr) = expr {
            self.expr_mut(expr).owner = ExprOwner::Statement(statement);
            self.expr_mut(expr).parent = None;
        }
        self.statement_mut(statement).expr = expr;
    }

    /// Position of a statement within its block.
    pub fn statement_position(&self, statement: StatementId) -> Option<usize> {
        let block = self.statement(statement).block;
        self.block(block).statements.iter().position(|&s| s == statement)
    }

    // === Expressions ===

    /// Create an expression node over `children`.
    pub fn new_expr(&mut self, kind: ExprKind, children: &[ExprId], span: Span) -> ExprId {
        self.push_expr(kind, children, Literal::None, span)
    }

    pub(super) fn push_expr(
        &mut self,
        kind: ExprKind,
        children: &[ExprId],
        literal: Literal,
        span: Span,
    ) -> ExprId {
        let id = ExprId::from_len(self.exprs.len());
        self.exprs.push(Expr {
            kind,
            children: SmallVec::from_slice(children),
            parent: None,
            owner: ExprOwner::None,
            literal,
            span,
            datatype: None,
            ident: None,
            signature: None,
            is_type: false,
            is_const: false,
            autocast: false,
            instantiating: false,
            lhs: false,
        });
        for &child in children {
            self.expr_mut(child).parent = Some(id);
        }
        id
    }

    /// Integer literal; `width: None` makes it auto-cast to its context.
    pub fn int_expr(&mut self, value: u64, width: Option<u16>, signed: bool, span: Span) -> ExprId {
        let literal = Literal::Integer {
            value,
            width: width.unwrap_or(64),
            signed,
            autocast: width.is_none(),
        };
        self.push_expr(ExprKind::Integer, &[], literal, span)
    }

    pub fn float_expr(&mut self, value: f64, width: u16, span: Span) -> ExprId {
        let literal = Literal::Float {
            bits: value.to_bits(),
            width,
        };
        self.push_expr(ExprKind::Float, &[], literal, span)
    }

    pub fn bool_expr(&mut self, value: bool, span: Span) -> ExprId {
        self.push_expr(ExprKind::Bool, &[], Literal::Bool(value), span)
    }

    pub fn string_expr(&mut self, value: &str, span: Span) -> ExprId {
        self.push_expr(ExprKind::String, &[], Literal::Str(value.to_owned()), span)
    }

    pub fn ident_expr(&mut self, name: &str, span: Span) -> ExprId {
        let name = self.intern(name);
        self.name_expr(name, span)
    }

    pub fn name_expr(&mut self, name: Name, span: Span) -> ExprId {
        self.push_expr(ExprKind::Ident, &[], Literal::Name(name), span)
    }

    /// `u<width>`, `i<width>` or `f<width>` type keyword.
    pub fn width_type_expr(&mut self, kind: ExprKind, width: u16, span: Span) -> ExprId {
        self.push_expr(kind, &[], Literal::Width(width), span)
    }

    /// Append a child to an existing expression.
    pub fn append_child(&mut self, parent: ExprId, child: ExprId) {
        self.expr_mut(parent).children.push(child);
        self.expr_mut(child).parent = Some(parent);
    }

    /// Replace the `index`th child of `parent`.
    pub fn replace_child(&mut self, parent: ExprId, index: usize, child: ExprId) {
        self.expr_mut(parent).children[index] = child;
        self.expr_mut(child).parent = Some(parent);
    }
}
